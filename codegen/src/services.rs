//! Builds service definitions, grouping same-named functions into overload
//! sets.

use lather_wsdl::document::Document;

use super::{
    error::Error,
    model::{OperationVariant, OverloadSet, ServiceDef},
    sanitize::{sanitize_member, Classmap},
    typemap::map_type,
};

/// Interprets every `service` node. Service names are validated against the
/// run registry but not recorded in the classmap, since services are not
/// reference types. Functions sharing a sanitized name fold into one overload
/// set, preserving first-seen order of both sets and variants.
pub fn build(document: &Document, classmap: &mut Classmap) -> Result<Vec<ServiceDef>, Error> {
    let mut services = Vec::new();

    for service in &document.services {
        let name = classmap.sanitize_class_name(&service.name, false)?;
        let mut overloads: Vec<OverloadSet> = Vec::new();

        for function in &service.functions {
            let function_name = sanitize_member(&function.name)?;

            let mut parameters = Vec::new();
            for parameter in &function.parameters {
                parameters.push((sanitize_member(&parameter.name)?, map_type(&parameter.ty)));
            }

            let variant = OperationVariant {
                wire_name: function.name.clone(),
                documentation: function.documentation.clone(),
                parameters,
                returns: function.returns.as_deref().map(map_type),
            };

            match overloads.iter_mut().find(|set| set.name == function_name) {
                Some(set) => {
                    // Two distinct wire operations collapsing to one method
                    // would silently misroute every call but the first.
                    if set.wire_name() != variant.wire_name {
                        return Err(Error::AmbiguousWireName {
                            function: function_name,
                            first: set.wire_name().to_owned(),
                            second: variant.wire_name,
                        });
                    }

                    set.variants.push(variant);
                }
                None => overloads.push(OverloadSet {
                    name: function_name,
                    variants: vec![variant],
                }),
            }
        }

        services.push(ServiceDef {
            name,
            location: service.location.clone(),
            overloads,
        });
    }

    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Primitive, TypeKind};
    use lather_wsdl::document::{EntryNode, FunctionNode, ServiceNode};

    fn function(name: &str, parameter_ty: &str) -> FunctionNode {
        FunctionNode {
            name: name.into(),
            documentation: None,
            parameters: vec![EntryNode {
                name: "value".into(),
                ty: parameter_ty.into(),
            }],
            returns: Some("string".into()),
        }
    }

    fn document(functions: Vec<FunctionNode>) -> Document {
        Document {
            classes: Vec::new(),
            services: vec![ServiceNode {
                name: "Svc".into(),
                location: Some("http://example.com/svc".into()),
                functions,
            }],
        }
    }

    #[test]
    fn same_named_functions_form_one_overload_set() {
        let document = document(vec![function("Lookup", "string"), function("Lookup", "int")]);

        let mut classmap = Classmap::default();
        let services = build(&document, &mut classmap).unwrap();

        assert_eq!(services[0].overloads.len(), 1);
        let set = &services[0].overloads[0];
        assert_eq!(set.name, "Lookup");
        assert_eq!(set.variants.len(), 2);
        assert_eq!(set.signatures(), ["(string)", "(integer)"]);
        assert_eq!(set.wire_name(), "Lookup");
        assert_eq!(
            services[0].location.as_deref(),
            Some("http://example.com/svc")
        );
    }

    #[test]
    fn operation_documentation_is_carried() {
        let mut documented = function("Lookup", "string");
        documented.documentation = Some("Looks a widget up.".into());

        let mut classmap = Classmap::default();
        let services = build(&document(vec![documented]), &mut classmap).unwrap();

        assert_eq!(
            services[0].overloads[0].variants[0].documentation.as_deref(),
            Some("Looks a widget up.")
        );
    }

    #[test]
    fn distinct_wire_names_sharing_a_sanitized_name_are_rejected() {
        let document = document(vec![function("Look-up", "string"), function("Look up", "int")]);

        let mut classmap = Classmap::default();
        match build(&document, &mut classmap) {
            Err(Error::AmbiguousWireName {
                function,
                first,
                second,
            }) => {
                assert_eq!(function, "Lookup");
                assert_eq!(first, "Look-up");
                assert_eq!(second, "Look up");
            }
            other => panic!("expected AmbiguousWireName, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn set_and_variant_order_is_first_seen() {
        let document = document(vec![
            function("Beta", "string"),
            function("Alpha", "string"),
            function("Beta", "int"),
        ]);

        let mut classmap = Classmap::default();
        let services = build(&document, &mut classmap).unwrap();

        let names: Vec<_> = services[0]
            .overloads
            .iter()
            .map(|set| set.name.as_str())
            .collect();
        assert_eq!(names, ["Beta", "Alpha"]);
        assert_eq!(services[0].overloads[0].variants.len(), 2);
    }

    #[test]
    fn array_parameters_tag_as_array() {
        let document = document(vec![function("Store", "Widget[]")]);

        let mut classmap = Classmap::default();
        let services = build(&document, &mut classmap).unwrap();

        assert_eq!(services[0].overloads[0].signatures(), ["(array)"]);
    }

    #[test]
    fn class_parameters_tag_by_reference_name() {
        let document = document(vec![function("Store", "tns:Widget")]);

        let mut classmap = Classmap::default();
        let services = build(&document, &mut classmap).unwrap();

        let set = &services[0].overloads[0];
        assert_eq!(set.signatures(), ["(Widget)"]);
        assert_eq!(
            set.variants[0].parameters[0].1.kind,
            TypeKind::Reference("Widget".into())
        );
        assert_eq!(
            set.variants[0].returns.as_ref().unwrap().kind,
            TypeKind::Primitive(Primitive::Str)
        );
    }

    #[test]
    fn service_name_collides_with_class_name() {
        let mut classmap = Classmap::default();
        classmap.sanitize_class_name("Svc", true).unwrap();

        assert!(matches!(
            build(&document(Vec::new()), &mut classmap),
            Err(Error::NamingConflict { .. })
        ));
    }
}
