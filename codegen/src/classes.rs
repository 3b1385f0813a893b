//! Builds and orders class definitions from the intermediate tree.

use lather_wsdl::document::Document;

use super::{
    error::Error,
    model::{ClassDef, FieldDef},
    sanitize::{sanitize, sanitize_member, Classmap},
    typemap::map_type,
};

/// Interprets every `class` node and returns the definitions ordered so that
/// each base class precedes every class extending it. Registers each class in
/// the run classmap as it is sanitized.
pub fn build(document: &Document, classmap: &mut Classmap) -> Result<Vec<ClassDef>, Error> {
    let mut pending = Vec::new();

    for class in &document.classes {
        let name = classmap.sanitize_class_name(&class.name, true)?;
        let base = class.extends.as_deref().map(sanitize);

        let mut fields = Vec::new();
        for entry in &class.entries {
            let ty = map_type(&entry.ty);

            // A reference type whose name sanitized away entirely can never
            // be emitted.
            if matches!(&ty.kind, crate::model::TypeKind::Reference(name) if name.is_empty()) {
                return Err(Error::UnnameableIdentifier {
                    name: entry.ty.clone(),
                });
            }

            fields.push(FieldDef {
                original_name: entry.name.clone(),
                name: sanitize_member(&entry.name)?,
                ty,
            });
        }

        pending.push(ClassDef { name, base, fields });
    }

    resolve(pending)
}

/// Fixed-point resolution: each full pass moves every class whose base is
/// already resolved (or absent) into the output. A pass with no movement and
/// classes still pending means a cycle or a dangling base.
fn resolve(mut pending: Vec<ClassDef>) -> Result<Vec<ClassDef>, Error> {
    let mut resolved = Vec::with_capacity(pending.len());
    let mut resolved_names: Vec<String> = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let before = pending.len();
        let mut stuck = Vec::new();

        for class in pending {
            let ready = match &class.base {
                Some(base) => resolved_names.iter().any(|name| name == base),
                None => true,
            };

            if ready {
                resolved_names.push(class.name.clone());
                resolved.push(class);
            } else {
                stuck.push(class);
            }
        }

        pending = stuck;

        if pending.len() == before {
            return Err(Error::UnresolvableHierarchy {
                names: pending.into_iter().map(|class| class.name).collect(),
            });
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lather_wsdl::document::{ClassNode, EntryNode};

    fn class(name: &str, extends: Option<&str>) -> ClassNode {
        ClassNode {
            name: name.into(),
            extends: extends.map(Into::into),
            entries: Vec::new(),
        }
    }

    fn document(classes: Vec<ClassNode>) -> Document {
        Document {
            classes,
            services: Vec::new(),
        }
    }

    #[test]
    fn bases_precede_derived_classes() {
        // Declared most-derived first to force reordering.
        let document = document(vec![
            class("C", Some("B")),
            class("B", Some("A")),
            class("A", None),
        ]);

        let mut classmap = Classmap::default();
        let classes = build(&document, &mut classmap).unwrap();

        let names: Vec<_> = classes.iter().map(|class| class.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn cyclic_hierarchy_reports_all_stuck_classes() {
        let document = document(vec![class("A", Some("B")), class("B", Some("A"))]);

        let mut classmap = Classmap::default();
        match build(&document, &mut classmap) {
            Err(Error::UnresolvableHierarchy { mut names }) => {
                names.sort();
                assert_eq!(names, ["A", "B"]);
            }
            other => panic!("expected UnresolvableHierarchy, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn dangling_base_is_unresolvable() {
        let document = document(vec![class("A", Some("Missing"))]);

        let mut classmap = Classmap::default();
        assert!(matches!(
            build(&document, &mut classmap),
            Err(Error::UnresolvableHierarchy { .. })
        ));
    }

    #[test]
    fn duplicate_sanitized_names_conflict() {
        let document = document(vec![class("Foo!", None), class("Foo?", None)]);

        let mut classmap = Classmap::default();
        assert!(matches!(
            build(&document, &mut classmap),
            Err(Error::NamingConflict { .. })
        ));
    }

    #[test]
    fn unnameable_field_type_is_rejected() {
        let document = document(vec![ClassNode {
            name: "Foo".into(),
            extends: None,
            entries: vec![EntryNode {
                name: "bar".into(),
                ty: "tns:!!!".into(),
            }],
        }]);

        let mut classmap = Classmap::default();
        match build(&document, &mut classmap) {
            Err(Error::UnnameableIdentifier { name }) => assert_eq!(name, "tns:!!!"),
            other => panic!(
                "expected UnnameableIdentifier, got {:?}",
                other.map(|_| ())
            ),
        }
    }

    #[test]
    fn fields_are_sanitized_and_typed() {
        let document = document(vec![ClassNode {
            name: "Foo".into(),
            extends: None,
            entries: vec![
                EntryNode {
                    name: "Bar".into(),
                    ty: "string".into(),
                },
                EntryNode {
                    name: "My-Field".into(),
                    ty: "int".into(),
                },
            ],
        }]);

        let mut classmap = Classmap::default();
        let classes = build(&document, &mut classmap).unwrap();

        let fields = &classes[0].fields;
        assert_eq!(fields[0].name, "Bar");
        assert_eq!(fields[1].name, "MyField");
        assert_eq!(fields[1].original_name, "My-Field");

        let aliases: Vec<_> = classes[0].wire_aliases().collect();
        assert_eq!(aliases, [("My-Field", "MyField")]);
    }
}
