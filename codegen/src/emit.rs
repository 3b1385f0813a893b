//! Emits one source artifact per class and per service definition.
//!
//! Both emitters are pure: tokens out, no filesystem contact. Rendering and
//! placement of the artifacts belongs to the caller.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{
    model::{Artifact, ArtifactKind, ClassDef, OverloadSet, Primitive, ServiceDef, TypeKind, TypeRef},
    sanitize::Classmap,
};

fn type_tokens(ty: &TypeRef) -> TokenStream {
    let base = match &ty.kind {
        TypeKind::Primitive(Primitive::Integer) => quote!(i64),
        TypeKind::Primitive(Primitive::Double) => quote!(f64),
        TypeKind::Primitive(Primitive::Str) => quote!(String),
        TypeKind::Reference(name) => {
            let ident = format_ident!("{}", name);
            quote!(#ident)
        }
    };

    if ty.is_array {
        quote!(Vec<#base>)
    } else {
        base
    }
}

/// Emits the data class for one resolved [`ClassDef`]: a plain struct with a
/// public field per entry, the extension base embedded as a leading `base`
/// field, and, when any field was renamed during sanitization, a wire-alias
/// table plus an accessor pair per renamed field so wire-layer code can still
/// address the field by its original schema name.
pub fn data_class(class: &ClassDef) -> Artifact {
    let ident = format_ident!("{}", class.name);
    let doc = format!(" Generated from the WSDL message type `{}`.", class.name);

    let base_field = class.base.as_ref().map(|base| {
        let base = format_ident!("{}", base);
        quote! {
            /// Fields inherited from the extension base.
            pub base: #base,
        }
    });

    let fields = class.fields.iter().map(|field| {
        let name = format_ident!("{}", field.name);
        let ty = type_tokens(&field.ty);
        let doc = format!(" Schema type `{}`.", field.ty.describe());
        quote! {
            #[doc = #doc]
            pub #name: #ty,
        }
    });

    let aliases: Vec<_> = class.wire_aliases().collect();
    let alias_impl = if aliases.is_empty() {
        quote!()
    } else {
        let pairs = aliases.iter().map(|(wire, field)| quote! { (#wire, #field) });

        let accessors = class
            .fields
            .iter()
            .filter(|field| field.original_name != field.name)
            .map(|field| {
                let get = format_ident!("get_{}", field.name);
                let set = format_ident!("set_{}", field.name);
                let name = format_ident!("{}", field.name);
                let ty = type_tokens(&field.ty);
                let doc = format!(" Accessor pair for the wire name `{}`.", field.original_name);
                quote! {
                    #[doc = #doc]
                    pub fn #get(&self) -> &#ty {
                        &self.#name
                    }

                    pub fn #set(&mut self, value: #ty) {
                        self.#name = value;
                    }
                }
            });

        quote! {
            #[allow(non_snake_case)]
            impl #ident {
                /// Wire names that differ from their sanitized field names.
                pub const WIRE_ALIASES: &'static [(&'static str, &'static str)] = &[#(#pairs),*];

                /// Resolves an original schema field name to the generated
                /// field answering for it.
                pub fn field_for_wire_name(name: &str) -> Option<&'static str> {
                    Self::WIRE_ALIASES
                        .iter()
                        .find(|(wire, _)| *wire == name)
                        .map(|(_, field)| *field)
                }

                #(#accessors)*
            }
        }
    };

    let tokens = quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Default)]
        #[allow(non_snake_case)]
        pub struct #ident {
            #base_field
            #(#fields)*
        }

        #alias_impl
    };

    Artifact {
        name: class.name.clone(),
        kind: ArtifactKind::Class,
        tokens,
    }
}

/// Emits the client stub for one [`ServiceDef`]: the classmap literal, the
/// advertised endpoint with a default constructor using it, an
/// endpoint-taking constructor merging the classmap into caller settings,
/// and one method per overload set.
pub fn service_class(service: &ServiceDef, classmap: &Classmap) -> Artifact {
    let ident = format_ident!("{}", service.name);
    let doc = format!(" Generated client stub for the `{}` service.", service.name);

    let classmap_pairs = classmap
        .entries()
        .iter()
        .map(|(wire, class)| quote! { (#wire, #class) });

    let methods = service.overloads.iter().map(service_function);

    let default_constructor = service.location.as_deref().map(|location| {
        quote! {
            /// The endpoint the service advertised when this stub was
            /// generated.
            pub const ENDPOINT: &'static str = #location;

            /// Builds a stub against the advertised endpoint.
            pub fn new(settings: lather_util::soap::Settings) -> Self {
                Self::with_endpoint(Self::ENDPOINT, settings)
            }
        }
    });

    let tokens = quote! {
        #[doc = #doc]
        pub struct #ident {
            client: lather_util::soap::Client,
        }

        #[allow(non_snake_case)]
        impl #ident {
            /// Default mapping from wire type names to generated classes,
            /// covering every class interpreted in this run.
            pub const CLASSMAP: &'static [(&'static str, &'static str)] = &[#(#classmap_pairs),*];

            #default_constructor

            /// Builds a stub against `endpoint`, merging the default classmap
            /// into `settings` without overwriting caller entries.
            pub fn with_endpoint(endpoint: &str, mut settings: lather_util::soap::Settings) -> Self {
                for (wire_name, class_name) in Self::CLASSMAP {
                    if !settings.has_class(wire_name) {
                        settings.map_class(*wire_name, *class_name);
                    }
                }

                Self {
                    client: lather_util::soap::Client::new(endpoint, settings),
                }
            }

            #(#methods)*
        }
    };

    Artifact {
        name: service.name.clone(),
        kind: ArtifactKind::Service,
        tokens,
    }
}

fn service_function(set: &OverloadSet) -> TokenStream {
    let ident = format_ident!("{}", set.name);
    let wire_name = set.wire_name();

    let signatures = set.signatures();
    let valid = signatures.iter().map(|signature| quote! { #signature });

    let mut documentation: Vec<String> = Vec::new();
    for variant in &set.variants {
        if let Some(text) = &variant.documentation {
            let line = format!(" {}", text);
            if !documentation.contains(&line) {
                documentation.push(line);
            }
        }
    }

    let doc_head = format!(" Service call `{}`. Parameter options:", wire_name);
    let option_docs = set.variants.iter().map(|variant| {
        if variant.parameters.is_empty() {
            " (none)".to_owned()
        } else {
            let rendered: Vec<_> = variant
                .parameters
                .iter()
                .map(|(name, ty)| format!("({}) {}", ty.describe(), name))
                .collect();
            format!(" {}", rendered.join(", "))
        }
    });

    let mut return_options: Vec<String> = Vec::new();
    for variant in &set.variants {
        if let Some(returns) = &variant.returns {
            let rendered = returns.describe();
            if !return_options.contains(&rendered) {
                return_options.push(rendered);
            }
        }
    }
    let returns_doc = format!(" Returns: {}", return_options.join(" | "));

    quote! {
        #(#[doc = #documentation])*
        #[doc = #doc_head]
        #(#[doc = #option_docs])*
        #[doc = #returns_doc]
        pub fn #ident(
            &self,
            arguments: &[lather_util::Value],
        ) -> Result<lather_util::Value, lather_util::soap::CallError> {
            const VALID: &[&str] = &[#(#valid),*];
            lather_util::check_arguments(arguments, VALID)?;
            self.client.call(#wire_name, arguments)
        }
    }
}
