//! Interpreted forms of the intermediate tree, ready for emission.

use proc_macro2::TokenStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Integer,
    Double,
    Str,
}

impl Primitive {
    /// The tag used in parameter signature strings.
    pub fn tag(self) -> &'static str {
        match self {
            Primitive::Integer => "integer",
            Primitive::Double => "double",
            Primitive::Str => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(Primitive),
    /// Points at a class definition by sanitized name.
    Reference(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeKind,
    pub is_array: bool,
}

impl TypeRef {
    /// The tag this type contributes to a parameter signature: `array` for
    /// any array type, otherwise the primitive tag or referenced class name.
    pub fn signature_tag(&self) -> &str {
        if self.is_array {
            return "array";
        }

        match &self.kind {
            TypeKind::Primitive(primitive) => primitive.tag(),
            TypeKind::Reference(name) => name,
        }
    }

    /// Human-readable rendering for generated documentation.
    pub fn describe(&self) -> String {
        let base = match &self.kind {
            TypeKind::Primitive(primitive) => primitive.tag(),
            TypeKind::Reference(name) => name,
        };

        if self.is_array {
            format!("{}[]", base)
        } else {
            base.to_owned()
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub original_name: String,
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub base: Option<String>,
    pub fields: Vec<FieldDef>,
}

impl ClassDef {
    /// Original-to-sanitized pairs for every field whose wire name is not
    /// already a valid identifier.
    pub fn wire_aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|field| field.original_name != field.name)
            .map(|field| (field.original_name.as_str(), field.name.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct OperationVariant {
    /// The operation name as it appears on the wire, before sanitization.
    pub wire_name: String,
    pub documentation: Option<String>,
    pub parameters: Vec<(String, TypeRef)>,
    pub returns: Option<TypeRef>,
}

impl OperationVariant {
    /// The serialized parameter signature, `(tag)(tag)...`.
    pub fn signature(&self) -> String {
        self.parameters
            .iter()
            .map(|(_, ty)| format!("({})", ty.signature_tag()))
            .collect()
    }
}

/// Operations sharing a sanitized name, dispatched at call time by parameter
/// signature. All variants share one wire name; the builder rejects sets
/// whose variants would dispatch to different wire operations.
#[derive(Debug, Clone)]
pub struct OverloadSet {
    pub name: String,
    pub variants: Vec<OperationVariant>,
}

impl OverloadSet {
    pub fn wire_name(&self) -> &str {
        &self.variants[0].wire_name
    }

    pub fn signatures(&self) -> Vec<String> {
        self.variants
            .iter()
            .map(OperationVariant::signature)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ServiceDef {
    pub name: String,
    /// The service's advertised endpoint, baked into the generated stub as
    /// its default.
    pub location: Option<String>,
    pub overloads: Vec<OverloadSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Class,
    Service,
}

/// A named generated source artifact. The interpreter hands these back in
/// emission order; persisting them is the caller's concern.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub tokens: TokenStream,
}
