//! Raw parse model for a WSDL document, before the transform resolves the
//! cross-references between services, bindings, port types and messages.

#[derive(Default, Debug, Clone)]
pub struct Definition {
    pub types: Vec<SchemaType>,
    pub messages: Vec<Message>,
    pub port_types: Vec<PortType>,
    pub bindings: Vec<Binding>,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone)]
pub struct SchemaType {
    pub name: String,
    pub kind: SchemaTypeKind,
}

#[derive(Debug, Clone)]
pub enum SchemaTypeKind {
    Struct {
        base: Option<String>,
        fields: Vec<SchemaField>,
    },
    /// A top-level element or simpleType restriction naming another type.
    Alias(String),
}

#[derive(Debug, Clone)]
pub struct SchemaField {
    pub name: String,
    pub ty: String,
    pub unbounded: bool,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub documentation: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PortType {
    pub name: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub port_type: String,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub name: String,
    pub binding: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub ports: Vec<Port>,
}
