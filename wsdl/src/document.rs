//! The intermediate tree handed to the interpreter.
//!
//! The transform boils a parsed WSDL down to this form: one `class` node per
//! message type, one `service` node per service, with every cross-reference
//! (bindings, port types, messages) already resolved away. Type strings are
//! the raw schema names, suffixed with `[]` for unbounded elements.

#[derive(Default, Debug, Clone)]
pub struct Document {
    pub classes: Vec<ClassNode>,
    pub services: Vec<ServiceNode>,
}

#[derive(Debug, Clone)]
pub struct ClassNode {
    pub name: String,
    pub extends: Option<String>,
    pub entries: Vec<EntryNode>,
}

/// A named, typed slot: a class field or a function parameter.
#[derive(Debug, Clone)]
pub struct EntryNode {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone)]
pub struct ServiceNode {
    pub name: String,
    /// The address of the service's first located port, if any.
    pub location: Option<String>,
    pub functions: Vec<FunctionNode>,
}

#[derive(Debug, Clone)]
pub struct FunctionNode {
    pub name: String,
    pub documentation: Option<String>,
    pub parameters: Vec<EntryNode>,
    pub returns: Option<String>,
}
