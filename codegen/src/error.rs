use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error loading WSDL document")]
    Wsdl(#[from] lather_wsdl::error::Error),

    #[error("Class {name} already defined in this run")]
    NamingConflict { name: String },

    #[error("Name {name} has no valid identifier form")]
    UnnameableIdentifier { name: String },

    #[error("Unresolvable class hierarchy: {}", names.join(", "))]
    UnresolvableHierarchy { names: Vec<String> },

    #[error("Functions named {function} dispatch to different wire operations: {first} and {second}")]
    AmbiguousWireName {
        function: String,
        first: String,
        second: String,
    },
}
