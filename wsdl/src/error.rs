use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse provided URL")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unable to convert provided path")]
    PathConversionError(Option<std::io::Error>),

    #[error("Unable to open file")]
    FileOpenError(quick_xml::Error),

    #[error("Unable to get document from server")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("Error parsing XML input")]
    XmlParseError(#[from] quick_xml::Error),

    #[error("Missing required attribute {0} on <{1}>")]
    MissingAttribute(&'static str, &'static str),

    #[error("Port {port} references unknown binding {binding}")]
    MissingBinding { port: String, binding: String },

    #[error("Binding {binding} references unknown port type {port_type}")]
    MissingPortType { binding: String, port_type: String },

    #[error("Operation {operation} references unknown message {message}")]
    MissingMessage { operation: String, message: String },
}
