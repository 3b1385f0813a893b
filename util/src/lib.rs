//! Runtime support for generated service stubs: the dynamic [`Value`] type,
//! the signature matcher, and the SOAP transport client.

pub mod soap;
pub mod value;

pub use soap::check_arguments;
pub use value::{signature_of, Value};
