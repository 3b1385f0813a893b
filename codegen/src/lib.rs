//! Interprets the intermediate WSDL tree into generated client source
//! artifacts: one data class per message type and one client stub per
//! service, with same-named operations folded into overload sets guarded by
//! parameter-type signatures.

use lather_wsdl::{self as wsdl, document::Document};

mod classes;
mod emit;
mod services;
mod typemap;

pub mod error;
pub mod model;
pub mod sanitize;

pub use error::Error;
pub use model::{Artifact, ArtifactKind};
pub use typemap::map_type;

/// Loads, transforms and interprets a WSDL in one step.
pub fn from_url<S: AsRef<str>>(locator: S) -> Result<Vec<Artifact>, Error> {
    let document = wsdl::parse(locator)?;
    interpret(&document)
}

/// Interprets an intermediate tree into the full artifact set: class
/// artifacts first, in base-before-derived order, then one stub per service,
/// each embedding the complete run classmap. Any failure aborts the run with
/// no artifacts.
pub fn interpret(document: &Document) -> Result<Vec<Artifact>, Error> {
    let mut classmap = sanitize::Classmap::default();

    let classes = classes::build(document, &mut classmap)?;
    let services = services::build(document, &mut classmap)?;

    let mut artifacts: Vec<_> = classes.iter().map(emit::data_class).collect();
    artifacts.extend(
        services
            .iter()
            .map(|service| emit::service_class(service, &classmap)),
    );

    Ok(artifacts)
}
