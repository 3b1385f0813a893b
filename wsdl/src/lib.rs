use std::path::Path;
use url::Url;

mod parser;
mod transform;

pub mod document;
pub mod error;
pub mod types;

fn to_url<S: AsRef<str>>(locator: S) -> Result<Url, error::Error> {
    match Url::parse(locator.as_ref()) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Url::from_file_path(
            Path::new(locator.as_ref())
                .canonicalize()
                .map_err(|err| error::Error::PathConversionError(Some(err)))?,
        )
        .map_err(|()| error::Error::PathConversionError(None))?),
        Err(err) => Err(err.into()),
    }
}

/// Loads a WSDL from a URL or filesystem path, splicing in any imported
/// documents, and returns the raw definition.
pub fn load<S: AsRef<str>>(locator: S) -> Result<types::Definition, error::Error> {
    parser::parse(to_url(locator)?)
}

/// Loads a WSDL and lowers it to the intermediate tree in one step.
pub fn parse<S: AsRef<str>>(locator: S) -> Result<document::Document, error::Error> {
    let definition = load(locator)?;
    transform::transform(&definition)
}
