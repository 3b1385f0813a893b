//! The transport layer generated service stubs delegate to.

use quick_xml::{
    events::{BytesStart, BytesText, Event},
    Reader, Writer,
};
use std::io::{BufRead, BufReader, Cursor, Write};

use bytes::Buf;
use thiserror::Error;

use super::value::{signature_of, Value};

#[derive(Debug, Error)]
pub enum CallError {
    #[error("Invalid parameter types: {signature}")]
    InvalidParameterTypes { signature: String },

    #[error("Transport error")]
    Http(#[from] reqwest::Error),

    #[error("Error reading SOAP message")]
    Xml(#[from] quick_xml::Error),

    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("Response body contained no result")]
    EmptyResponse,
}

/// Checks an argument list against a set of valid signature strings, by
/// exact membership. This is the runtime half of the overload guard emitted
/// into every generated service method.
pub fn check_arguments(arguments: &[Value], valid: &[&str]) -> Result<(), CallError> {
    let signature = signature_of(arguments);

    if !valid.contains(&signature.as_str()) {
        return Err(CallError::InvalidParameterTypes {
            signature: signature.replace(")(", ", "),
        });
    }

    Ok(())
}

/// Client options: the wire-to-generated classmap and the namespace used to
/// build `SOAPAction` headers.
#[derive(Default, Debug, Clone)]
pub struct Settings {
    classmap: Vec<(String, String)>,
    pub action_namespace: Option<String>,
}

impl Settings {
    pub fn has_class(&self, wire_name: &str) -> bool {
        self.classmap.iter().any(|(wire, _)| wire == wire_name)
    }

    pub fn map_class(&mut self, wire_name: &str, class_name: &str) {
        self.classmap
            .push((wire_name.to_owned(), class_name.to_owned()));
    }

    pub fn class_for(&self, wire_name: &str) -> Option<&str> {
        self.classmap
            .iter()
            .find(|(wire, _)| wire == wire_name)
            .map(|(_, class)| class.as_str())
    }
}

pub struct Client {
    client: reqwest::blocking::Client,
    endpoint: String,
    settings: Settings,
}

impl Client {
    pub fn new(endpoint: &str, settings: Settings) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.to_owned(),
            settings,
        }
    }

    /// Performs one operation call: wraps the arguments in a SOAP 1.1
    /// envelope, posts it, and decodes the response body into a [`Value`].
    pub fn call(&self, operation: &str, arguments: &[Value]) -> Result<Value, CallError> {
        let request = build_envelope(operation, arguments)?;

        let action = match &self.settings.action_namespace {
            Some(namespace) => format!("{}/{}", namespace.trim_end_matches('/'), operation),
            None => operation.to_owned(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .header("SOAPAction", action)
            .body(request)
            .send()?;

        parse_envelope(
            BufReader::new(response.bytes()?.reader()),
            &self.settings,
        )
    }
}

fn build_envelope(operation: &str, arguments: &[Value]) -> Result<Vec<u8>, CallError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    let envelope = BytesStart::owned_name("soapenv:Envelope")
        .with_attributes([("xmlns:soapenv", "http://schemas.xmlsoap.org/soap/envelope/")]);
    let body = BytesStart::owned_name("soapenv:Body");
    let call = BytesStart::owned_name(operation.as_bytes().to_vec());

    writer.write_event(Event::Start(envelope.to_borrowed()))?;
    writer.write_event(Event::Start(body.to_borrowed()))?;
    writer.write_event(Event::Start(call.to_borrowed()))?;

    for (index, argument) in arguments.iter().enumerate() {
        let name = match argument {
            Value::Object { class, .. } => class.clone(),
            _ => format!("arg{}", index),
        };
        write_value(&mut writer, &name, argument)?;
    }

    writer.write_event(Event::End(call.to_end()))?;
    writer.write_event(Event::End(body.to_end()))?;
    writer.write_event(Event::End(envelope.to_end()))?;

    Ok(writer.into_inner().into_inner())
}

fn write_value<W: Write>(writer: &mut Writer<W>, name: &str, value: &Value) -> Result<(), CallError> {
    let start = BytesStart::owned_name(name.as_bytes().to_vec());
    writer.write_event(Event::Start(start.to_borrowed()))?;

    match value {
        Value::Integer(value) => write_text(writer, value.to_string())?,
        Value::Double(value) => write_text(writer, value.to_string())?,
        Value::Str(value) => write_text(writer, value.clone())?,

        Value::Array(items) => {
            for item in items {
                write_value(writer, "item", item)?;
            }
        }

        Value::Object { fields, .. } => {
            for (field, value) in fields {
                write_value(writer, field, value)?;
            }
        }
    }

    writer.write_event(Event::End(start.to_end()))?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, text: String) -> Result<(), CallError> {
    writer.write_event(Event::Text(BytesText::from_plain_str(&text)))?;
    Ok(())
}

fn local_name(prefixed: &str) -> &str {
    match prefixed.rsplit_once(':') {
        Some((_, local)) => local,
        None => prefixed,
    }
}

fn parse_envelope<B: BufRead>(read: B, settings: &Settings) -> Result<Value, CallError> {
    let mut reader = Reader::from_reader(read);
    reader.trim_text(true);

    let mut buffer = Vec::new();

    loop {
        match reader.read_event(&mut buffer)? {
            Event::Start(ref start) => {
                let local = local_name(reader.decode(start.name())?).to_owned();

                match local.as_str() {
                    "Envelope" | "Body" => (),

                    "Fault" => {
                        let fault = parse_element(&mut reader, &local, settings)?;
                        return Err(fault_error(&fault));
                    }

                    _ => return parse_element(&mut reader, &local, settings),
                }
            }

            Event::Eof => return Err(CallError::EmptyResponse),

            _ => (),
        }

        buffer.clear();
    }
}

fn fault_error(fault: &Value) -> CallError {
    let text = |name: &str| match fault.field(name) {
        Some(Value::Str(text)) => text.clone(),
        _ => String::new(),
    };

    CallError::Fault {
        code: text("faultcode"),
        message: text("faultstring"),
    }
}

/// Reads the remainder of the current element into a [`Value`]: elements
/// with child elements become objects (classed through the classmap), leaf
/// text becomes the narrowest matching primitive.
fn parse_element<B: BufRead>(
    reader: &mut Reader<B>,
    name: &str,
    settings: &Settings,
) -> Result<Value, CallError> {
    let mut buffer = Vec::new();

    let mut fields: Vec<(String, Value)> = Vec::new();
    let mut text = None;

    loop {
        match reader.read_event(&mut buffer)? {
            Event::Start(ref start) => {
                let child = local_name(reader.decode(start.name())?).to_owned();
                let value = parse_element(reader, &child, settings)?;
                fields.push((child, value));
            }

            Event::Empty(ref start) => {
                let child = local_name(reader.decode(start.name())?).to_owned();
                fields.push((child, Value::Str(String::new())));
            }

            Event::Text(ref event) => {
                let unescaped = event.unescaped()?;
                text = Some(reader.decode(unescaped.as_ref())?.to_owned());
            }

            Event::End(..) => break,

            Event::Eof => {
                return Err(CallError::Xml(quick_xml::Error::UnexpectedEof(
                    name.to_owned(),
                )))
            }

            _ => (),
        }

        buffer.clear();
    }

    if !fields.is_empty() {
        let class = settings.class_for(name).unwrap_or(name).to_owned();
        return Ok(Value::Object { class, fields });
    }

    Ok(leaf(text.unwrap_or_default()))
}

fn leaf(text: String) -> Value {
    if let Ok(value) = text.parse::<i64>() {
        return Value::Integer(value);
    }

    if let Ok(value) = text.parse::<f64>() {
        return Value::Double(value);
    }

    Value::Str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_signature_passes() {
        let valid = ["(string)", "(integer)"];
        assert!(check_arguments(&[Value::from("abc")], &valid).is_ok());
        assert!(check_arguments(&[Value::from(3)], &valid).is_ok());
    }

    #[test]
    fn mismatched_signature_is_rejected_with_readable_types() {
        let valid = ["(string)", "(integer)"];

        match check_arguments(&[Value::from(3.5)], &valid) {
            Err(CallError::InvalidParameterTypes { signature }) => {
                assert_eq!(signature, "(double)");
            }
            other => panic!("expected InvalidParameterTypes, got {:?}", other),
        }

        match check_arguments(&[Value::from("a"), Value::from(1)], &["(integer)(integer)"]) {
            Err(CallError::InvalidParameterTypes { signature }) => {
                assert_eq!(signature, "(string, integer)");
            }
            other => panic!("expected InvalidParameterTypes, got {:?}", other),
        }
    }

    #[test]
    fn settings_merge_does_not_overwrite() {
        let mut settings = Settings::default();
        settings.map_class("Foo", "CallerFoo");

        // The generated constructor only adds entries the caller has not set.
        if !settings.has_class("Foo") {
            settings.map_class("Foo", "GeneratedFoo");
        }
        if !settings.has_class("Bar") {
            settings.map_class("Bar", "Bar");
        }

        assert_eq!(settings.class_for("Foo"), Some("CallerFoo"));
        assert_eq!(settings.class_for("Bar"), Some("Bar"));
    }

    #[test]
    fn envelope_wraps_operation_and_arguments() {
        let arguments = [
            Value::from("abc"),
            Value::Object {
                class: "Widget".into(),
                fields: vec![("Name".into(), Value::from("w"))],
            },
        ];

        let body = build_envelope("Lookup", &arguments).unwrap();
        let body = String::from_utf8(body).unwrap();

        assert!(body.contains("<soapenv:Envelope"));
        assert!(body.contains("<Lookup>"));
        assert!(body.contains("<arg0>abc</arg0>"));
        assert!(body.contains("<Widget>"));
        assert!(body.contains("<Name>w</Name>"));
    }

    #[test]
    fn response_body_decodes_through_classmap() {
        let mut settings = Settings::default();
        settings.map_class("LookupResponse", "LookupResult");

        let response = r#"<?xml version="1.0"?>
            <soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
              <soapenv:Body>
                <LookupResponse>
                  <count>3</count>
                  <ratio>1.5</ratio>
                  <name>widget</name>
                </LookupResponse>
              </soapenv:Body>
            </soapenv:Envelope>"#;

        let value = parse_envelope(response.as_bytes(), &settings).unwrap();

        assert_eq!(value.kind(), "LookupResult");
        assert_eq!(value.field("count"), Some(&Value::Integer(3)));
        assert_eq!(value.field("ratio"), Some(&Value::Double(1.5)));
        assert_eq!(value.field("name"), Some(&Value::Str("widget".into())));
    }

    #[test]
    fn faults_surface_as_errors() {
        let response = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
              <soapenv:Body>
                <soapenv:Fault>
                  <faultcode>Server</faultcode>
                  <faultstring>boom</faultstring>
                </soapenv:Fault>
              </soapenv:Body>
            </soapenv:Envelope>"#;

        match parse_envelope(response.as_bytes(), &Settings::default()) {
            Err(CallError::Fault { code, message }) => {
                assert_eq!(code, "Server");
                assert_eq!(message, "boom");
            }
            other => panic!("expected Fault, got {:?}", other),
        }
    }
}
