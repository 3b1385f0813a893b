use quick_xml::{
    events::{attributes::Attributes, Event},
    Reader,
};
use std::io::{BufRead, BufReader};
use url::Url;

use super::{
    error::Error,
    types::{
        Binding, Definition, Message, Operation, Part, Port, PortType, SchemaField, SchemaType,
        SchemaTypeKind, Service,
    },
};

fn get_attributes<B: BufRead, const N: usize>(
    reader: &Reader<B>,
    attributes: Attributes<'_>,
    names: [&'static str; N],
) -> Result<[Option<String>; N], Error> {
    const INIT: Option<String> = None;
    let mut result = [INIT; N];

    for attribute in attributes {
        let attribute = attribute?;
        let key = reader.decode(attribute.key)?;

        for (index, name) in names.iter().enumerate() {
            if key == *name {
                result[index] = Some(reader.decode(attribute.value.as_ref())?.to_owned());
                break;
            }
        }
    }

    Ok(result)
}

/// Strips any namespace prefix, leaving the local part of a QName.
fn local_name(prefixed: &str) -> &str {
    match prefixed.rsplit_once(':') {
        Some((_, local)) => local,
        None => prefixed,
    }
}

fn required(value: Option<String>, attr: &'static str, element: &'static str) -> Result<String, Error> {
    value.ok_or(Error::MissingAttribute(attr, element))
}

pub struct Parser {
    root: Url,
    definition: Definition,
}

impl Parser {
    fn new(url: Url) -> Self {
        Self {
            root: url,
            definition: Default::default(),
        }
    }

    fn parse(mut self) -> Result<Definition, Error> {
        self.parse_url(self.root.clone())?;
        Ok(self.definition)
    }

    fn parse_url(&mut self, url: Url) -> Result<(), Error> {
        match url.scheme() {
            "file" => {
                let mut reader = Reader::from_file(
                    url.to_file_path()
                        .map_err(|()| Error::PathConversionError(None))?,
                )
                .map_err(Error::FileOpenError)?;
                reader.trim_text(true);
                self.parse_xml(reader)
            }

            "http" | "https" => {
                let mut reader =
                    Reader::from_reader(BufReader::new(reqwest::blocking::get(url.clone())?));
                reader.trim_text(true);
                self.parse_xml(reader)
            }

            other => Err(Error::UnsupportedScheme(other.into())),
        }
    }

    /// Top-level event loop. The `definitions`, `types` and `schema`
    /// containers are transparent; every other recognised element is consumed
    /// whole by a dedicated sub-parser, so this loop only ever sees
    /// document-scope declarations.
    fn parse_xml<B: BufRead>(&mut self, mut reader: Reader<B>) -> Result<(), Error> {
        let mut buffer = Vec::new();

        loop {
            let event = reader.read_event(&mut buffer)?;
            match event {
                Event::Start(ref start) | Event::Empty(ref start) => {
                    let is_empty = matches!(event, Event::Empty(..));
                    let raw_name = start.name().to_owned();
                    let local = local_name(reader.decode(&raw_name)?).to_owned();
                    let attributes = start.attributes();

                    match local.as_str() {
                        "definitions" | "types" | "schema" => (),

                        "import" | "include" => {
                            let [location, schema_location] = get_attributes(
                                &reader,
                                attributes,
                                ["location", "schemaLocation"],
                            )?;

                            let location =
                                required(location.or(schema_location), "location", "import")?;

                            self.parse_url(self.root.join(&location)?)?;

                            if !is_empty {
                                reader.read_to_end(&raw_name, &mut Vec::new())?;
                            }
                        }

                        "complexType" => {
                            let [name] = get_attributes(&reader, attributes, ["name"])?;
                            let name = required(name, "name", "complexType")?;

                            let kind = if is_empty {
                                SchemaTypeKind::Struct {
                                    base: None,
                                    fields: Vec::new(),
                                }
                            } else {
                                parse_complex_type(&mut reader)?
                            };

                            self.definition.types.push(SchemaType { name, kind });
                        }

                        "element" => {
                            let [name, ty] = get_attributes(&reader, attributes, ["name", "type"])?;
                            let name = required(name, "name", "element")?;

                            let kind = match ty {
                                Some(ty) => {
                                    if !is_empty {
                                        reader.read_to_end(&raw_name, &mut Vec::new())?;
                                    }
                                    Some(SchemaTypeKind::Alias(local_name(&ty).to_owned()))
                                }
                                None if !is_empty => parse_top_element(&mut reader)?,
                                None => None,
                            };

                            if let Some(kind) = kind {
                                self.definition.types.push(SchemaType { name, kind });
                            }
                        }

                        "simpleType" => {
                            let [name] = get_attributes(&reader, attributes, ["name"])?;
                            let name = required(name, "name", "simpleType")?;

                            if !is_empty {
                                if let Some(base) = parse_simple_type(&mut reader)? {
                                    self.definition.types.push(SchemaType {
                                        name,
                                        kind: SchemaTypeKind::Alias(base),
                                    });
                                }
                            }
                        }

                        "message" => {
                            let [name] = get_attributes(&reader, attributes, ["name"])?;
                            let name = required(name, "name", "message")?;

                            let parts = if is_empty {
                                Vec::new()
                            } else {
                                parse_message(&mut reader)?
                            };

                            self.definition.messages.push(Message { name, parts });
                        }

                        "portType" => {
                            let [name] = get_attributes(&reader, attributes, ["name"])?;
                            let name = required(name, "name", "portType")?;

                            let operations = if is_empty {
                                Vec::new()
                            } else {
                                parse_port_type(&mut reader)?
                            };

                            self.definition
                                .port_types
                                .push(PortType { name, operations });
                        }

                        "binding" => {
                            let [name, ty] = get_attributes(&reader, attributes, ["name", "type"])?;
                            let name = required(name, "name", "binding")?;
                            let port_type = local_name(&required(ty, "type", "binding")?).to_owned();

                            if !is_empty {
                                reader.read_to_end(&raw_name, &mut Vec::new())?;
                            }

                            self.definition.bindings.push(Binding { name, port_type });
                        }

                        "service" => {
                            let [name] = get_attributes(&reader, attributes, ["name"])?;
                            let name = required(name, "name", "service")?;

                            let ports = if is_empty {
                                Vec::new()
                            } else {
                                parse_service(&mut reader)?
                            };

                            self.definition.services.push(Service { name, ports });
                        }

                        _ => {
                            if !is_empty {
                                reader.read_to_end(&raw_name, &mut Vec::new())?;
                            }
                        }
                    }
                }

                Event::Eof => break,

                _ => (),
            }

            buffer.clear();
        }

        Ok(())
    }
}

/// Consumes the body of a `complexType`, through any `complexContent` /
/// `simpleContent` wrapper, collecting the extension base and sequence fields.
fn parse_complex_type<B: BufRead>(reader: &mut Reader<B>) -> Result<SchemaTypeKind, Error> {
    let mut buffer = Vec::new();
    let mut depth = 1usize;

    let mut base = None;
    let mut simple_content = false;
    let mut fields = Vec::new();

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();
                let attributes = start.attributes();

                match local.as_str() {
                    "complexContent" | "simpleContent" | "extension" => {
                        if local == "simpleContent" {
                            simple_content = true;
                        }

                        if local == "extension" {
                            let [extension_base] = get_attributes(reader, attributes, ["base"])?;
                            base = Some(local_name(&required(extension_base, "base", "extension")?).to_owned());
                        }

                        if !is_empty {
                            depth += 1;
                        }
                    }

                    "sequence" | "all" => {
                        if !is_empty {
                            parse_sequence(reader, &mut fields)?;
                        }
                    }

                    _ => {
                        if !is_empty {
                            reader.read_to_end(&raw_name, &mut Vec::new())?;
                        }
                    }
                }
            }

            Event::End(..) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("complexType".into()))),

            _ => (),
        }

        buffer.clear();
    }

    if simple_content {
        if let Some(base) = base {
            return Ok(SchemaTypeKind::Alias(base));
        }
    }

    Ok(SchemaTypeKind::Struct { base, fields })
}

fn parse_sequence<B: BufRead>(
    reader: &mut Reader<B>,
    fields: &mut Vec<SchemaField>,
) -> Result<(), Error> {
    let mut buffer = Vec::new();

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();
                let attributes = start.attributes();

                if local == "element" {
                    let [name, ty, max_occurs] =
                        get_attributes(reader, attributes, ["name", "type", "maxOccurs"])?;

                    if let (Some(name), Some(ty)) = (name, ty) {
                        let unbounded = match max_occurs.as_deref() {
                            Some("unbounded") => true,
                            Some(count) => count.parse::<u64>().map_or(false, |count| count > 1),
                            None => false,
                        };

                        fields.push(SchemaField {
                            name,
                            ty: local_name(&ty).to_owned(),
                            unbounded,
                        });
                    }
                }

                if !is_empty {
                    reader.read_to_end(&raw_name, &mut Vec::new())?;
                }
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("sequence".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(())
}

/// An `element` with no `type` attribute: look for an anonymous inline
/// `complexType` declaring the shape.
fn parse_top_element<B: BufRead>(reader: &mut Reader<B>) -> Result<Option<SchemaTypeKind>, Error> {
    let mut buffer = Vec::new();
    let mut kind = None;

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();

                if local == "complexType" && !is_empty {
                    kind = Some(parse_complex_type(reader)?);
                } else if !is_empty {
                    reader.read_to_end(&raw_name, &mut Vec::new())?;
                }
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("element".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(kind)
}

fn parse_simple_type<B: BufRead>(reader: &mut Reader<B>) -> Result<Option<String>, Error> {
    let mut buffer = Vec::new();
    let mut base = None;

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();
                let attributes = start.attributes();

                if local == "restriction" {
                    let [restriction_base] = get_attributes(reader, attributes, ["base"])?;
                    base = Some(local_name(&required(restriction_base, "base", "restriction")?).to_owned());
                }

                if !is_empty {
                    reader.read_to_end(&raw_name, &mut Vec::new())?;
                }
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("simpleType".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(base)
}

fn parse_message<B: BufRead>(reader: &mut Reader<B>) -> Result<Vec<Part>, Error> {
    let mut buffer = Vec::new();
    let mut parts = Vec::new();

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();
                let attributes = start.attributes();

                if local == "part" {
                    let [name, element, ty] =
                        get_attributes(reader, attributes, ["name", "element", "type"])?;

                    let name = required(name, "name", "part")?;
                    let ty = required(element.or(ty), "element", "part")?;

                    parts.push(Part {
                        name,
                        ty: local_name(&ty).to_owned(),
                    });
                }

                if !is_empty {
                    reader.read_to_end(&raw_name, &mut Vec::new())?;
                }
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("message".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(parts)
}

fn parse_port_type<B: BufRead>(reader: &mut Reader<B>) -> Result<Vec<Operation>, Error> {
    let mut buffer = Vec::new();
    let mut operations = Vec::new();

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();
                let attributes = start.attributes();

                if local == "operation" {
                    let [name] = get_attributes(reader, attributes, ["name"])?;
                    let name = required(name, "name", "operation")?;

                    let operation = if is_empty {
                        Operation {
                            name,
                            documentation: None,
                            input: None,
                            output: None,
                        }
                    } else {
                        parse_operation(reader, name)?
                    };

                    operations.push(operation);
                } else if !is_empty {
                    reader.read_to_end(&raw_name, &mut Vec::new())?;
                }
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("portType".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(operations)
}

fn parse_operation<B: BufRead>(reader: &mut Reader<B>, name: String) -> Result<Operation, Error> {
    let mut buffer = Vec::new();

    let mut documentation = None;
    let mut input = None;
    let mut output = None;

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();
                let attributes = start.attributes();

                match local.as_str() {
                    "input" | "output" => {
                        let [message] = get_attributes(reader, attributes, ["message"])?;
                        let message =
                            Some(local_name(&required(message, "message", "operation")?).to_owned());

                        if local == "input" {
                            input = message;
                        } else {
                            output = message;
                        }

                        if !is_empty {
                            reader.read_to_end(&raw_name, &mut Vec::new())?;
                        }
                    }

                    "documentation" if !is_empty => {
                        documentation = parse_documentation(reader)?;
                    }

                    _ => {
                        if !is_empty {
                            reader.read_to_end(&raw_name, &mut Vec::new())?;
                        }
                    }
                }
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("operation".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(Operation {
        name,
        documentation,
        input,
        output,
    })
}

fn parse_documentation<B: BufRead>(reader: &mut Reader<B>) -> Result<Option<String>, Error> {
    let mut buffer = Vec::new();
    let mut text = None;

    loop {
        match reader.read_event(&mut buffer)? {
            Event::Text(event) => {
                let unescaped = event.unescaped()?;
                text = Some(reader.decode(unescaped.as_ref())?.to_owned());
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("documentation".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(text)
}

fn parse_service<B: BufRead>(reader: &mut Reader<B>) -> Result<Vec<Port>, Error> {
    let mut buffer = Vec::new();
    let mut ports = Vec::new();

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();
                let attributes = start.attributes();

                if local == "port" {
                    let [name, binding] = get_attributes(reader, attributes, ["name", "binding"])?;

                    let name = required(name, "name", "port")?;
                    let binding = local_name(&required(binding, "binding", "port")?).to_owned();

                    let location = if is_empty {
                        None
                    } else {
                        parse_port(reader)?
                    };

                    ports.push(Port {
                        name,
                        binding,
                        location,
                    });
                } else if !is_empty {
                    reader.read_to_end(&raw_name, &mut Vec::new())?;
                }
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("service".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(ports)
}

fn parse_port<B: BufRead>(reader: &mut Reader<B>) -> Result<Option<String>, Error> {
    let mut buffer = Vec::new();
    let mut location = None;

    loop {
        let event = reader.read_event(&mut buffer)?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(..));
                let raw_name = start.name().to_owned();
                let local = local_name(reader.decode(&raw_name)?).to_owned();
                let attributes = start.attributes();

                if local == "address" {
                    let [address] = get_attributes(reader, attributes, ["location"])?;
                    location = address;
                }

                if !is_empty {
                    reader.read_to_end(&raw_name, &mut Vec::new())?;
                }
            }

            Event::End(..) => break,

            Event::Eof => return Err(Error::XmlParseError(quick_xml::Error::UnexpectedEof("port".into()))),

            _ => (),
        }

        buffer.clear();
    }

    Ok(location)
}

pub fn parse(url: Url) -> Result<Definition, Error> {
    Parser::new(url).parse()
}
