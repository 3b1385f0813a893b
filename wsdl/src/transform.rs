//! Lowers a parsed [`Definition`](crate::types::Definition) into the
//! intermediate tree consumed by the interpreter.
//!
//! This resolves the WSDL indirection chain (service port -> binding ->
//! portType -> operation -> message -> parts) so that each service node
//! carries its functions with fully spelled-out parameter and return types.
//! Any dangling reference fails the whole transform; a partial tree is never
//! produced.

use std::collections::HashMap;

use super::{
    document::{ClassNode, Document, EntryNode, FunctionNode, ServiceNode},
    error::Error,
    types::{Definition, SchemaTypeKind},
};

// Upper bound on alias-chain hops, so a self-referential schema alias
// cannot loop the resolver.
const MAX_ALIAS_DEPTH: usize = 16;

struct Transform<'a> {
    definition: &'a Definition,
    aliases: HashMap<&'a str, &'a str>,
}

impl<'a> Transform<'a> {
    fn new(definition: &'a Definition) -> Self {
        let aliases = definition
            .types
            .iter()
            .filter_map(|ty| match &ty.kind {
                SchemaTypeKind::Alias(target) => Some((ty.name.as_str(), target.as_str())),
                SchemaTypeKind::Struct { .. } => None,
            })
            .collect();

        Self {
            definition,
            aliases,
        }
    }

    fn resolve_type(&self, name: &str) -> String {
        let mut current = name;
        for _ in 0..MAX_ALIAS_DEPTH {
            match self.aliases.get(current) {
                Some(target) if *target != current => current = *target,
                _ => break,
            }
        }
        current.to_owned()
    }

    fn classes(&self) -> Vec<ClassNode> {
        self.definition
            .types
            .iter()
            .filter_map(|ty| match &ty.kind {
                SchemaTypeKind::Struct { base, fields } => Some(ClassNode {
                    name: ty.name.clone(),
                    extends: base.as_deref().map(|base| self.resolve_type(base)),
                    entries: fields
                        .iter()
                        .map(|field| {
                            let mut resolved = self.resolve_type(&field.ty);
                            if field.unbounded {
                                resolved.push_str("[]");
                            }
                            EntryNode {
                                name: field.name.clone(),
                                ty: resolved,
                            }
                        })
                        .collect(),
                }),
                SchemaTypeKind::Alias(_) => None,
            })
            .collect()
    }

    fn message_parts(&self, operation: &str, message: &str) -> Result<Vec<EntryNode>, Error> {
        let message = self
            .definition
            .messages
            .iter()
            .find(|candidate| candidate.name == message)
            .ok_or_else(|| Error::MissingMessage {
                operation: operation.to_owned(),
                message: message.to_owned(),
            })?;

        Ok(message
            .parts
            .iter()
            .map(|part| EntryNode {
                name: part.name.clone(),
                ty: self.resolve_type(&part.ty),
            })
            .collect())
    }

    fn services(&self) -> Result<Vec<ServiceNode>, Error> {
        let mut services = Vec::new();

        for service in &self.definition.services {
            let mut functions = Vec::new();
            let location = service
                .ports
                .iter()
                .find_map(|port| port.location.clone());

            for port in &service.ports {
                let binding = self
                    .definition
                    .bindings
                    .iter()
                    .find(|binding| binding.name == port.binding)
                    .ok_or_else(|| Error::MissingBinding {
                        port: port.name.clone(),
                        binding: port.binding.clone(),
                    })?;

                let port_type = self
                    .definition
                    .port_types
                    .iter()
                    .find(|port_type| port_type.name == binding.port_type)
                    .ok_or_else(|| Error::MissingPortType {
                        binding: binding.name.clone(),
                        port_type: binding.port_type.clone(),
                    })?;

                for operation in &port_type.operations {
                    let parameters = match &operation.input {
                        Some(message) => self.message_parts(&operation.name, message)?,
                        None => Vec::new(),
                    };

                    let returns = match &operation.output {
                        Some(message) => self
                            .message_parts(&operation.name, message)?
                            .into_iter()
                            .next()
                            .map(|entry| entry.ty),
                        None => None,
                    };

                    functions.push(FunctionNode {
                        name: operation.name.clone(),
                        documentation: operation.documentation.clone(),
                        parameters,
                        returns,
                    });
                }
            }

            services.push(ServiceNode {
                name: service.name.clone(),
                location,
                functions,
            });
        }

        Ok(services)
    }
}

pub fn transform(definition: &Definition) -> Result<Document, Error> {
    let transform = Transform::new(definition);

    Ok(Document {
        classes: transform.classes(),
        services: transform.services()?,
    })
}
