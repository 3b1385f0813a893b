//! The dynamic argument and result type passed through generated stubs.

/// A runtime value crossing the service boundary. Generated methods accept a
/// slice of these and match the list against the signatures their overload
/// set declares.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Double(f64),
    Str(String),
    Array(Vec<Value>),
    /// An instance of a generated class, with fields keyed by wire name.
    Object {
        class: String,
        fields: Vec<(String, Value)>,
    },
}

impl Value {
    /// The tag this value contributes to a signature string: the primitive
    /// kind, `array`, or the class name for object values.
    pub fn kind(&self) -> &str {
        match self {
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object { class, .. } => class,
        }
    }

    pub fn object<S: Into<String>>(class: S) -> Self {
        Value::Object {
            class: class.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object { fields, .. } => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

/// Serializes an argument list into its signature string, `(kind)` per
/// argument in order.
pub fn signature_of(arguments: &[Value]) -> String {
    arguments
        .iter()
        .map(|argument| format!("({})", argument.kind()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_every_variant() {
        assert_eq!(Value::from(3).kind(), "integer");
        assert_eq!(Value::from(3.5).kind(), "double");
        assert_eq!(Value::from("abc").kind(), "string");
        assert_eq!(Value::Array(Vec::new()).kind(), "array");
        assert_eq!(Value::object("Widget").kind(), "Widget");
    }

    #[test]
    fn signatures_concatenate_in_order() {
        let arguments = [Value::from("abc"), Value::from(3), Value::object("Widget")];
        assert_eq!(signature_of(&arguments), "(string)(integer)(Widget)");
        assert_eq!(signature_of(&[]), "");
    }
}
