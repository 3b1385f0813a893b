//! Schema-to-target primitive type mapping.

use super::{
    model::{Primitive, TypeKind, TypeRef},
    sanitize::sanitize,
};

/// Maps a raw schema type name to a [`TypeRef`]. A trailing `[]` marks an
/// array. The base name is bucketed case-insensitively into one of the three
/// primitive families; anything else becomes a reference to a class, with any
/// namespace prefix dropped and the remainder sanitized. Total and pure.
///
/// `long` sits in both the integer and floating lists upstream; the floating
/// bucket wins, matching the source precedence.
pub fn map_type(raw: &str) -> TypeRef {
    let (base, is_array) = match raw.strip_suffix("[]") {
        Some(base) => (base, true),
        None => (raw, false),
    };

    let kind = match base.to_ascii_lowercase().as_str() {
        "int" | "integer" | "byte" | "short" | "negativeinteger" | "nonnegativeinteger"
        | "nonpositiveinteger" | "positiveinteger" | "unsignedbyte" | "unsignedint"
        | "unsignedlong" | "unsignedshort" => TypeKind::Primitive(Primitive::Integer),

        "float" | "long" | "double" | "decimal" => TypeKind::Primitive(Primitive::Double),

        "string" | "token" | "normalizedstring" | "hexbinary" => {
            TypeKind::Primitive(Primitive::Str)
        }

        _ => {
            let local = match base.rsplit_once(':') {
                Some((_, local)) => local,
                None => base,
            };
            TypeKind::Reference(sanitize(local))
        }
    };

    TypeRef { kind, is_array }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_family() {
        for raw in ["int", "Integer", "unsignedShort", "positiveInteger"] {
            assert_eq!(map_type(raw).kind, TypeKind::Primitive(Primitive::Integer));
        }
    }

    #[test]
    fn floating_family_wins_for_long() {
        assert_eq!(
            map_type("long").kind,
            TypeKind::Primitive(Primitive::Double)
        );
        assert_eq!(
            map_type("decimal").kind,
            TypeKind::Primitive(Primitive::Double)
        );
    }

    #[test]
    fn string_family() {
        for raw in ["string", "token", "normalizedString", "hexBinary"] {
            assert_eq!(map_type(raw).kind, TypeKind::Primitive(Primitive::Str));
        }
    }

    #[test]
    fn array_marker_is_preserved() {
        let ty = map_type("int[]");
        assert_eq!(ty.kind, TypeKind::Primitive(Primitive::Integer));
        assert!(ty.is_array);
        assert_eq!(ty.signature_tag(), "array");
    }

    #[test]
    fn unknown_names_become_sanitized_references() {
        let ty = map_type("xyz:Widget");
        assert_eq!(ty.kind, TypeKind::Reference("Widget".into()));
        assert!(!ty.is_array);

        let ty = map_type("My-Type");
        assert_eq!(ty.kind, TypeKind::Reference("MyType".into()));
    }
}
