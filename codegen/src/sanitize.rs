//! Identifier sanitization and the run-scoped classmap.

use std::collections::HashSet;

use super::error::Error;

fn starts_identifier(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c as u32 >= 0x7F
}

fn continues_identifier(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c as u32 >= 0x7F
}

/// Normalizes an arbitrary schema name into a valid identifier: drops the
/// leading run of characters that cannot start an identifier, then every
/// remaining character outside the identifier grammar. Total; an all-invalid
/// input sanitizes to the empty string.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .skip_while(|c| !starts_identifier(*c))
        .filter(|c| continues_identifier(*c))
        .collect()
}

/// The run-wide mapping from original schema type names to sanitized class
/// names, in the order classes were sanitized. Doubles as the registry of
/// names already claimed this run: the original probed the host environment
/// with `class_exists`, we instead track the set ourselves, scoped to the
/// run.
///
/// The empty identifier is registered from the start, so any name that
/// sanitizes to nothing is reported as a conflict rather than emitted as an
/// unnameable artifact.
#[derive(Debug)]
pub struct Classmap {
    entries: Vec<(String, String)>,
    registered: HashSet<String>,
}

impl Default for Classmap {
    fn default() -> Self {
        let mut registered = HashSet::new();
        registered.insert(String::new());

        Self {
            entries: Vec::new(),
            registered,
        }
    }
}

impl Classmap {
    /// Sanitizes a class name and fails with [`Error::NamingConflict`] if the
    /// result is already claimed this run. When `register` is set, the
    /// original-to-sanitized mapping is recorded in the classmap; the
    /// sanitized name itself is claimed either way.
    pub fn sanitize_class_name(&mut self, name: &str, register: bool) -> Result<String, Error> {
        let valid = sanitize(name);

        if self.registered.contains(&valid) {
            return Err(Error::NamingConflict { name: valid });
        }

        self.registered.insert(valid.clone());

        if register {
            self.entries.push((name.to_owned(), valid.clone()));
        }

        Ok(valid)
    }

    /// Original-to-sanitized pairs, in sanitization order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Sanitizes a member name (field, function or parameter), which unlike a
/// class name claims no global slot but must still end up nameable.
pub fn sanitize_member(name: &str) -> Result<String, Error> {
    let valid = sanitize(name);

    if valid.is_empty() {
        return Err(Error::UnnameableIdentifier {
            name: name.to_owned(),
        });
    }

    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_input_is_untouched() {
        for name in ["Widget", "_private", "snake_case", "Name2"] {
            assert_eq!(sanitize(name), name);
        }
    }

    #[test]
    fn leading_invalid_run_is_stripped() {
        assert_eq!(sanitize("123abc"), "abc");
        assert_eq!(sanitize("!!My-Field"), "MyField");
    }

    #[test]
    fn all_invalid_input_sanitizes_to_empty() {
        assert_eq!(sanitize("!?-"), "");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn idempotent_under_repetition() {
        for name in ["Widget", "123abc", "!?-", "My-Field", "a b c"] {
            let once = sanitize(name);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn class_registration_records_mapping() {
        let mut classmap = Classmap::default();

        let valid = classmap.sanitize_class_name("My-Class", true).unwrap();
        assert_eq!(valid, "MyClass");
        assert_eq!(
            classmap.entries(),
            &[("My-Class".to_owned(), "MyClass".to_owned())]
        );
    }

    #[test]
    fn colliding_sanitized_names_conflict() {
        let mut classmap = Classmap::default();

        classmap.sanitize_class_name("Foo!", true).unwrap();
        match classmap.sanitize_class_name("Foo?", true) {
            Err(Error::NamingConflict { name }) => assert_eq!(name, "Foo"),
            other => panic!("expected NamingConflict, got {:?}", other),
        }
    }

    #[test]
    fn unregistered_names_still_claim_their_slot() {
        let mut classmap = Classmap::default();

        classmap.sanitize_class_name("Svc", false).unwrap();
        assert!(classmap.entries().is_empty());
        assert!(classmap.sanitize_class_name("Svc", false).is_err());
    }

    #[test]
    fn members_sanitizing_to_nothing_are_unnameable() {
        assert_eq!(sanitize_member("My-Field").unwrap(), "MyField");

        match sanitize_member("!?-") {
            Err(Error::UnnameableIdentifier { name }) => assert_eq!(name, "!?-"),
            other => panic!("expected UnnameableIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn empty_sanitized_class_name_conflicts() {
        let mut classmap = Classmap::default();

        assert!(classmap.sanitize_class_name("!!!", true).is_err());
    }
}
