//! Identifier validation for instance, port and user type names.

use crate::types::TypeId;

/// IEC 61499 identifier: letters, digits and single underscores, not
/// starting with a digit and not ending with an underscore.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    match name.as_bytes().first() {
        Some(first) if first.is_ascii_alphabetic() || *first == b'_' => {}
        _ => return false,
    }
    name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        && !name.ends_with('_')
        && !name.contains("__")
}

/// Returns true if `name` may be used for a user-defined data type: a valid
/// identifier that does not shadow a built-in type.
#[must_use]
pub fn is_valid_type_name(name: &str) -> bool {
    is_valid_identifier(name) && TypeId::from_builtin_name(name).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_underscored_names() {
        assert!(is_valid_identifier("A"));
        assert!(is_valid_identifier("_A"));
        assert!(is_valid_identifier("E_RS_1"));
        assert!(is_valid_identifier("Motor2"));
    }

    #[test]
    fn rejects_digits_first_and_stray_underscores() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1ABC"));
        assert!(!is_valid_identifier("A__B"));
        assert!(!is_valid_identifier("ABC_"));
        assert!(!is_valid_identifier("_"));
        assert!(!is_valid_identifier("FB.OUT"));
    }

    #[test]
    fn type_names_cannot_shadow_builtins() {
        assert!(is_valid_type_name("POINT"));
        assert!(!is_valid_type_name("udint"));
        assert!(!is_valid_type_name("ANY_NUM"));
    }
}
