//! String helpers.

/// Upper-cases the first character of a string and lower-cases the rest.
///
/// Used to derive a field label from its name when no label is given.
///
/// # Examples
///
/// ```
/// use formbar_rs_core::text::capitalize;
///
/// assert_eq!(capitalize("email"), "Email");
/// assert_eq!(capitalize("first_name"), "First_name");
/// assert_eq!(capitalize("ZIP"), "Zip");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |c| {
        let mut result: String = c.to_uppercase().collect();
        result.extend(chars.flat_map(char::to_lowercase));
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_single() {
        assert_eq!(capitalize("a"), "A");
    }

    #[test]
    fn test_capitalize_mixed_case() {
        assert_eq!(capitalize("eMail"), "Email");
    }

    #[test]
    fn test_capitalize_non_ascii() {
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn test_capitalize_leading_digit() {
        assert_eq!(capitalize("2FA"), "2fa");
    }
}
