/// Rewrite a resolved phone number into the local 8-digit form.
///
/// Spaces are stripped, and a pure 9-digit number loses its leading digit.
/// Anything else (absent, `+47...`, dashes, other lengths) passes through.
pub fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone.map(|number| normalize_number(&number))
}

pub fn normalize_number(number: &str) -> String {
    let compact = number.replace(' ', "");
    if compact.len() == 9 && compact.bytes().all(|b| b.is_ascii_digit()) {
        compact[1..].to_string()
    } else {
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> Option<String> {
        normalize_phone(Some(s.to_string()))
    }

    #[test]
    fn nine_digits_drop_first() {
        assert_eq!(norm("123456789").as_deref(), Some("23456789"));
    }

    #[test]
    fn eight_digits_unchanged() {
        assert_eq!(norm("12345678").as_deref(), Some("12345678"));
    }

    #[test]
    fn spaces_stripped_before_length_check() {
        assert_eq!(norm("12 34 56 78 9").as_deref(), Some("23456789"));
        assert_eq!(norm("12 34 56 78").as_deref(), Some("12345678"));
    }

    #[test]
    fn absent_passes_through() {
        assert_eq!(normalize_phone(None), None);
    }

    #[test]
    fn non_digits_not_reduced() {
        assert_eq!(norm("+4712345678").as_deref(), Some("+4712345678"));
        assert_eq!(norm("123-45678").as_deref(), Some("123-45678"));
        assert_eq!(norm("+47 123 45 678").as_deref(), Some("+4712345678"));
    }

    #[test]
    fn other_lengths_unchanged() {
        assert_eq!(norm("1234567890").as_deref(), Some("1234567890"));
        assert_eq!(norm("1234567").as_deref(), Some("1234567"));
        assert_eq!(norm("").as_deref(), Some(""));
    }
}
