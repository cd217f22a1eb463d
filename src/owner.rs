use std::fmt;

/// One property owner as read from an input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRecord {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

impl OwnerRecord {
    /// build a record from raw cell values, coercing the postal code
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, postal_code: &str) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            postal_code: coerce_postal_code(postal_code),
        }
    }

    pub fn search_key(&self) -> SearchKey {
        SearchKey::new(&self.first_name, &self.last_name, &self.postal_code)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Lookup key used against the phone directories, i.e. `ola+nordmann+0123`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey(String);

impl SearchKey {
    pub fn new(first_name: &str, last_name: &str, postal_code: &str) -> Self {
        let joined = [first_name, last_name, postal_code].join("+");
        Self(joined.replace(' ', "+").to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// the key with `+` separators turned back into spaces, for form-encoded queries
    pub fn as_words(&self) -> String {
        self.0.replace('+', " ")
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spreadsheets hand numeric postal codes over as `123.0`; strip the fraction.
pub fn coerce_postal_code(raw: &str) -> String {
    if !raw.contains('.') {
        return raw.to_string();
    }
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => format!("{}", value.trunc() as i64),
        _ => raw.to_string(),
    }
}
