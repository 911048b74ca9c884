/// Make a dataset value safe to write to a terminal.
///
/// Line breaks and tabs become spaces; other control characters, which could
/// carry escape sequences, become U+FFFD.
pub fn clean(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '\u{FFFD}',
            c => c,
        })
        .collect()
}

/// [`clean`] for optional fields, with a placeholder for missing values.
pub fn clean_or<'a>(value: Option<&str>, missing: &'a str) -> std::borrow::Cow<'a, str> {
    match value {
        Some(v) => clean(v).into(),
        None => missing.into(),
    }
}
