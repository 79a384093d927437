//! Escaping for values embedded in query-string leaves.

/// Characters with a meaning in the query-string syntax.
pub const SPECIAL_CHARS: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&',
    '/',
];

/// Backslash-escape every query-string special character in `text`.
///
/// ```
/// use sarissa_criteria::query::escape::escape;
///
/// assert_eq!(escape("a+b"), "a\\+b");
/// assert_eq!(escape("plain text"), "plain text");
/// ```
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape `text` and wrap it in double quotes.
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape(text))
}

/// Join quoted values with ` OR `.
///
/// ```
/// use sarissa_criteria::query::escape::or_query_string;
///
/// assert_eq!(or_query_string(&["a", "b c"]), "\"a\" OR \"b c\"");
/// ```
pub fn or_query_string<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| quote(v.as_ref()))
        .collect::<Vec<_>>()
        .join(" OR ")
}
