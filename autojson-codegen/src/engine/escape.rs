//! C++ string literal rendering.

/// Renders `text` as a quoted C++ narrow string literal.
///
/// Handles:
/// - Printable ASCII: kept as is
/// - `"`, `\` and `?`: octal escapes (the last avoids trigraphs)
/// - Control characters and non-ASCII bytes: octal escapes of each UTF-8 byte
///
/// Octal escapes always use three digits, so a following digit can never be
/// absorbed into the escape.
///
/// # Examples
///
/// ```
/// use autojson_codegen::engine::escape::cpp_string_literal;
///
/// assert_eq!(cpp_string_literal("x"), "\"x\"");
/// assert_eq!(cpp_string_literal("a\"b"), "\"a\\042b\"");
/// assert_eq!(cpp_string_literal("é"), "\"\\303\\251\"");
/// ```
#[must_use]
pub fn cpp_string_literal(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 2);
    result.push('"');
    for byte in text.bytes() {
        if is_plain(byte) {
            result.push(char::from(byte));
        } else {
            result.push('\\');
            result.extend([byte >> 6, (byte >> 3) & 0o7, byte & 0o7].map(octal_digit));
        }
    }
    result.push('"');
    result
}

const fn octal_digit(value: u8) -> char {
    (b'0' + value) as char
}

const fn is_plain(byte: u8) -> bool {
    matches!(byte, b' '..=b'~') && !matches!(byte, b'"' | b'\\' | b'?')
}
