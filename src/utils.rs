//! Utility functions shared by the buffer, the stringifier and the filters.
//!
//! - JS string-literal quoting (the single quoting rule for generated source)
//! - URI component encoding

// ---------------------------------------------------------------------------
// JS String Literals
// ---------------------------------------------------------------------------

/// Quote a string as a double-quoted JS string literal.
///
/// Escapes backslash, double quote, newline, tab and carriage return. Every
/// other character is copied as-is. The result includes the surrounding
/// quotes. Mirrors `stringLiteralize` in the runtime prelude.
pub fn quote_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ---------------------------------------------------------------------------
// URI Encoding
// ---------------------------------------------------------------------------

/// Percent-encode a string the way JS `encodeURIComponent` does.
///
/// Unreserved characters are `A-Z a-z 0-9 - _ . ! ~ * ' ( )`; every other
/// byte of the UTF-8 encoding becomes `%XX` with uppercase hex.
pub fn encode_uri_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(s.len());
    for &byte in s.as_bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0F) as usize] as char);
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
