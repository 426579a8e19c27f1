//! Identifier and literal quoting for generated T-SQL.
//!
//! Every dynamic value that ends up in a script goes through one of these
//! functions. Names are stored raw in the model and only bracketed here,
//! at render time.
//!
//! # Examples
//!
//! ```
//! use rust_sqlscripter::quoting::*;
//!
//! assert_eq!(quotename("Foo"), "[Foo]");
//! assert_eq!(quotename("a]b"), "[a]]b]");
//! assert_eq!(quote("O'Brien"), "'O''Brien'");
//! assert_eq!(binary_literal(&[0x01, 0xab]), "0x01ab");
//! ```

/// Wraps an identifier in brackets, doubling any embedded closing bracket.
pub fn quotename(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('[');
    for c in name.chars() {
        if c == ']' {
            out.push(']');
        }
        out.push(c);
    }
    out.push(']');
    out
}

/// Schema-qualified, bracketed name: `[schema].[name]`.
pub fn qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quotename(schema), quotename(name))
}

/// Doubles embedded single quotes so the text can sit inside a string literal.
pub fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

/// Escaped text wrapped in single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", escape(value))
}

/// Renders bytes as a `0x`-prefixed hexadecimal literal.
pub fn binary_literal(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Text safe to place on a single-line `--` comment: control characters,
/// line breaks included, become spaces.
pub fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Comma-separated list of string literals; `None` renders as `NULL`.
///
/// Used for positional stored procedure arguments.
pub fn sql_list<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values
        .into_iter()
        .map(|v| v.map(quote).unwrap_or_else(|| "NULL".to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}
