//! Reverse routing: turning a pattern back into a concrete path.

use std::fmt::{self, Write};

/// Substitute `values` positionally for the `:name` and `*` placeholders
/// of `pattern`.
///
/// Placeholders without a corresponding value are kept verbatim.
pub fn fill_pattern<D: fmt::Display>(pattern: &str, values: &[D]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut values = values.iter();
    let mut rest = pattern;

    while let Some(i) = rest.find([':', '*']) {
        out.push_str(&rest[..i]);
        let end = if rest.as_bytes()[i] == b':' {
            rest[i..].find('/').map_or(rest.len(), |n| i + n)
        } else {
            i + 1
        };
        match values.next() {
            // Writing into a String cannot fail.
            Some(value) => {
                let _ = write!(out, "{value}");
            }
            None => out.push_str(&rest[i..end]),
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}
