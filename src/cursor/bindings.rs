//! Positional binding substitution.
//!
//! Placeholders are written `{}`; `{{` and `}}` stand for literal braces.
//! Values are rendered textually: strings are single-quoted, timestamps become
//! `TIMESTAMP '...'` literals and everything else is inserted verbatim.
//!
//! Embedded quotes are NOT escaped. A string binding containing `'` can change
//! the meaning of the statement; callers must not pass untrusted input here.

use crate::error::{Result, SqlGatewayError};
use crate::gateway::Value;

/// Renders one binding as SQL text.
pub fn render_binding(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        Value::Timestamp(ts) => format!("TIMESTAMP '{}'", ts),
        // Debug keeps the decimal point on integral floats (3.0, not 3)
        Value::Float(f) => format!("{:?}", f),
        other => other.to_display_string(),
    }
}

/// Replaces the placeholders of `sql`, in source order, with `bindings`.
///
/// Surplus bindings are ignored; a placeholder without a binding is an error.
pub fn substitute_bindings(sql: &str, bindings: &[Value]) -> Result<String> {
    let mut out = String::with_capacity(sql.len());
    let mut values = bindings.iter();
    let mut position = 0;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' if chars.peek() == Some(&'}') => {
                chars.next();
                position += 1;
                let value = values.next().ok_or_else(|| {
                    SqlGatewayError::binding(format!(
                        "missing value for placeholder {} ({} supplied)",
                        position,
                        bindings.len()
                    ))
                })?;
                out.push_str(&render_binding(value));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
