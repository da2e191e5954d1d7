//! Low-level CTCP quoting.
//!
//! Arguments of a small fixed set of commands travel escaped so that they
//! may contain spaces, line breaks and the delimiter itself:
//!
//! | raw   | quoted |
//! |-------|--------|
//! | NUL   | `\0`   |
//! | SOH   | `\1`   |
//! | LF    | `\n`   |
//! | CR    | `\r`   |
//! | space | `\@`   |
//! | `\`   | `\\`   |

/// Commands whose arguments use the escape table above.
///
/// Arguments of any other command are plaintext and pass through untouched.
pub const ENCODED_COMMANDS: &[&str] = &["VERSION", "PING"];

/// Returns `true` if `command` (any case) carries quoted arguments.
#[inline]
pub fn is_encoded(command: &str) -> bool {
    ENCODED_COMMANDS
        .iter()
        .any(|c| c.eq_ignore_ascii_case(command))
}

/// Escape `s` for use as an encoded CTCP argument.
///
/// # Example
///
/// ```
/// use slirc_ctcp::quote;
///
/// assert_eq!(quote("a b\\c"), "a\\@b\\\\c");
/// ```
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\x01' => out.push_str("\\1"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ' ' => out.push_str("\\@"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

/// Reverse [`quote`].
///
/// Scans left to right so an escaped backslash is never reinterpreted as
/// the start of another pair. Unknown `\x` pairs and a trailing lone `\`
/// are copied through unchanged.
///
/// # Example
///
/// ```
/// use slirc_ctcp::unquote;
///
/// assert_eq!(unquote("a\\@b"), "a b");
/// assert_eq!(unquote("\\\\@"), "\\@");
/// assert_eq!(unquote("\\q"), "\\q");
/// ```
pub fn unquote(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('@') => out.push(' '),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('1') => out.push('\x01'),
            Some('0') => out.push('\0'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
