//! Escaping rules for Seq payloads.
//!
//! String escaping follows the raw-events endpoint's historical output:
//! `\t \n \f \r \" \\` use short escapes and every other control
//! character below 0x20 is written as `\uXXXX` with upper-case hex.
//! Backspace has no short form.

use std::borrow::Cow;
use std::io;

use serde_json::ser::{CharEscape, Formatter};

/// `serde_json` formatter applying the escaping rules above.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct SeqFormatter;

impl Formatter for SeqFormatter {
    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let escape: &[u8] = match char_escape {
            CharEscape::Quote => b"\\\"",
            CharEscape::ReverseSolidus => b"\\\\",
            CharEscape::Solidus => b"/",
            CharEscape::Tab => b"\\t",
            CharEscape::LineFeed => b"\\n",
            CharEscape::FormFeed => b"\\f",
            CharEscape::CarriageReturn => b"\\r",
            CharEscape::Backspace => return write!(writer, "\\u{:04X}", 0x08),
            CharEscape::AsciiControl(byte) => return write!(writer, "\\u{byte:04X}"),
        };
        writer.write_all(escape)
    }
}

/// Make a property name safe for Seq.
///
/// `:` becomes `_`, then everything that is neither alphanumeric nor `_`
/// is dropped. The result may be empty.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c == ':' { '_' } else { c })
        .filter(|c| *c == '_' || c.is_alphanumeric())
        .collect()
}

/// Double every `{` and `}` so Seq renders them literally instead of
/// treating them as template holes.
pub fn escape_message_template(message: &str) -> Cow<'_, str> {
    if message.contains(['{', '}']) {
        Cow::Owned(message.replace('{', "{{").replace('}', "}}"))
    } else {
        Cow::Borrowed(message)
    }
}
