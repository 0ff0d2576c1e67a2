// Start of file: /src/problem/json.rs

// * JSON encoding of problem payloads, tunable through `JsonFlags`.

use std::io;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};

bitflags::bitflags! {
    /// Switches for the JSON encoder. The default sets all of them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct JsonFlags: u8 {
        /// Four-space indentation, one member per line.
        const PRETTY_PRINT = 1;
        /// Leave `/` as is instead of writing `\/`.
        const UNESCAPED_SLASHES = 1 << 1;
        /// Leave non-ASCII characters as is instead of writing `\uXXXX`.
        const UNESCAPED_UNICODE = 1 << 2;
        /// Write integral floats with their fraction (`1.0` instead of `1`).
        const PRESERVE_ZERO_FRACTION = 1 << 3;
    }
}

impl JsonFlags {
    /// Flag by its constant name, ignoring case and surrounding blanks.
    pub fn parse_name(name: &str) -> Option<Self> {
        Self::from_name(&name.trim().to_ascii_uppercase())
    }
}

impl Default for JsonFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Wraps a layout formatter (pretty or compact) and applies the escaping and
/// float rules of the flags.
struct FlaggedFormatter<F> {
    layout: F,
    flags: JsonFlags,
}

impl<F: Formatter> Formatter for FlaggedFormatter<F> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.layout.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.layout.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.layout.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.layout.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.layout.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.layout.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.layout.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.layout.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.layout.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.layout.end_object_value(writer)
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        if !self.flags.contains(JsonFlags::PRESERVE_ZERO_FRACTION)
            && value.fract() == 0.0
            && value.abs() < 1e15
        {
            // Display drops the fraction of integral values ("3", "-0").
            return write!(writer, "{value}");
        }
        self.layout.write_f64(writer, value)
    }

    fn write_f32<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f32) -> io::Result<()> {
        self.write_f64(writer, f64::from(value))
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let escape_slashes: bool = !self.flags.contains(JsonFlags::UNESCAPED_SLASHES);
        let escape_unicode: bool = !self.flags.contains(JsonFlags::UNESCAPED_UNICODE);

        let needs_escape: bool =
            (escape_slashes && fragment.contains('/')) || (escape_unicode && !fragment.is_ascii());
        if !needs_escape {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units: [u16; 2] = [0; 2];
        for c in fragment.chars() {
            if c == '/' && escape_slashes {
                writer.write_all(b"\\/")?;
            } else if !c.is_ascii() && escape_unicode {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            } else {
                let mut utf8: [u8; 4] = [0; 4];
                writer.write_all(c.encode_utf8(&mut utf8).as_bytes())?;
            }
        }

        Ok(())
    }
}

/// Encodes `value` according to `flags`.
pub fn to_json_vec<T: Serialize + ?Sized>(
    value: &T,
    flags: JsonFlags,
) -> serde_json::Result<Vec<u8>> {
    let mut writer: Vec<u8> = Vec::with_capacity(256);

    if flags.contains(JsonFlags::PRETTY_PRINT) {
        let formatter = FlaggedFormatter {
            layout: PrettyFormatter::with_indent(b"    "),
            flags,
        };
        value.serialize(&mut Serializer::with_formatter(&mut writer, formatter))?;
    } else {
        let formatter = FlaggedFormatter {
            layout: CompactFormatter,
            flags,
        };
        value.serialize(&mut Serializer::with_formatter(&mut writer, formatter))?;
    }

    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: &serde_json::Value, flags: JsonFlags) -> String {
        String::from_utf8(to_json_vec(value, flags).unwrap()).unwrap()
    }

    #[test]
    fn default_flags_pretty_print_without_escaping() {
        let value = json!({"type": "https://httpstatus.es/500", "name": "Zoë"});
        let out = encode(&value, JsonFlags::default());

        assert_eq!(
            out,
            "{\n    \"type\": \"https://httpstatus.es/500\",\n    \"name\": \"Zoë\"\n}"
        );
    }

    #[test]
    fn compact_output_escapes_slashes_and_unicode() {
        let out = encode(&json!({"uri": "a/b", "name": "Zoë 😀"}), JsonFlags::empty());

        assert_eq!(out, r#"{"uri":"a\/b","name":"Zo\u00eb \ud83d\ude00"}"#);
    }

    #[test]
    fn zero_fraction_is_kept_only_when_asked() {
        let value = json!({"ratio": 2.0, "half": 0.5});

        assert_eq!(
            encode(&value, JsonFlags::PRESERVE_ZERO_FRACTION),
            r#"{"ratio":2.0,"half":0.5}"#
        );
        assert_eq!(encode(&value, JsonFlags::empty()), r#"{"ratio":2,"half":0.5}"#);
    }

    #[test]
    fn escapes_still_apply_next_to_flags() {
        let out = encode(&json!("say \"hi\"/bye"), JsonFlags::UNESCAPED_UNICODE);
        assert_eq!(out, r#""say \"hi\"\/bye""#);
    }

    #[test]
    fn flags_parse_by_name() {
        assert_eq!(JsonFlags::parse_name(" pretty_print "), Some(JsonFlags::PRETTY_PRINT));
        assert_eq!(JsonFlags::parse_name("HEX_TAG"), None);
        assert_eq!(JsonFlags::parse_name(""), None);

        let mut flags = JsonFlags::empty();
        flags |= JsonFlags::UNESCAPED_SLASHES;
        assert!(flags.contains(JsonFlags::UNESCAPED_SLASHES));
        assert!(!flags.contains(JsonFlags::UNESCAPED_SLASHES | JsonFlags::PRETTY_PRINT));
    }
}

// End of file: /src/problem/json.rs
