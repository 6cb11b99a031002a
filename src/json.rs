//! JSON text the way MockServer's reference clients write it.
//!
//! MockServer does not care about whitespace, but the documents we send are meant to be
//! bit-identical to the ones produced by the reference client: items are separated by `", "`,
//! keys by `": "`, every non-ASCII character (and DEL) is escaped as `\uXXXX`, and floats use
//! their shortest round-trip digits, positional between `1e-4` and `1e16` (`100.0`, `0.0001`)
//! and scientific outside with a signed, two-digit exponent (`1e+16`, `1.5e-07`).
//! `{"msg": "hi"}` rather than `{"msg":"hi"}`.
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

#[derive(Debug, Default, Clone, Copy)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let shortest = format!("{:e}", value.abs());
        writer.write_all(float_repr(&shortest, value.is_sign_negative()).as_bytes())
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let shortest = format!("{:e}", value.abs());
        writer.write_all(float_repr(&shortest, value.is_sign_negative()).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if c.is_ascii() && c != '\u{7f}' {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Lay out the shortest round-trip digits of a finite float, given as `d.ddde<exp>`, the way
/// the reference client does: positional between `1e-4` and `1e16`, scientific outside with a sign and
/// at least two exponent digits.
fn float_repr(shortest: &str, negative: bool) -> String {
    let (mantissa, exponent) = shortest.split_at(shortest.find('e').unwrap_or(shortest.len()));
    let exponent: i32 = exponent.get(1..).and_then(|e| e.parse().ok()).unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let mut repr = String::with_capacity(digits.len() + 8);
    if negative {
        repr.push('-');
    }
    if (-4..16).contains(&exponent) {
        if exponent < 0 {
            repr.push_str("0.");
            repr.extend(std::iter::repeat('0').take((-exponent - 1) as usize));
            repr.push_str(&digits);
        } else {
            let integer_len = exponent as usize + 1;
            if digits.len() > integer_len {
                repr.push_str(&digits[..integer_len]);
                repr.push('.');
                repr.push_str(&digits[integer_len..]);
            } else {
                repr.push_str(&digits);
                repr.extend(std::iter::repeat('0').take(integer_len - digits.len()));
                repr.push_str(".0");
            }
        }
    } else {
        repr.push_str(mantissa);
        repr.push('e');
        repr.push(if exponent < 0 { '-' } else { '+' });
        repr.push_str(&format!("{:02}", exponent.abs()));
    }
    repr
}

/// Serialize `value` to a JSON string using `", "` and `": "` as separators and ASCII-only output.
///
/// ### Example:
/// ```rust
/// use mockserver_client::json::to_spaced_string;
/// use serde_json::json;
///
/// let text = to_spaced_string(&json!({"msg": "hi", "tags": ["a", "b"]})).unwrap();
/// assert_eq!(text, r#"{"msg": "hi", "tags": ["a", "b"]}"#);
/// ```
pub fn to_spaced_string<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: ?Sized + Serialize,
{
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, SpacedFormatter);
    value.serialize(&mut serializer)?;
    // The formatter only ever writes ASCII, so this cannot fail in practice.
    String::from_utf8(buffer).map_err(<serde_json::Error as serde::ser::Error>::custom)
}
