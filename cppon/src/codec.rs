//! Codec helpers: base64 and textual numeric conversion.

use base64::prelude::*;

use crate::node::{Node, NumberKind};
use crate::{Error, Result};

/// Encode bytes to standard-alphabet base64 with `=` padding.
#[inline]
#[must_use]
pub fn base64_encode(data: &[u8]) -> String {
    BASE64_STANDARD.encode(data)
}

/// Decode standard-alphabet base64.
///
/// With `fail_on_invalid` set, an invalid byte or non-canonical padding is
/// an [`Error::InvalidBase64`]; otherwise decoding failures yield an empty
/// vector.
pub fn base64_decode(text: &[u8], fail_on_invalid: bool) -> Result<Vec<u8>> {
    match BASE64_STANDARD.decode(text) {
        Ok(bytes) => Ok(bytes),
        Err(err) if fail_on_invalid => Err(Error::InvalidBase64(err.to_string())),
        Err(_) => Ok(Vec::new()),
    }
}

/// Cut the typed suffix off a number token, leaving the numeric text.
///
/// Integer suffixes start at the first `i`/`I`/`u`/`U`; a float suffix is a
/// single trailing `f`/`F`. Double tokens never carry one.
#[must_use]
pub(crate) fn strip_suffix(text: &[u8], kind: NumberKind) -> &[u8] {
    match kind {
        NumberKind::Double => text,
        NumberKind::Float => match text {
            [head @ .., b'f' | b'F'] => head,
            _ => text,
        },
        _ => {
            let cut = text
                .iter()
                .position(|b| matches!(b, b'i' | b'I' | b'u' | b'U'))
                .unwrap_or(text.len());
            &text[..cut]
        },
    }
}

/// Convert a number token's text into the concrete node its classified
/// kind calls for. Overflow and malformed digits are `invalid_number`.
pub(crate) fn parse_number(text: &[u8], kind: NumberKind) -> Result<Node> {
    let digits = strip_suffix(text, kind);
    let s = std::str::from_utf8(digits)
        .map_err(|_| Error::InvalidNumber(String::from_utf8_lossy(text).into_owned()))?;
    let fail = || Error::InvalidNumber(s.to_string());
    Ok(match kind {
        NumberKind::Double => Node::Double(s.parse().map_err(|_| fail())?),
        NumberKind::Float => Node::Float(s.parse().map_err(|_| fail())?),
        NumberKind::Int8 => Node::Int8(s.parse().map_err(|_| fail())?),
        NumberKind::Uint8 => Node::Uint8(s.parse().map_err(|_| fail())?),
        NumberKind::Int16 => Node::Int16(s.parse().map_err(|_| fail())?),
        NumberKind::Uint16 => Node::Uint16(s.parse().map_err(|_| fail())?),
        NumberKind::Int32 => Node::Int32(s.parse().map_err(|_| fail())?),
        NumberKind::Uint32 => Node::Uint32(s.parse().map_err(|_| fail())?),
        NumberKind::Int64 => Node::Int64(s.parse().map_err(|_| fail())?),
        NumberKind::Uint64 => Node::Uint64(s.parse().map_err(|_| fail())?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_round_trip() {
        let encoded = base64_encode(b"Hello, World!");
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");
        assert_eq!(base64_decode(encoded.as_bytes(), true).unwrap(), b"Hello, World!");
    }

    #[test]
    fn base64_invalid_byte() {
        assert!(base64_decode(b"SGVsbG8*", true).is_err());
        assert_eq!(base64_decode(b"SGVsbG8*", false).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn suffix_stripping() {
        assert_eq!(strip_suffix(b"42i8", NumberKind::Int8), b"42");
        assert_eq!(strip_suffix(b"42u32", NumberKind::Uint32), b"42");
        assert_eq!(strip_suffix(b"42i", NumberKind::Int64), b"42");
        assert_eq!(strip_suffix(b"42", NumberKind::Int64), b"42");
        assert_eq!(strip_suffix(b"1.5e-3f", NumberKind::Float), b"1.5e-3");
        assert_eq!(strip_suffix(b"1.5e-3", NumberKind::Double), b"1.5e-3");
    }

    #[test]
    fn typed_parses() {
        assert_eq!(parse_number(b"-128i8", NumberKind::Int8).unwrap(), Node::Int8(-128));
        assert_eq!(
            parse_number(b"4294967295u32", NumberKind::Uint32).unwrap(),
            Node::Uint32(u32::MAX)
        );
        assert_eq!(
            parse_number(b"-9223372036854775808i64", NumberKind::Int64).unwrap(),
            Node::Int64(i64::MIN)
        );
        assert_eq!(parse_number(b"1.0f", NumberKind::Float).unwrap(), Node::Float(1.0));
        assert_eq!(parse_number(b"1e10", NumberKind::Double).unwrap(), Node::Double(1e10));
    }

    #[test]
    fn overflow_is_invalid_number() {
        assert!(matches!(
            parse_number(b"128i8", NumberKind::Int8),
            Err(Error::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_number(b"-1u8", NumberKind::Uint8),
            Err(Error::InvalidNumber(_))
        ));
    }
}
