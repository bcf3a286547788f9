use bytes::Buf;

use crate::{
    config::TEXT_LEN,
    error::{DbResult, DecodeError},
    exec::value::Value,
};

/// `vdb` possible value types.
///
/// Types are process-wide singletons: every column refers to one of
/// these variants, never to a per-tuple instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Int,
    Text,
}

impl Type {
    /// Returns the canonical type name.
    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Text => "text",
        }
    }

    /// Returns the number of bytes required to store a value of this
    /// type.
    ///
    /// Text values always occupy their fixed width plus the 4-byte
    /// length prefix, regardless of the actual string length.
    pub fn byte_len(self) -> usize {
        match self {
            Type::Int => 4,
            Type::Text => TEXT_LEN + 4,
        }
    }

    /// Parses a type from its schema-file name (`int` or `string`,
    /// case-insensitive).
    pub fn parse(name: &str) -> DbResult<Type> {
        match name.to_ascii_lowercase().as_str() {
            "int" => Ok(Type::Int),
            "string" => Ok(Type::Text),
            unexpected => Err(DecodeError::UnknownTypeName(unexpected.into()).into()),
        }
    }

    /// Decodes one value of this type from the given byte source.
    ///
    /// All integers are big-endian. A text value is a 4-byte length
    /// prefix, `len` bytes of UTF-8 and `TEXT_LEN - len` bytes of
    /// padding, which are consumed but ignored.
    pub fn decode(self, buf: &mut impl Buf) -> DbResult<Value> {
        let expected = self.byte_len();
        if buf.remaining() < expected {
            return Err(DecodeError::Truncated {
                expected,
                actual: buf.remaining(),
            }
            .into());
        }

        match self {
            Type::Int => Ok(Value::Int(buf.get_i32())),
            Type::Text => {
                let len = buf.get_u32() as usize;
                if len > TEXT_LEN {
                    return Err(DecodeError::TextTooLong {
                        len,
                        max: TEXT_LEN,
                    }
                    .into());
                }
                let mut bytes = vec![0; len];
                buf.copy_to_slice(&mut bytes);
                buf.advance(TEXT_LEN - len);
                let text = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
                Ok(Value::Text(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::BufMut;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_decode_int() {
        let mut buf = &[0x00, 0x00, 0x01, 0x02][..];
        let value = Type::Int.decode(&mut buf).expect("should decode");
        assert_eq!(value, Value::Int(0x0102));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_decode_text_consumes_padding() {
        let mut raw = Vec::new();
        raw.put_u32(5);
        raw.put_slice(b"hello");
        raw.put_bytes(0, TEXT_LEN - 5);
        raw.put_i32(42); // trailing field

        let mut buf = &raw[..];
        let value = Type::Text.decode(&mut buf).expect("should decode");
        assert_eq!(value, Value::Text("hello".into()));

        // The padding must have been consumed up to the next field.
        let next = Type::Int.decode(&mut buf).expect("should decode");
        assert_eq!(next, Value::Int(42));
    }

    #[test]
    fn test_decode_truncated() {
        let mut buf = &[0x00, 0x01][..];
        let result = Type::Int.decode(&mut buf);
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::Truncated {
                expected: 4,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_decode_oversized_text_length() {
        let mut raw = Vec::new();
        raw.put_u32(TEXT_LEN as u32 + 1);
        raw.put_bytes(0, TEXT_LEN);

        let mut buf = &raw[..];
        let result = Type::Text.decode(&mut buf);
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::TextTooLong { .. }))
        ));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut raw = Vec::new();
        raw.put_u32(2);
        raw.put_slice(&[0xC3, 0x28]);
        raw.put_bytes(0, TEXT_LEN - 2);

        let mut buf = &raw[..];
        let result = Type::Text.decode(&mut buf);
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::InvalidUtf8))
        ));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Type::parse("int").unwrap(), Type::Int);
        assert_eq!(Type::parse("INT").unwrap(), Type::Int);
        assert_eq!(Type::parse("String").unwrap(), Type::Text);
        assert!(Type::parse("blob").is_err());
    }
}
