//! Canonical CBOR encoding for deterministic serialization.
//!
//! Records and calls are encoded as definite-length CBOR arrays of unsigned
//! integers and byte strings, with every integer in its smallest encoding.
//! The same value always produces the same bytes, so digests and signatures
//! over those bytes are stable across platforms.
//!
//! Decoding goes through `ciborium` and then checks that re-encoding the
//! decoded value gives back the input, which rejects non-canonical forms.

use ciborium::value::Value;

use crate::error::CoreError;

/// Major type 0: unsigned integer.
const MAJOR_UINT: u8 = 0;
/// Major type 2: byte string.
const MAJOR_BYTES: u8 = 2;
/// Major type 4: array.
const MAJOR_ARRAY: u8 = 4;

/// A field of a canonical array.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Uint(u64),
    Bytes(&'a [u8]),
}

/// Encode `fields` as a canonical CBOR array.
pub fn encode_array(fields: &[Field<'_>]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(8 + fields.len() * 9);
    encode_head(&mut buf, MAJOR_ARRAY, fields.len() as u64);
    for field in fields {
        match field {
            Field::Uint(n) => encode_head(&mut buf, MAJOR_UINT, *n),
            Field::Bytes(b) => {
                encode_head(&mut buf, MAJOR_BYTES, b.len() as u64);
                buf.extend_from_slice(b);
            }
        }
    }
    buf
}

/// Encode a head byte plus argument in the smallest valid form.
fn encode_head(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Decode a canonical CBOR array of exactly `arity` items.
pub fn decode_array(bytes: &[u8], arity: usize) -> Result<Vec<Value>, CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::Decoding(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(CoreError::Decoding(format!(
                "expected array, got {other:?}"
            )))
        }
    };

    if items.len() != arity {
        return Err(CoreError::Decoding(format!(
            "expected {arity} items, got {}",
            items.len()
        )));
    }

    Ok(items)
}

/// Read an unsigned integer item.
pub fn uint_at(items: &[Value], index: usize) -> Result<u64, CoreError> {
    match items.get(index) {
        Some(Value::Integer(i)) => u64::try_from(*i)
            .map_err(|_| CoreError::Decoding(format!("item {index} is not a u64"))),
        _ => Err(CoreError::Decoding(format!(
            "item {index} is not an integer"
        ))),
    }
}

/// Read a fixed-width byte string item.
pub fn bytes_at<const N: usize>(items: &[Value], index: usize) -> Result<[u8; N], CoreError> {
    match items.get(index) {
        Some(Value::Bytes(b)) => b.as_slice().try_into().map_err(|_| {
            CoreError::Decoding(format!("item {index} has length {}, want {N}", b.len()))
        }),
        _ => Err(CoreError::Decoding(format!("item {index} is not bytes"))),
    }
}

/// Reject input that decodes but is not in canonical form.
pub fn ensure_canonical(input: &[u8], reencoded: &[u8]) -> Result<(), CoreError> {
    if input != reencoded {
        return Err(CoreError::Decoding("non-canonical encoding".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_integers_are_single_byte() {
        let bytes = encode_array(&[Field::Uint(0), Field::Uint(23)]);
        assert_eq!(bytes, vec![0x82, 0x00, 0x17]);
    }

    #[test]
    fn test_integer_width_boundaries() {
        assert_eq!(encode_array(&[Field::Uint(24)]), vec![0x81, 0x18, 24]);
        assert_eq!(encode_array(&[Field::Uint(256)]), vec![0x81, 0x19, 0x01, 0x00]);
        assert_eq!(
            encode_array(&[Field::Uint(65_536)]),
            vec![0x81, 0x1a, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(encode_array(&[Field::Uint(u64::MAX)]).len(), 10);
    }

    #[test]
    fn test_bytes_field() {
        let bytes = encode_array(&[Field::Bytes(&[0xaa, 0xbb])]);
        assert_eq!(bytes, vec![0x81, 0x42, 0xaa, 0xbb]);
    }

    #[test]
    fn test_decode_rejects_wrong_arity() {
        let bytes = encode_array(&[Field::Uint(1)]);
        assert!(decode_array(&bytes, 2).is_err());
    }

    #[test]
    fn test_ensure_canonical() {
        let bytes = encode_array(&[Field::Uint(9)]);
        assert!(ensure_canonical(&bytes, &bytes).is_ok());
        assert!(ensure_canonical(&[0x81, 0x18, 0x09], &bytes).is_err());
    }

    #[test]
    fn test_decode_rejects_non_array() {
        // A bare unsigned integer.
        assert!(decode_array(&[0x05], 1).is_err());
    }

    #[test]
    fn test_decode_reads_values() {
        let key = [7u8; 32];
        let bytes = encode_array(&[Field::Uint(300), Field::Bytes(&key)]);
        let items = decode_array(&bytes, 2).unwrap();
        assert_eq!(uint_at(&items, 0).unwrap(), 300);
        assert_eq!(bytes_at::<32>(&items, 1).unwrap(), key);
        assert!(bytes_at::<64>(&items, 1).is_err());
        assert!(uint_at(&items, 1).is_err());
        assert!(bytes_at::<32>(&items, 0).is_err());
    }
}
