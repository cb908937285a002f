//! Structural validation of a single MessagePack value.
//!
//! Walks the marker grammar without materializing anything. Strings are
//! checked for UTF-8, timestamp extensions must hold a valid instant, the
//! reserved marker is rejected and nesting is bounded by [`RECURSION_LIMIT`].

use msgpack_buffers::Reader;

use super::marker::Marker;
use super::timestamp::{decode_timestamp, TIMESTAMP_TAG};
use super::RECURSION_LIMIT;
use crate::error::FragmentError;

/// Checks that `data` holds exactly one well-formed value.
pub fn validate(data: &[u8]) -> Result<(), FragmentError> {
    let mut reader = Reader::new(data);
    skip_any(&mut reader, 0)?;
    if !reader.is_eof() {
        return Err(FragmentError::TrailingBytes {
            offset: reader.position(),
            remaining: reader.remaining(),
        });
    }
    Ok(())
}

fn skip_any(r: &mut Reader<'_>, depth: usize) -> Result<(), FragmentError> {
    let offset = r.position();
    let byte = r.u8()?;
    match Marker::from_u8(byte) {
        Marker::FixPos(_)
        | Marker::FixNeg(_)
        | Marker::Null
        | Marker::False
        | Marker::True => {}
        Marker::Reserved => {
            return Err(FragmentError::InvalidMarker {
                marker: byte,
                offset,
            })
        }
        Marker::FixStr(n) => skip_str(r, usize::from(n))?,
        Marker::Str8 => {
            let n = usize::from(r.u8()?);
            skip_str(r, n)?
        }
        Marker::Str16 => {
            let n = usize::from(r.u16()?);
            skip_str(r, n)?
        }
        Marker::Str32 => {
            let n = r.u32()? as usize;
            skip_str(r, n)?
        }
        Marker::Bin8 => {
            let n = usize::from(r.u8()?);
            r.skip(n)?
        }
        Marker::Bin16 => {
            let n = usize::from(r.u16()?);
            r.skip(n)?
        }
        Marker::Bin32 => {
            let n = r.u32()? as usize;
            r.skip(n)?
        }
        Marker::F32 | Marker::U32 | Marker::I32 => r.skip(4)?,
        Marker::F64 | Marker::U64 | Marker::I64 => r.skip(8)?,
        Marker::U8 | Marker::I8 => r.skip(1)?,
        Marker::U16 | Marker::I16 => r.skip(2)?,
        Marker::FixExt1 => skip_ext(r, 1)?,
        Marker::FixExt2 => skip_ext(r, 2)?,
        Marker::FixExt4 => skip_ext(r, 4)?,
        Marker::FixExt8 => skip_ext(r, 8)?,
        Marker::FixExt16 => skip_ext(r, 16)?,
        Marker::Ext8 => {
            let n = usize::from(r.u8()?);
            skip_ext(r, n)?
        }
        Marker::Ext16 => {
            let n = usize::from(r.u16()?);
            skip_ext(r, n)?
        }
        Marker::Ext32 => {
            let n = r.u32()? as usize;
            skip_ext(r, n)?
        }
        Marker::FixArray(n) => skip_items(r, usize::from(n), depth)?,
        Marker::Array16 => {
            let n = usize::from(r.u16()?);
            skip_items(r, n, depth)?
        }
        Marker::Array32 => {
            let n = r.u32()? as usize;
            skip_items(r, n, depth)?
        }
        Marker::FixMap(n) => skip_items(r, usize::from(n) * 2, depth)?,
        Marker::Map16 => {
            let n = usize::from(r.u16()?);
            skip_items(r, n * 2, depth)?
        }
        Marker::Map32 => {
            let n = r.u32()? as usize;
            skip_items(r, n.saturating_mul(2), depth)?
        }
    }
    Ok(())
}

fn skip_str(r: &mut Reader<'_>, n: usize) -> Result<(), FragmentError> {
    r.utf8(n)?;
    Ok(())
}

/// Timestamp payloads (tag -1) must decode to a representable instant.
fn skip_ext(r: &mut Reader<'_>, n: usize) -> Result<(), FragmentError> {
    let tag = r.i8()?;
    let offset = r.position();
    let payload = r.buf(n)?;
    if tag == TIMESTAMP_TAG && decode_timestamp(payload).is_err() {
        return Err(FragmentError::InvalidTimestamp { offset });
    }
    Ok(())
}

fn skip_items(r: &mut Reader<'_>, count: usize, depth: usize) -> Result<(), FragmentError> {
    if depth >= RECURSION_LIMIT {
        return Err(FragmentError::RecursionLimit);
    }
    for _ in 0..count {
        skip_any(r, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_single_values() {
        assert_eq!(validate(&[0xc0]), Ok(()));
        assert_eq!(validate(&[0x92, 0x01, 0xa1, b'a']), Ok(()));
        assert_eq!(validate(&[0x81, 0xa1, b'k', 0xd4, 0x01, 0x00]), Ok(()));
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert_eq!(
            validate(&[0x01, 0x01]),
            Err(FragmentError::TrailingBytes {
                offset: 1,
                remaining: 1
            })
        );
    }

    #[test]
    fn rejects_truncation_and_reserved_marker() {
        assert_eq!(
            validate(&[0x92, 0x01]),
            Err(FragmentError::UnexpectedEof { offset: 2 })
        );
        assert_eq!(
            validate(&[0x91, 0xc1]),
            Err(FragmentError::InvalidMarker {
                marker: 0xc1,
                offset: 1
            })
        );
        assert_eq!(validate(&[]), Err(FragmentError::UnexpectedEof { offset: 0 }));
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(
            validate(&[0xa2, 0xff, 0xfe]),
            Err(FragmentError::InvalidUtf8 { offset: 1 })
        );
    }

    #[test]
    fn bounds_nesting() {
        let mut deep = vec![0x91; RECURSION_LIMIT + 1];
        deep.push(0xc0);
        assert_eq!(validate(&deep), Err(FragmentError::RecursionLimit));
        let mut ok = vec![0x91; RECURSION_LIMIT];
        ok.push(0xc0);
        assert_eq!(validate(&ok), Ok(()));
    }

    #[test]
    fn checks_timestamp_payloads() {
        assert_eq!(validate(&[0xd6, 0xff, 0, 0, 0, 1]), Ok(()));
        assert_eq!(validate(&[0xd4, 0x05, 0x00]), Ok(()));
        assert_eq!(
            validate(&[0xd4, 0xff, 0x00]),
            Err(FragmentError::InvalidTimestamp { offset: 2 })
        );
        let mut bad_nanos = vec![0xc7, 12, 0xff, 0xff, 0xff, 0xff, 0xff];
        bad_nanos.extend_from_slice(&[0; 8]);
        assert_eq!(
            validate(&bad_nanos),
            Err(FragmentError::InvalidTimestamp { offset: 3 })
        );
    }
}
