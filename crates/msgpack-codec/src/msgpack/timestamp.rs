//! The MessagePack timestamp extension (type -1).
//!
//! Three payload layouts, all big-endian:
//!
//! - 4 bytes: `u32` seconds, no nanoseconds.
//! - 8 bytes: 30-bit nanoseconds above 34-bit seconds in one `u64`.
//! - 12 bytes: `u32` nanoseconds, then `i64` seconds.

use chrono::{DateTime, Utc};

use crate::error::TimestampError;
use crate::Ext;

/// Extension type reserved for timestamps.
pub const TIMESTAMP_TAG: i8 = -1;

pub(crate) fn decode_timestamp(payload: &[u8]) -> Result<DateTime<Utc>, TimestampError> {
    let (seconds, nanoseconds) = match *payload {
        [a, b, c, d] => (i64::from(u32::from_be_bytes([a, b, c, d])), 0),
        [a, b, c, d, e, f, g, h] => {
            let packed = u64::from_be_bytes([a, b, c, d, e, f, g, h]);
            ((packed & 0x3_ffff_ffff) as i64, (packed >> 34) as u32)
        }
        [a, b, c, d, ref rest @ ..] if rest.len() == 8 => {
            let mut secs = [0u8; 8];
            secs.copy_from_slice(rest);
            (i64::from_be_bytes(secs), u32::from_be_bytes([a, b, c, d]))
        }
        _ => {
            return Err(TimestampError::InvalidLength {
                len: payload.len(),
            })
        }
    };
    DateTime::<Utc>::from_timestamp(seconds, nanoseconds).ok_or(TimestampError::OutOfRange {
        seconds,
        nanoseconds,
    })
}

/// Picks the shortest layout that holds `datetime` exactly.
fn encode_timestamp(datetime: DateTime<Utc>) -> Vec<u8> {
    let seconds = datetime.timestamp();
    let nanoseconds = datetime.timestamp_subsec_nanos();
    if seconds >> 34 == 0 {
        let packed = (u64::from(nanoseconds) << 34) | seconds as u64;
        if let Ok(short) = u32::try_from(packed) {
            return short.to_be_bytes().to_vec();
        }
        return packed.to_be_bytes().to_vec();
    }
    let mut payload = Vec::with_capacity(12);
    payload.extend_from_slice(&nanoseconds.to_be_bytes());
    payload.extend_from_slice(&seconds.to_be_bytes());
    payload
}

impl Ext {
    /// Timestamp extension for `datetime`.
    pub fn from_timestamp(datetime: DateTime<Utc>) -> Ext {
        Ext::new(TIMESTAMP_TAG, encode_timestamp(datetime))
    }

    /// Reads the instant back out of a timestamp extension.
    pub fn to_timestamp(&self) -> Result<DateTime<Utc>, TimestampError> {
        if self.tag != TIMESTAMP_TAG {
            return Err(TimestampError::NotTimestamp { tag: self.tag });
        }
        decode_timestamp(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64, nanoseconds: u32) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(seconds, nanoseconds).unwrap()
    }

    #[test]
    fn shortest_layout() {
        assert_eq!(Ext::from_timestamp(at(1, 0)).data, [0, 0, 0, 1]);
        assert_eq!(Ext::from_timestamp(at(0xffff_ffff, 0)).data.len(), 4);
        assert_eq!(
            Ext::from_timestamp(at(1, 1)).data,
            [0, 0, 0, 0x04, 0, 0, 0, 0x01]
        );
        assert_eq!(Ext::from_timestamp(at(1 << 34, 0)).data.len(), 12);
        assert_eq!(Ext::from_timestamp(at(-1, 500)).data.len(), 12);
    }

    #[test]
    fn layouts_read_back() {
        for t in [
            at(0, 0),
            at(1_700_000_000, 0),
            at(1_700_000_000, 123_456_789),
            at(1 << 34, 999_999_999),
            at(-62_135_596_800, 1),
        ] {
            let ext = Ext::from_timestamp(t);
            assert_eq!(ext.tag, TIMESTAMP_TAG);
            assert_eq!(ext.to_timestamp(), Ok(t));
        }
    }

    #[test]
    fn rejects_bad_payloads() {
        assert_eq!(
            Ext::new(TIMESTAMP_TAG, vec![0]).to_timestamp(),
            Err(TimestampError::InvalidLength { len: 1 })
        );
        assert_eq!(
            Ext::new(5, vec![0; 4]).to_timestamp(),
            Err(TimestampError::NotTimestamp { tag: 5 })
        );
        let mut bad_nanos = vec![0xff; 4];
        bad_nanos.extend_from_slice(&0i64.to_be_bytes());
        assert_eq!(
            Ext::new(TIMESTAMP_TAG, bad_nanos).to_timestamp(),
            Err(TimestampError::OutOfRange {
                seconds: 0,
                nanoseconds: u32::MAX
            })
        );
        let mut far = vec![0; 4];
        far.extend_from_slice(&i64::MAX.to_be_bytes());
        assert!(matches!(
            Ext::new(TIMESTAMP_TAG, far).to_timestamp(),
            Err(TimestampError::OutOfRange { .. })
        ));
    }
}
