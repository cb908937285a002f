//! Bounded interning of short map keys for one decode call.

use std::collections::HashMap;
use std::hash::Hasher;
use std::str::{self, Utf8Error};
use std::sync::Arc;

use tracing::debug;

/// Maximum number of distinct keys held.
pub const KEY_CACHE_CAPACITY: usize = 512;
/// Keys longer than this many bytes are never interned.
pub const KEY_CACHE_MAX_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Signature {
    hash: u64,
    len: usize,
}

impl Signature {
    fn of(bytes: &[u8]) -> Self {
        let mut hasher = rapidhash::fast::RapidHasher::default();
        hasher.write(bytes);
        Self {
            hash: hasher.finish(),
            len: bytes.len(),
        }
    }
}

/// Maps key bytes to shared `Arc<str>` handles.
///
/// A signature hit is only used when the stored key has the same bytes, so
/// colliding keys never alias. Once full, the cache stops inserting; keys not
/// already present are still decoded, just not shared.
#[derive(Debug, Default)]
pub struct KeyCache {
    entries: HashMap<Signature, Arc<str>>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn intern(&mut self, bytes: &[u8]) -> Result<Arc<str>, Utf8Error> {
        if bytes.len() > KEY_CACHE_MAX_LEN {
            return str::from_utf8(bytes).map(Arc::from);
        }
        let sig = Signature::of(bytes);
        if let Some(key) = self.entries.get(&sig) {
            if key.as_bytes() == bytes {
                return Ok(Arc::clone(key));
            }
            return str::from_utf8(bytes).map(Arc::from);
        }
        let key: Arc<str> = Arc::from(str::from_utf8(bytes)?);
        if self.entries.len() < KEY_CACHE_CAPACITY {
            self.entries.insert(sig, Arc::clone(&key));
            if self.entries.len() == KEY_CACHE_CAPACITY {
                debug!(capacity = KEY_CACHE_CAPACITY, "key cache full");
            }
        }
        Ok(key)
    }
}
