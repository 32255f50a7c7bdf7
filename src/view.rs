//! Immutable Value Wrapper
//!
//! This module provides [`ByteView`], the read-only wrapper around every
//! payload the cache stores. The wrapper owns a private copy of the payload
//! behind shared immutable storage, so nothing outside the cache can mutate
//! cache-owned memory: accessors either report the length or hand out a
//! fresh copy, never a reference to the owned buffer.
//!
//! # Why copies?
//!
//! Entry sizes are charged against the cache's byte budget when an entry is
//! inserted. If a caller could reach the owned buffer and grow or shrink it,
//! the size accounting would silently drift. Keeping the buffer private
//! makes the accounting invariant enforceable at the type level.
//!
//! Cloning a [`ByteView`] is cheap (a reference-count bump), which is what
//! lets the thread-safe cache hand values out without holding its lock.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

/// The capability the eviction structure charges budget against.
///
/// An entry's cost is `key length + value byte length`; any value type the
/// LRU core stores must report its byte length through this trait.
pub trait ByteSized {
    /// Returns the size of this value in bytes.
    fn byte_len(&self) -> usize;
}

impl ByteSized for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteSized for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// An immutable view over a cached byte payload.
///
/// The view stores its own private copy of whatever payload it is given, so
/// it remains valid even if the loader's buffer is later mutated by its
/// owner. Readers receive independent copies via [`to_vec`](Self::to_vec)
/// and [`to_string_lossy`](Self::to_string_lossy).
///
/// # Examples
///
/// ```
/// use loadcache::ByteView;
///
/// let view = ByteView::new(b"hello");
/// assert_eq!(view.len(), 5);
///
/// let mut copy = view.to_vec();
/// copy[0] = b'j';
/// // the cached payload is unaffected
/// assert_eq!(view.to_vec(), b"hello");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    /// Creates a view holding a private copy of `bytes`.
    pub fn new(bytes: &[u8]) -> Self {
        ByteView {
            bytes: Arc::from(bytes),
        }
    }

    /// Creates a zero-length view.
    ///
    /// Used as the benign result for empty-key lookups at the group layer.
    pub fn empty() -> Self {
        ByteView::new(&[])
    }

    /// Returns the byte length of the payload.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a freshly allocated copy of the payload.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns a copied string form of the payload.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl ByteSized for ByteView {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        ByteView {
            bytes: Arc::from(bytes),
        }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        ByteView::new(s.as_bytes())
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        ByteView::from(s.into_bytes())
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_new_copies_payload() {
        let mut source = vec![1u8, 2, 3];
        let view = ByteView::new(&source);
        source[0] = 9;
        assert_eq!(view.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_copy_isolation() {
        let view = ByteView::new(b"immutable");
        let mut copy = view.to_vec();
        copy[0] = b'X';
        assert_eq!(view.to_vec(), b"immutable");
        assert_eq!(view.to_string_lossy(), "immutable");
    }

    #[test]
    fn test_len_and_empty() {
        assert_eq!(ByteView::new(b"abc").len(), 3);
        assert!(ByteView::empty().is_empty());
        assert_eq!(ByteView::empty().len(), 0);
    }

    #[test]
    fn test_byte_sized() {
        assert_eq!(ByteView::new(b"1234").byte_len(), 4);
        assert_eq!("hello".to_string().byte_len(), 5);
        assert_eq!(vec![0u8; 7].byte_len(), 7);
    }

    #[test]
    fn test_clone_shares_payload() {
        let view = ByteView::from("shared");
        let clone = view.clone();
        assert_eq!(view, clone);
        assert_eq!(clone.to_string_lossy(), "shared");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(ByteView::from(vec![b'a']).to_vec(), b"a");
        assert_eq!(ByteView::from("str").len(), 3);
        assert_eq!(ByteView::from("owned".to_string()).to_string_lossy(), "owned");
    }

    #[test]
    fn test_lossy_string() {
        let view = ByteView::new(&[0xff, 0xfe]);
        // invalid utf-8 is replaced, not an error
        assert_eq!(view.to_string_lossy().chars().count(), 2);
    }
}
