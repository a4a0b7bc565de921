//! Stable identifiers for canonical positions.
//!
//! A [`StateKey`] is the only thing the search statistics are keyed by. Two
//! canonically equal positions must produce equal keys; distinct positions
//! may collide only if the game chooses a lossy encoding.

use std::fmt;

/// Byte-sequence key of a canonical position.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateKey(Box<[u8]>);

impl StateKey {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for StateKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }
}

impl From<&[u8]> for StateKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }
}

impl From<String> for StateKey {
    fn from(s: String) -> Self {
        Self::from(s.into_bytes())
    }
}

impl From<&str> for StateKey {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equal_bytes_equal_keys() {
        let a = StateKey::from(vec![1u8, 2, 3]);
        let b = StateKey::from(&[1u8, 2, 3][..]);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_string_keys() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(StateKey::from(fen), StateKey::from(fen.to_string()));
        assert_eq!(StateKey::from(fen).len(), fen.len());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = StateKey::from(vec![0u8, 9]);
        let b = StateKey::from(vec![1u8]);
        assert!(a < b);
    }

    #[test]
    fn test_display_is_hex() {
        let key = StateKey::from(vec![0x00u8, 0xab, 0x10]);
        assert_eq!(key.to_string(), "00ab10");
        assert_eq!(format!("{:?}", key), "StateKey(00ab10)");
    }
}
