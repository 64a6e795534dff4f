//! Validated glyph indices

use super::{FontError, FontResult};

/// Number of glyphs in every font: the code points `0..=127`
pub const GLYPH_COUNT: usize = 128;

/// Escape marker that starts an inline directive
pub const ESCAPE: u8 = 0x1B;

/// A byte known to index a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodePoint(u8);

impl CodePoint {
    /// Tab, which never advances the pen
    pub const TAB: Self = Self(b'\t');
    /// Line feed
    pub const NEWLINE: Self = Self(b'\n');
    /// Space
    pub const SPACE: Self = Self(b' ');
    /// Escape marker
    pub const ESCAPE: Self = Self(ESCAPE);

    /// Validate a byte, returning `None` outside the glyph range
    pub const fn new(byte: u8) -> Option<Self> {
        if (byte as usize) < GLYPH_COUNT {
            Some(Self(byte))
        } else {
            None
        }
    }

    /// The raw byte
    pub const fn byte(self) -> u8 {
        self.0
    }

    /// Position in per-glyph arrays
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every code point in ascending order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..GLYPH_COUNT as u8).map(Self)
    }

    /// Validate every byte of `text`
    ///
    /// Fails on the first byte outside the glyph range so callers can refuse
    /// the whole string before drawing any of it.
    pub fn validate(text: &str) -> FontResult<&[u8]> {
        let bytes = text.as_bytes();
        match bytes.iter().position(|&b| Self::new(b).is_none()) {
            Some(index) => Err(FontError::Encoding {
                byte: bytes[index],
                index,
            }),
            None => Ok(bytes),
        }
    }

    /// Convert a byte already checked by [`Self::validate`]
    pub(crate) const fn from_validated(byte: u8) -> Self {
        debug_assert!((byte as usize) < GLYPH_COUNT);
        Self(byte)
    }
}

impl TryFrom<u8> for CodePoint {
    type Error = FontError;

    fn try_from(byte: u8) -> FontResult<Self> {
        Self::new(byte).ok_or(FontError::Encoding { byte, index: 0 })
    }
}

impl From<CodePoint> for char {
    fn from(cp: CodePoint) -> Self {
        Self::from(cp.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_enforced() {
        assert_eq!(CodePoint::new(0).map(CodePoint::index), Some(0));
        assert_eq!(CodePoint::new(127).map(CodePoint::index), Some(127));
        assert!(CodePoint::new(128).is_none());
        assert!(CodePoint::try_from(200u8).is_err());
    }

    #[test]
    fn test_all_is_dense_and_ordered() {
        let all: Vec<_> = CodePoint::all().collect();
        assert_eq!(all.len(), GLYPH_COUNT);
        assert!(all.iter().enumerate().all(|(i, cp)| cp.index() == i));
    }

    #[test]
    fn test_validate_reports_first_bad_byte() {
        assert!(CodePoint::validate("plain ascii\t\x1br").is_ok());

        match CodePoint::validate("ab\u{e9}") {
            Err(FontError::Encoding { byte, index }) => {
                assert_eq!(index, 2);
                assert_eq!(byte, 0xC3);
            }
            other => panic!("expected encoding error, got {:?}", other),
        }
    }
}
