//! Sequential big-endian reader over an in-memory buffer

use super::error::{PsarcError, PsarcResult};

/// Widest integer `read_number` can accumulate
const MAX_NUMBER_WIDTH: usize = 8;

/// Big-endian byte cursor
///
/// Every failed read leaves the position untouched.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether the cursor has consumed the whole buffer
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, wanted: usize) -> PsarcResult<()> {
        if self.remaining() < wanted {
            return Err(PsarcError::UnexpectedEndOfData {
                offset: self.pos,
                wanted,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read the next `n` bytes as a borrowed slice
    pub fn read_bytes(&mut self, n: usize) -> PsarcResult<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read the next `N` bytes into an array
    pub fn read_array<const N: usize>(&mut self) -> PsarcResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    /// Decode the next `n` bytes as text (invalid UTF-8 is replaced)
    pub fn read_string(&mut self, n: usize) -> PsarcResult<String> {
        let bytes = self.read_bytes(n)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read an `n`-byte big-endian unsigned integer
    pub fn read_number(&mut self, n: usize) -> PsarcResult<u64> {
        if n > MAX_NUMBER_WIDTH {
            return Err(PsarcError::InvalidFieldWidth(n));
        }
        let bytes = self.read_bytes(n)?;
        Ok(bytes
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)))
    }

    /// Read an `n`-byte integer if a full value remains
    ///
    /// Returns `None` at the end of the buffer instead of failing, which is
    /// how table scans detect their last entry.
    pub fn try_read_number(&mut self, n: usize) -> Option<u64> {
        if self.remaining() < n {
            return None;
        }
        self.read_number(n).ok()
    }

    /// Read a 2-byte big-endian integer
    pub fn read_short(&mut self) -> PsarcResult<u16> {
        self.read_number(2).map(|value| value as u16)
    }

    /// Read a 4-byte big-endian integer
    pub fn read_int(&mut self) -> PsarcResult<u32> {
        self.read_number(4).map(|value| value as u32)
    }

    /// Advance `n` bytes without reading
    pub fn skip(&mut self, n: usize) -> PsarcResult<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_numbers() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0x01, 0x02, 0x03, 0x04, 0x05];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_short().unwrap(), 0x1234);
        assert_eq!(cursor.read_int().unwrap(), 0x5678_9ABC);
        assert_eq!(cursor.read_number(5).unwrap(), 0x01_0203_0405);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_read_string_and_skip() {
        let mut cursor = ByteCursor::new(b"PSAR\x00\x01zlib");
        assert_eq!(cursor.read_string(4).unwrap(), "PSAR");
        cursor.skip(2).unwrap();
        assert_eq!(cursor.read_string(4).unwrap(), "zlib");
        assert_eq!(cursor.position(), 10);
    }

    #[test]
    fn test_unexpected_end_leaves_position() {
        let mut cursor = ByteCursor::new(&[0x00, 0x01, 0x02]);
        cursor.skip(1).unwrap();

        let err = cursor.read_int().unwrap_err();
        assert!(matches!(
            err,
            PsarcError::UnexpectedEndOfData {
                offset: 1,
                wanted: 4,
                remaining: 2
            }
        ));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_short().unwrap(), 0x0102);
    }

    #[test]
    fn test_skip_past_end() {
        let mut cursor = ByteCursor::new(&[0u8; 4]);
        assert!(cursor.skip(5).is_err());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_try_read_number_terminates() {
        let mut cursor = ByteCursor::new(&[0x00, 0x10, 0x00, 0x20, 0xFF]);
        assert_eq!(cursor.try_read_number(2), Some(0x10));
        assert_eq!(cursor.try_read_number(2), Some(0x20));
        assert_eq!(cursor.try_read_number(2), None);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_width_limit() {
        let mut cursor = ByteCursor::new(&[0u8; 16]);
        assert!(matches!(
            cursor.read_number(9),
            Err(PsarcError::InvalidFieldWidth(9))
        ));
    }

    proptest! {
        #[test]
        fn read_number_is_big_endian_sum(bytes in prop::collection::vec(any::<u8>(), 0..=8)) {
            let expected = bytes
                .iter()
                .enumerate()
                .map(|(i, &b)| u128::from(b) << (8 * (bytes.len() - 1 - i)))
                .sum::<u128>();

            let mut cursor = ByteCursor::new(&bytes);
            let value = cursor.read_number(bytes.len()).unwrap();
            prop_assert_eq!(u128::from(value), expected);
            prop_assert!(cursor.is_empty());
        }
    }
}
