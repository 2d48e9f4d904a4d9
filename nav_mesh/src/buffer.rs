// Little-endian cursor over an in-memory nav file.
//
// The whole file is read into memory before parsing starts, so decoding is a
// walk over a byte slice. Every read checks the remaining length first and
// reports `NavError::Truncated` with the offending offset, so a short file
// never panics and never yields a partial record.

use crate::error::{NavError, NavResult};
use glam::Vec3;

/// Sequential reader over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct NavReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> NavReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take the next `len` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, len: usize) -> NavResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(NavError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Advance past `len` bytes without looking at them.
    pub fn skip(&mut self, len: usize) -> NavResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> NavResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> NavResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> NavResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> NavResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> NavResult<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    /// Three consecutive `f32`s as x, y, z.
    pub fn read_vec3(&mut self) -> NavResult<Vec3> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        Ok(Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_scalars() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xFEED_FACEu32.to_le_bytes());
        bytes.extend_from_slice(&513u16.to_le_bytes());
        bytes.push(7);
        bytes.extend_from_slice(&1.5f32.to_le_bytes());

        let mut reader = NavReader::new(&bytes);
        assert_eq!(reader.read_u32().unwrap(), 0xFEED_FACE);
        assert_eq!(reader.read_u16().unwrap(), 513);
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn reads_vec3_in_xyz_order() {
        let mut bytes = Vec::new();
        for v in [1.0f32, -2.0, 3.25] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let mut reader = NavReader::new(&bytes);
        assert_eq!(reader.read_vec3().unwrap(), Vec3::new(1.0, -2.0, 3.25));
    }

    #[test]
    fn short_read_reports_truncation() {
        let bytes = [1u8, 2, 3];
        let mut reader = NavReader::new(&bytes);
        reader.read_u8().unwrap();
        match reader.read_u32() {
            Err(NavError::Truncated {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 1);
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn failed_read_does_not_advance() {
        let bytes = [9u8; 2];
        let mut reader = NavReader::new(&bytes);
        assert!(reader.read_u32().is_err());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u16().unwrap(), u16::from_le_bytes([9, 9]));
    }

    #[test]
    fn skip_and_read_bytes() {
        let bytes = [0u8, 1, 2, 3, 4];
        let mut reader = NavReader::new(&bytes);
        reader.skip(2).unwrap();
        assert_eq!(reader.read_bytes(3).unwrap(), &[2, 3, 4]);
        assert!(reader.skip(1).is_err());
    }
}
