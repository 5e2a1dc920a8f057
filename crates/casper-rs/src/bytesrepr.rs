//! Canonical byte encoding used for hashing deploys.
//!
//! Integers are little-endian; strings and byte vectors carry a `u32` length
//! prefix. Every value hashed into a deploy goes through this encoding.
use crate::error::CasperHelperError;

/// A trait for writing values in their canonical byte form.
pub trait ToBytes {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError>;

    fn to_bytes(&self) -> Result<Vec<u8>, CasperHelperError> {
        let mut buffer = Vec::new();
        self.write_bytes(&mut buffer)?;
        Ok(buffer)
    }
}

/// Writes a collection length as a little-endian `u32`.
pub fn write_len(writer: &mut Vec<u8>, len: usize) -> Result<(), CasperHelperError> {
    let len = u32::try_from(len).map_err(|_| {
        CasperHelperError::EncodingFailed(format!("Length {} does not fit in u32", len))
    })?;
    len.write_bytes(writer)
}

/// Writes a byte slice prefixed with its length.
pub fn write_byte_vec(writer: &mut Vec<u8>, bytes: &[u8]) -> Result<(), CasperHelperError> {
    write_len(writer, bytes.len())?;
    writer.extend_from_slice(bytes);
    Ok(())
}

impl ToBytes for u8 {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        writer.push(*self);
        Ok(())
    }
}

impl ToBytes for u32 {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        writer.extend_from_slice(&self.to_le_bytes());
        Ok(())
    }
}

impl ToBytes for u64 {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        writer.extend_from_slice(&self.to_le_bytes());
        Ok(())
    }
}

impl ToBytes for str {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        write_byte_vec(writer, self.as_bytes())
    }
}

impl ToBytes for String {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        self.as_str().write_bytes(writer)
    }
}

impl ToBytes for [u8; 32] {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        writer.extend_from_slice(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_little_endian() {
        assert_eq!(7u8.to_bytes().unwrap(), vec![7]);
        assert_eq!(1u32.to_bytes().unwrap(), vec![1, 0, 0, 0]);
        assert_eq!(
            0x0102_0304_0506_0708u64.to_bytes().unwrap(),
            vec![8, 7, 6, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn test_string_is_length_prefixed() {
        let bytes = "abc".to_string().to_bytes().unwrap();
        assert_eq!(bytes, vec![3, 0, 0, 0, b'a', b'b', b'c']);

        let empty = String::new().to_bytes().unwrap();
        assert_eq!(empty, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_byte_vec_and_fixed_array() {
        let mut writer = Vec::new();
        write_byte_vec(&mut writer, &[0xaa, 0xbb]).unwrap();
        assert_eq!(writer, vec![2, 0, 0, 0, 0xaa, 0xbb]);

        let fixed = [9u8; 32].to_bytes().unwrap();
        assert_eq!(fixed.len(), 32);
        assert!(fixed.iter().all(|b| *b == 9));
    }
}
