//! AppMessage dictionary encoding and decoding
//!
//! Dictionary format:
//! - COUNT (1 byte): number of tuples
//! - per tuple:
//!   - KEY (4 bytes, little-endian)
//!   - TYPE (1 byte): byte array, C string, unsigned or signed integer
//!   - LENGTH (2 bytes, little-endian): value length in bytes
//!   - VALUE (LENGTH bytes)
//!
//! Integers are little-endian and 1, 2 or 4 bytes wide. C strings carry
//! their NUL terminator, which is counted in LENGTH.

use heapless::Vec;

/// Largest dictionary that fits a single link packet
pub const MAX_DICT_SIZE: usize = 250;

/// Size of the tuple count header
pub const DICT_HEADER_SIZE: usize = 1;

/// Size of a tuple header (KEY + TYPE + LENGTH)
pub const TUPLE_HEADER_SIZE: usize = 4 + 1 + 2;

/// Errors that can occur while reading or writing a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictError {
    /// Output buffer cannot hold the tuple
    BufferTooSmall,
    /// Input ended in the middle of a header or value
    Truncated,
    /// Unknown tuple type byte
    InvalidType,
    /// Value length does not suit the tuple type
    InvalidLength,
    /// More than 255 tuples
    TooManyTuples,
    /// Requested key is not present
    KeyNotFound,
    /// Tuple has a different type than requested
    TypeMismatch,
}

/// Tuple value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TupleType {
    /// Raw bytes
    ByteArray,
    /// NUL-terminated string
    CString,
    /// Unsigned little-endian integer
    UInt,
    /// Signed little-endian integer
    Int,
}

// Wire format values
const TYPE_BYTE_ARRAY: u8 = 0;
const TYPE_CSTRING: u8 = 1;
const TYPE_UINT: u8 = 2;
const TYPE_INT: u8 = 3;

impl TupleType {
    /// Parse a tuple type from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            TYPE_BYTE_ARRAY => Some(TupleType::ByteArray),
            TYPE_CSTRING => Some(TupleType::CString),
            TYPE_UINT => Some(TupleType::UInt),
            TYPE_INT => Some(TupleType::Int),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            TupleType::ByteArray => TYPE_BYTE_ARRAY,
            TupleType::CString => TYPE_CSTRING,
            TupleType::UInt => TYPE_UINT,
            TupleType::Int => TYPE_INT,
        }
    }

    fn check_length(self, len: usize) -> Result<(), DictError> {
        match self {
            TupleType::UInt | TupleType::Int if !matches!(len, 1 | 2 | 4) => {
                Err(DictError::InvalidLength)
            }
            TupleType::CString if len == 0 => Err(DictError::InvalidLength),
            _ => Ok(()),
        }
    }
}

/// A borrowed view of one tuple inside a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple<'a> {
    /// Message key
    pub key: u32,
    /// Value type
    pub tuple_type: TupleType,
    /// Raw value bytes
    pub value: &'a [u8],
}

impl<'a> Tuple<'a> {
    /// First value byte, whatever the tuple type
    ///
    /// For little-endian integers this is the low byte, so a companion that
    /// widens a one-byte result to 32 bits still reads back the same value.
    pub fn uint8(&self) -> Option<u8> {
        self.value.first().copied()
    }

    /// Read an unsigned integer value
    pub fn as_u32(&self) -> Result<u32, DictError> {
        if self.tuple_type != TupleType::UInt {
            return Err(DictError::TypeMismatch);
        }
        match *self.value {
            [b0] => Ok(b0 as u32),
            [b0, b1] => Ok(u16::from_le_bytes([b0, b1]) as u32),
            [b0, b1, b2, b3] => Ok(u32::from_le_bytes([b0, b1, b2, b3])),
            _ => Err(DictError::InvalidLength),
        }
    }

    /// Read a signed integer value
    pub fn as_i32(&self) -> Result<i32, DictError> {
        if self.tuple_type != TupleType::Int {
            return Err(DictError::TypeMismatch);
        }
        match *self.value {
            [b0] => Ok(b0 as i8 as i32),
            [b0, b1] => Ok(i16::from_le_bytes([b0, b1]) as i32),
            [b0, b1, b2, b3] => Ok(i32::from_le_bytes([b0, b1, b2, b3])),
            _ => Err(DictError::InvalidLength),
        }
    }

    /// Read either integer type as a signed 64-bit value
    pub fn as_integer(&self) -> Result<i64, DictError> {
        match self.tuple_type {
            TupleType::UInt => self.as_u32().map(i64::from),
            TupleType::Int => self.as_i32().map(i64::from),
            _ => Err(DictError::TypeMismatch),
        }
    }

    /// Read a C string value without its terminator
    pub fn as_str(&self) -> Result<&'a str, DictError> {
        if self.tuple_type != TupleType::CString {
            return Err(DictError::TypeMismatch);
        }
        let text = self.value.split(|&b| b == 0).next().unwrap_or(&[]);
        core::str::from_utf8(text).map_err(|_| DictError::InvalidLength)
    }
}

/// Writes tuples into a caller-provided, size-limited buffer
///
/// The buffer is usually the transport's outbox. Writes that do not fit
/// fail without touching the bytes already written.
pub struct DictWriter<'b> {
    buf: &'b mut [u8],
    len: usize,
    count: u8,
}

impl<'b> DictWriter<'b> {
    /// Start an empty dictionary at the beginning of `buf`
    pub fn new(buf: &'b mut [u8]) -> Result<Self, DictError> {
        let first = buf.first_mut().ok_or(DictError::BufferTooSmall)?;
        *first = 0;
        Ok(Self {
            buf,
            len: DICT_HEADER_SIZE,
            count: 0,
        })
    }

    /// Write a signed 32-bit integer tuple
    pub fn write_int32(&mut self, key: u32, value: i32) -> Result<(), DictError> {
        self.write_tuple(key, TupleType::Int, &value.to_le_bytes())
    }

    /// Write an unsigned 8-bit integer tuple
    pub fn write_uint8(&mut self, key: u32, value: u8) -> Result<(), DictError> {
        self.write_tuple(key, TupleType::UInt, &[value])
    }

    /// Write an unsigned 32-bit integer tuple
    pub fn write_uint32(&mut self, key: u32, value: u32) -> Result<(), DictError> {
        self.write_tuple(key, TupleType::UInt, &value.to_le_bytes())
    }

    /// Write a NUL-terminated string tuple
    pub fn write_cstring(&mut self, key: u32, text: &str) -> Result<(), DictError> {
        let bytes = text.as_bytes();
        let total = bytes.len() + 1;
        self.reserve(key, TupleType::CString, total)?;
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.buf[self.len + bytes.len()] = 0;
        self.commit(total);
        Ok(())
    }

    /// Write a raw byte array tuple
    pub fn write_data(&mut self, key: u32, data: &[u8]) -> Result<(), DictError> {
        self.write_tuple(key, TupleType::ByteArray, data)
    }

    /// Finish the dictionary and return its length in bytes
    pub fn finish(self) -> usize {
        self.len
    }

    fn write_tuple(&mut self, key: u32, tuple_type: TupleType, value: &[u8]) -> Result<(), DictError> {
        self.reserve(key, tuple_type, value.len())?;
        self.buf[self.len..self.len + value.len()].copy_from_slice(value);
        self.commit(value.len());
        Ok(())
    }

    /// Check space, then write the tuple header. Nothing is written when the
    /// check fails, so earlier tuples stay valid.
    fn reserve(&mut self, key: u32, tuple_type: TupleType, value_len: usize) -> Result<(), DictError> {
        if self.count == u8::MAX {
            return Err(DictError::TooManyTuples);
        }
        tuple_type.check_length(value_len)?;
        let value_len_u16 = u16::try_from(value_len).map_err(|_| DictError::BufferTooSmall)?;
        if self.len + TUPLE_HEADER_SIZE + value_len > self.buf.len() {
            return Err(DictError::BufferTooSmall);
        }

        let header = &mut self.buf[self.len..self.len + TUPLE_HEADER_SIZE];
        header[..4].copy_from_slice(&key.to_le_bytes());
        header[4] = tuple_type.to_byte();
        header[5..7].copy_from_slice(&value_len_u16.to_le_bytes());
        self.len += TUPLE_HEADER_SIZE;
        Ok(())
    }

    fn commit(&mut self, value_len: usize) {
        self.len += value_len;
        self.count += 1;
        self.buf[0] = self.count;
    }
}

/// A validated dictionary with owned storage
///
/// Parsing checks every tuple up front, so lookups on a `Dictionary`
/// never fail on malformed data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dictionary {
    bytes: Vec<u8, MAX_DICT_SIZE>,
}

impl Dictionary {
    /// Validate and copy a dictionary from its wire bytes
    ///
    /// Bytes after the last tuple are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DictError> {
        let used = validate(bytes)?;
        let mut stored = Vec::new();
        stored
            .extend_from_slice(&bytes[..used])
            .map_err(|_| DictError::BufferTooSmall)?;
        Ok(Self { bytes: stored })
    }

    /// Build a dictionary with a writer
    pub fn build<F>(f: F) -> Result<Self, DictError>
    where
        F: FnOnce(&mut DictWriter<'_>) -> Result<(), DictError>,
    {
        let mut buf = [0u8; MAX_DICT_SIZE];
        let mut writer = DictWriter::new(&mut buf)?;
        f(&mut writer)?;
        let len = writer.finish();
        Self::from_bytes(&buf[..len])
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        self.bytes.first().copied().unwrap_or(0) as usize
    }

    /// Returns true if the dictionary holds no tuples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wire bytes of this dictionary
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Iterate over all tuples in wire order
    pub fn iter(&self) -> TupleIter<'_> {
        TupleIter {
            bytes: &self.bytes,
            offset: DICT_HEADER_SIZE,
            remaining: self.len(),
        }
    }

    /// Find the first tuple with the given key
    pub fn find(&self, key: u32) -> Option<Tuple<'_>> {
        self.iter().find(|tuple| tuple.key == key)
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = Tuple<'a>;
    type IntoIter = TupleIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the tuples of a dictionary
pub struct TupleIter<'a> {
    bytes: &'a [u8],
    offset: usize,
    remaining: usize,
}

impl<'a> Iterator for TupleIter<'a> {
    type Item = Tuple<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (tuple, next) = read_tuple(self.bytes, self.offset).ok()?;
        self.offset = next;
        self.remaining -= 1;
        Some(tuple)
    }
}

/// Read one tuple starting at `offset`, returning it and the next offset
fn read_tuple(bytes: &[u8], offset: usize) -> Result<(Tuple<'_>, usize), DictError> {
    let header = bytes
        .get(offset..offset + TUPLE_HEADER_SIZE)
        .ok_or(DictError::Truncated)?;
    let key = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let tuple_type = TupleType::from_byte(header[4]).ok_or(DictError::InvalidType)?;
    let value_len = u16::from_le_bytes([header[5], header[6]]) as usize;
    tuple_type.check_length(value_len)?;

    let start = offset + TUPLE_HEADER_SIZE;
    let value = bytes
        .get(start..start + value_len)
        .ok_or(DictError::Truncated)?;

    Ok((
        Tuple {
            key,
            tuple_type,
            value,
        },
        start + value_len,
    ))
}

/// Walk the whole dictionary and return the number of bytes it occupies
fn validate(bytes: &[u8]) -> Result<usize, DictError> {
    let count = *bytes.first().ok_or(DictError::Truncated)?;
    let mut offset = DICT_HEADER_SIZE;
    for _ in 0..count {
        let (_, next) = read_tuple(bytes, offset)?;
        offset = next;
    }
    if offset > MAX_DICT_SIZE {
        return Err(DictError::BufferTooSmall);
    }
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_write_single_int32() {
        let mut buf = [0u8; 16];
        let mut writer = DictWriter::new(&mut buf).unwrap();
        writer.write_int32(10000, 1).unwrap();
        let len = writer.finish();

        assert_eq!(len, 1 + TUPLE_HEADER_SIZE + 4);
        assert_eq!(buf[0], 1); // count
        assert_eq!(&buf[1..5], &10000u32.to_le_bytes());
        assert_eq!(buf[5], TYPE_INT);
        assert_eq!(&buf[6..8], &[4, 0]); // length
        assert_eq!(&buf[8..12], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_write_too_small() {
        let mut buf = [0u8; 8];
        let mut writer = DictWriter::new(&mut buf).unwrap();
        assert_eq!(writer.write_int32(1, 1), Err(DictError::BufferTooSmall));
        assert_eq!(writer.finish(), DICT_HEADER_SIZE);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let mut buf = [0u8; 0];
        assert!(matches!(
            DictWriter::new(&mut buf),
            Err(DictError::BufferTooSmall)
        ));
    }

    #[test]
    fn test_failed_write_keeps_previous_tuples() {
        let mut buf = [0u8; 20];
        let mut writer = DictWriter::new(&mut buf).unwrap();
        writer.write_uint8(1, 7).unwrap();
        assert_eq!(
            writer.write_cstring(2, "far too long"),
            Err(DictError::BufferTooSmall)
        );
        let len = writer.finish();

        let dict = Dictionary::from_bytes(&buf[..len]).unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.find(1).unwrap().uint8(), Some(7));
    }

    #[test]
    fn test_find_and_read_values() {
        let dict = Dictionary::build(|w| {
            w.write_uint8(1, 200)?;
            w.write_int32(2, -5)?;
            w.write_cstring(3, "cam")?;
            w.write_data(4, &[9, 8, 7])
        })
        .unwrap();

        assert_eq!(dict.len(), 4);
        assert_eq!(dict.find(1).unwrap().as_u32(), Ok(200));
        assert_eq!(dict.find(2).unwrap().as_i32(), Ok(-5));
        assert_eq!(dict.find(2).unwrap().as_integer(), Ok(-5));
        assert_eq!(dict.find(3).unwrap().as_str(), Ok("cam"));
        assert_eq!(dict.find(4).unwrap().value, &[9, 8, 7]);
        assert!(dict.find(5).is_none());
    }

    #[test]
    fn test_type_mismatch() {
        let dict = Dictionary::build(|w| w.write_uint8(1, 1)).unwrap();
        let tuple = dict.find(1).unwrap();
        assert_eq!(tuple.as_i32(), Err(DictError::TypeMismatch));
        assert_eq!(tuple.as_str(), Err(DictError::TypeMismatch));
    }

    #[test]
    fn test_uint8_reads_low_byte_of_wide_int() {
        let dict = Dictionary::build(|w| w.write_int32(1, 1)).unwrap();
        assert_eq!(dict.find(1).unwrap().uint8(), Some(1));

        let dict = Dictionary::build(|w| w.write_uint32(1, 0x0000_0100)).unwrap();
        assert_eq!(dict.find(1).unwrap().uint8(), Some(0));
    }

    #[test]
    fn test_parse_truncated_header() {
        let bytes = [1u8, 0x10, 0x27, 0x00];
        assert_eq!(Dictionary::from_bytes(&bytes), Err(DictError::Truncated));
    }

    #[test]
    fn test_parse_truncated_value() {
        let bytes = [1u8, 1, 0, 0, 0, TYPE_INT, 4, 0, 1, 0];
        assert_eq!(Dictionary::from_bytes(&bytes), Err(DictError::Truncated));
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(Dictionary::from_bytes(&[]), Err(DictError::Truncated));
    }

    #[test]
    fn test_parse_invalid_type() {
        let bytes = [1u8, 1, 0, 0, 0, 9, 1, 0, 1];
        assert_eq!(Dictionary::from_bytes(&bytes), Err(DictError::InvalidType));
    }

    #[test]
    fn test_parse_invalid_int_width() {
        let bytes = [1u8, 1, 0, 0, 0, TYPE_UINT, 3, 0, 1, 2, 3];
        assert_eq!(
            Dictionary::from_bytes(&bytes),
            Err(DictError::InvalidLength)
        );
    }

    #[test]
    fn test_parse_ignores_trailing_bytes() {
        let bytes = [0u8, 0xDE, 0xAD];
        let dict = Dictionary::from_bytes(&bytes).unwrap();
        assert!(dict.is_empty());
        assert_eq!(dict.as_bytes(), &[0]);
    }

    proptest! {
        #[test]
        fn prop_int32_survives_wire(key in any::<u32>(), value in any::<i32>()) {
            let dict = Dictionary::build(|w| w.write_int32(key, value)).unwrap();
            let parsed = Dictionary::from_bytes(dict.as_bytes()).unwrap();
            prop_assert_eq!(parsed.find(key).unwrap().as_i32(), Ok(value));
        }

        #[test]
        fn prop_parser_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            if let Ok(dict) = Dictionary::from_bytes(&bytes) {
                prop_assert_eq!(dict.iter().count(), dict.len());
            }
        }
    }
}
