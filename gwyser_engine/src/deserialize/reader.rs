use gwyser_pack::{unpack, PackError, Unpacked};
use gwyser_types::DeserializeError;
use std::mem;

/// Elements per packer call when reading arrays.
const ARRAY_CHUNK: usize = 4096;

pub(super) fn pack_error(e: PackError) -> DeserializeError {
    DeserializeError::data(e.to_string())
}

/// A cursor over one block of the input.
///
/// Positions are offsets into the whole input, so that consumption can be
/// reported from any nesting level. Nothing is ever read past `end`.
#[derive(Debug)]
pub(super) struct Reader<'b> {
    buf: &'b [u8],
    pos: usize,
    end: usize,
}

impl<'b> Reader<'b> {
    pub fn new(buf: &'b [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    fn check_size(&self, required: usize, what: &str) -> Result<(), DeserializeError> {
        if self.remaining() >= required {
            return Ok(());
        }
        Err(DeserializeError::truncated(format!(
            "End of data was reached while reading value of type {what}. \
             It requires {required} bytes but only {} bytes remain.",
            self.remaining()
        )))
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'b [u8], DeserializeError> {
        self.check_size(len, what)?;
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Splits off the next `len` bytes as a reader of their own.
    pub fn sub_reader(&mut self, len: usize, what: &str) -> Result<Reader<'b>, DeserializeError> {
        self.check_size(len, what)?;
        let sub = Reader {
            buf: self.buf,
            pos: self.pos,
            end: self.pos + len,
        };
        self.pos += len;
        Ok(sub)
    }

    /// A nul-terminated string, without the nul.
    pub fn cstring(&mut self) -> Result<&'b [u8], DeserializeError> {
        let rest = &self.buf[self.pos..self.end];
        let len = rest.iter().position(|&b| b == 0).ok_or_else(|| {
            DeserializeError::truncated("End of data was reached while looking for the end of a string.")
        })?;
        self.pos += len + 1;
        Ok(&rest[..len])
    }

    fn scalar<T>(&mut self, format: &str, what: &str) -> Result<T, DeserializeError>
    where
        T: TryFrom<Unpacked, Error = PackError>,
    {
        let bytes = self.take(mem::size_of::<T>(), what)?;
        let (_, mut values) = unpack(format, bytes).map_err(pack_error)?;
        let value = values
            .pop()
            .ok_or_else(|| DeserializeError::data(format!("No {what} value unpacked")))?;
        T::try_from(value).map_err(pack_error)
    }

    pub fn u8(&mut self, what: &str) -> Result<u8, DeserializeError> {
        self.scalar("<C", what)
    }
    pub fn i8(&mut self) -> Result<i8, DeserializeError> {
        self.scalar("<c", "int8")
    }
    pub fn i16(&mut self) -> Result<i16, DeserializeError> {
        self.scalar("<h", "int16")
    }
    pub fn i32(&mut self) -> Result<i32, DeserializeError> {
        self.scalar("<i", "int32")
    }
    pub fn i64(&mut self) -> Result<i64, DeserializeError> {
        self.scalar("<q", "int64")
    }
    pub fn f64(&mut self) -> Result<f64, DeserializeError> {
        self.scalar("<d", "double")
    }
    pub fn boolean(&mut self) -> Result<bool, DeserializeError> {
        Ok(self.u8("boolean")? != 0)
    }

    /// Reads an array length and checks that `len * elem_size` bytes remain.
    ///
    /// For variable-size elements `elem_size` is their minimum size.
    pub fn array_len(&mut self, elem_size: usize, what: &str) -> Result<usize, DeserializeError> {
        let raw: u64 = self.scalar("<Q", "data-size")?;
        let len = usize::try_from(raw)
            .ok()
            .filter(|len| *len < usize::MAX / elem_size)
            .ok_or_else(|| {
                DeserializeError::size_t(
                    "Data of size larger than what can be represented on this machine was encountered.",
                )
            })?;
        self.check_size(len * elem_size, what)?;
        Ok(len)
    }

    /// Reads `len` fixed-size elements, already validated by [`Self::array_len`].
    pub fn array<T>(&mut self, code: char, len: usize, what: &str) -> Result<Vec<T>, DeserializeError>
    where
        T: TryFrom<Unpacked, Error = PackError>,
    {
        let elem_size = mem::size_of::<T>();
        let bytes = self.take(len * elem_size, what)?;
        let mut values = Vec::with_capacity(len);
        for chunk in bytes.chunks(ARRAY_CHUNK * elem_size) {
            let format = format!("<{}{code}", chunk.len() / elem_size);
            let (_, unpacked) = unpack(&format, chunk).map_err(pack_error)?;
            for value in unpacked {
                values.push(T::try_from(value).map_err(pack_error)?);
            }
        }
        Ok(values)
    }
}
