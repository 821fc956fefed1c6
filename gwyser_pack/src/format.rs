use crate::{PackError, PackResult};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use tracing::warn;

/// Largest accepted item count. The check runs after every digit.
pub const MAX_ITEM_COUNT: usize = 100_000_000;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ByteOrder {
    Little,
    Big,
}
impl ByteOrder {
    pub fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            b'<' => Some(Self::Little),
            b'>' => Some(Self::Big),
            _ => None,
        }
    }
    pub fn marker(self) -> char {
        match self {
            Self::Little => '<',
            Self::Big => '>',
        }
    }
}

#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum TypeCode {
    Pad = b'x',
    Int8 = b'c',
    UInt8 = b'C',
    Int16 = b'h',
    UInt16 = b'H',
    Int32 = b'i',
    UInt32 = b'I',
    Int64 = b'q',
    UInt64 = b'Q',
    Float = b'f',
    Double = b'd',
    PascalReal = b'r',
    Block = b'S',
    CString = b's',
    PascalString = b'p',
}
impl TypeCode {
    /// Size of one repetition. Strings report their minimum size.
    pub fn size(self) -> usize {
        match self {
            Self::Pad | Self::Int8 | Self::UInt8 | Self::Block => 1,
            Self::CString | Self::PascalString => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float => 4,
            Self::PascalReal => 6,
            Self::Int64 | Self::UInt64 | Self::Double => 8,
        }
    }

    pub fn is_variable_len(self) -> bool {
        matches!(self, Self::CString | Self::PascalString)
    }

    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct FormatItem {
    pub count: usize,
    pub code: TypeCode,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Format {
    pub order: ByteOrder,
    pub items: Vec<FormatItem>,
}

impl Format {
    pub fn parse(format: &str) -> PackResult<Self> {
        let mut bytes = format.bytes();

        /* byte order */
        let order = bytes
            .next()
            .and_then(ByteOrder::from_marker)
            .ok_or_else(|| PackError::format("Missing byte order marker."))?;

        /* items */
        let mut items = vec![];
        let mut count = 0usize;
        let mut seen_count = false;
        for f in bytes {
            if f.is_ascii_digit() {
                count = 10 * count + (f - b'0') as usize;
                if count > MAX_ITEM_COUNT {
                    return Err(PackError::format("Item count overflow"));
                }
                seen_count = true;
                continue;
            }
            if f.is_ascii_whitespace() {
                if seen_count {
                    return Err(PackError::format(
                        "Item count is separated from its type by whitespace",
                    ));
                }
                continue;
            }

            let code = TypeCode::from_u8(f)
                .ok_or_else(|| PackError::format(format!("Invalid format character 0x{f:02x}")))?;
            if seen_count && count == 0 {
                warn!(format, "zero item count, item skipped");
            } else {
                items.push(FormatItem {
                    count: count.max(1),
                    code,
                });
            }
            count = 0;
            seen_count = false;
        }

        if seen_count {
            return Err(PackError::format("Format ends with a count"));
        }

        Ok(Self { order, items })
    }

    /// Minimum packed size, with every string taking its minimum size.
    pub fn min_size(&self) -> PackResult<usize> {
        let mut size = 0usize;
        for item in self.items.iter() {
            size = item
                .count
                .checked_mul(item.code.size())
                .and_then(|item_size| size.checked_add(item_size))
                .ok_or_else(|| PackError::format("Packed size overflow"))?;
        }
        Ok(size)
    }
}

/// Computes the minimum number of bytes described by `format`.
///
/// Variable-length items (`s` and `p`) are counted with their minimum size
/// of one byte.
pub fn compute_size(format: &str) -> PackResult<usize> {
    Format::parse(format)?.min_size()
}
