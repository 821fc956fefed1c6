use crate::{PackError, TypeCode};
use derive_more::From;

/// A value handed to [`pack`](crate::pack).
///
/// Every repetition of a numeric or string item takes one value. A block
/// (`S`) takes a single [`PackValue::Bytes`] of exactly `count` bytes.
/// Pascal reals take a [`PackValue::Double`].
#[derive(From, PartialEq, Clone, Copy, Debug)]
pub enum PackValue<'a> {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Bytes(&'a [u8]),
    #[from(ignore)]
    Str(&'a [u8]),
}
impl<'a> From<&'a str> for PackValue<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(s.as_bytes())
    }
}

impl<'a> PackValue<'a> {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Int8(_) => "i8",
            Self::UInt8(_) => "u8",
            Self::Int16(_) => "i16",
            Self::UInt16(_) => "u16",
            Self::Int32(_) => "i32",
            Self::UInt32(_) => "u32",
            Self::Int64(_) => "i64",
            Self::UInt64(_) => "u64",
            Self::Float(_) => "f32",
            Self::Double(_) => "f64",
            Self::Bytes(_) => "bytes",
            Self::Str(_) => "string",
        }
    }
}

/// A value produced by [`unpack`](crate::unpack).
///
/// Strings are returned without their terminator or length prefix.
#[derive(PartialEq, Clone, Debug)]
pub enum Unpacked {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    Str(Vec<u8>),
}

impl Unpacked {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Int8(_) => "i8",
            Self::UInt8(_) => "u8",
            Self::Int16(_) => "i16",
            Self::UInt16(_) => "u16",
            Self::Int32(_) => "i32",
            Self::UInt32(_) => "u32",
            Self::Int64(_) => "i64",
            Self::UInt64(_) => "u64",
            Self::Float(_) => "f32",
            Self::Double(_) => "f64",
            Self::Bytes(_) => "bytes",
            Self::Str(_) => "string",
        }
    }

    pub fn as_pack_value(&self) -> PackValue<'_> {
        match self {
            Self::Int8(v) => PackValue::Int8(*v),
            Self::UInt8(v) => PackValue::UInt8(*v),
            Self::Int16(v) => PackValue::Int16(*v),
            Self::UInt16(v) => PackValue::UInt16(*v),
            Self::Int32(v) => PackValue::Int32(*v),
            Self::UInt32(v) => PackValue::UInt32(*v),
            Self::Int64(v) => PackValue::Int64(*v),
            Self::UInt64(v) => PackValue::UInt64(*v),
            Self::Float(v) => PackValue::Float(*v),
            Self::Double(v) => PackValue::Double(*v),
            Self::Bytes(v) => PackValue::Bytes(v),
            Self::Str(v) => PackValue::Str(v),
        }
    }
}

macro_rules! impl_try_from_unpacked {
    ($($variant:ident => $t:ty),* $(,)?) => {
        $(
            impl TryFrom<Unpacked> for $t {
                type Error = PackError;
                fn try_from(value: Unpacked) -> Result<Self, PackError> {
                    match value {
                        Unpacked::$variant(v) => Ok(v),
                        other => Err(PackError::arguments(format!(
                            "Unpacked {} where {} was requested",
                            other.kind_name(),
                            stringify!($t)
                        ))),
                    }
                }
            }
        )*
    };
}
impl_try_from_unpacked!(
    Int8 => i8,
    UInt8 => u8,
    Int16 => i16,
    UInt16 => u16,
    Int32 => i32,
    UInt32 => u32,
    Int64 => i64,
    UInt64 => u64,
    Float => f32,
    Double => f64,
);

impl Unpacked {
    /// Takes the payload of a block or a string.
    pub fn into_bytes(self) -> Result<Vec<u8>, PackError> {
        match self {
            Self::Bytes(v) | Self::Str(v) => Ok(v),
            other => Err(PackError::arguments(format!(
                "Unpacked {} where bytes were requested",
                other.kind_name()
            ))),
        }
    }
}

/// Whether `value` is acceptable for one repetition of `code`.
pub(crate) fn value_fits(code: TypeCode, value: &PackValue) -> bool {
    matches!(
        (code, value),
        (TypeCode::Int8, PackValue::Int8(_))
            | (TypeCode::UInt8, PackValue::UInt8(_))
            | (TypeCode::Int16, PackValue::Int16(_))
            | (TypeCode::UInt16, PackValue::UInt16(_))
            | (TypeCode::Int32, PackValue::Int32(_))
            | (TypeCode::UInt32, PackValue::UInt32(_))
            | (TypeCode::Int64, PackValue::Int64(_))
            | (TypeCode::UInt64, PackValue::UInt64(_))
            | (TypeCode::Float, PackValue::Float(_))
            | (TypeCode::Double, PackValue::Double(_))
            | (TypeCode::PascalReal, PackValue::Double(_))
            | (TypeCode::Block, PackValue::Bytes(_))
            | (TypeCode::CString, PackValue::Str(_))
            | (TypeCode::PascalString, PackValue::Str(_))
    )
}
