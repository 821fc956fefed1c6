use crate::DeserializeError;
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::any;

/// The raw tag byte, before it is known to name an [`ItemType`].
#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct ItemTypeInt(u8);
impl From<ItemType> for ItemTypeInt {
    fn from(item_type: ItemType) -> Self {
        Self(item_type.to_u8().unwrap_or_default())
    }
}

/// The tags double as mnemonics: lowercase letters are scalars and the
/// matching uppercase letters are arrays of the same element type. Boxed
/// values (`x`) have no array form.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum ItemType {
    Boolean = b'b',
    Int8 = b'c',
    Int16 = b'h',
    Int32 = b'i',
    Int64 = b'q',
    Double = b'd',
    String = b's',
    Object = b'o',
    BooleanArray = b'B',
    Int8Array = b'C',
    Int16Array = b'H',
    Int32Array = b'I',
    Int64Array = b'Q',
    DoubleArray = b'D',
    StringArray = b'S',
    ObjectArray = b'O',
    Boxed = b'x',
}
impl TryFrom<ItemTypeInt> for ItemType {
    type Error = DeserializeError;
    fn try_from(int: ItemTypeInt) -> Result<Self, DeserializeError> {
        ItemType::from_u8(int.0).ok_or_else(|| {
            DeserializeError::data(format!(
                "Unknown {} 0x{:02x}",
                any::type_name::<ItemType>(),
                int.0
            ))
        })
    }
}

impl ItemType {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn is_array(self) -> bool {
        self.tag().is_ascii_uppercase()
    }

    /// The scalar type of one array element, or the type itself for scalars.
    pub fn element_type(self) -> Self {
        match self {
            Self::BooleanArray => Self::Boolean,
            Self::Int8Array => Self::Int8,
            Self::Int16Array => Self::Int16,
            Self::Int32Array => Self::Int32,
            Self::Int64Array => Self::Int64,
            Self::DoubleArray => Self::Double,
            Self::StringArray => Self::String,
            Self::ObjectArray => Self::Object,
            scalar => scalar,
        }
    }

    /// Wire size of one element. Strings and objects have no fixed size.
    pub fn element_size(self) -> Option<usize> {
        match self.element_type() {
            Self::Boolean | Self::Int8 => Some(1),
            Self::Int16 => Some(2),
            Self::Int32 => Some(4),
            Self::Int64 | Self::Double => Some(8),
            _ => None,
        }
    }
}
