use crate::{BoxedSlot, ItemType, Serializable};
use std::borrow::Cow;
use std::fmt;

/// A nested object inside an item.
///
/// Itemization borrows children from the object being written. Parsing
/// produces owned children that `construct` can adopt.
pub enum ObjectSlot<'a> {
    Borrowed(&'a dyn Serializable),
    Owned(Box<dyn Serializable>),
}
impl<'a> ObjectSlot<'a> {
    pub fn as_dyn(&self) -> &dyn Serializable {
        match self {
            Self::Borrowed(obj) => *obj,
            Self::Owned(obj) => &**obj,
        }
    }

    /// Takes the child, duplicating it if it was only borrowed.
    pub fn into_boxed(self) -> Box<dyn Serializable> {
        match self {
            Self::Borrowed(obj) => obj.duplicate(),
            Self::Owned(obj) => obj,
        }
    }
}
impl<'a> fmt::Debug for ObjectSlot<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrowed(obj) => write!(f, "Borrowed({})", obj.type_name()),
            Self::Owned(obj) => write!(f, "Owned({})", obj.type_name()),
        }
    }
}

/// The payload of one item.
///
/// Arrays and strings are `Cow`s: borrowed from the object on the way out,
/// owned on the way in.
#[derive(Debug)]
pub enum WireValue<'a> {
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(Cow<'a, str>),
    Object(ObjectSlot<'a>),
    BooleanArray(Cow<'a, [bool]>),
    Int8Array(Cow<'a, [i8]>),
    Int16Array(Cow<'a, [i16]>),
    Int32Array(Cow<'a, [i32]>),
    Int64Array(Cow<'a, [i64]>),
    DoubleArray(Cow<'a, [f64]>),
    StringArray(Cow<'a, [String]>),
    ObjectArray(Vec<ObjectSlot<'a>>),
    Boxed(BoxedSlot<'a>),
}

impl<'a> WireValue<'a> {
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Boolean(_) => ItemType::Boolean,
            Self::Int8(_) => ItemType::Int8,
            Self::Int16(_) => ItemType::Int16,
            Self::Int32(_) => ItemType::Int32,
            Self::Int64(_) => ItemType::Int64,
            Self::Double(_) => ItemType::Double,
            Self::String(_) => ItemType::String,
            Self::Object(_) => ItemType::Object,
            Self::BooleanArray(_) => ItemType::BooleanArray,
            Self::Int8Array(_) => ItemType::Int8Array,
            Self::Int16Array(_) => ItemType::Int16Array,
            Self::Int32Array(_) => ItemType::Int32Array,
            Self::Int64Array(_) => ItemType::Int64Array,
            Self::DoubleArray(_) => ItemType::DoubleArray,
            Self::StringArray(_) => ItemType::StringArray,
            Self::ObjectArray(_) => ItemType::ObjectArray,
            Self::Boxed(_) => ItemType::Boxed,
        }
    }

    /// Element count of arrays, zero for scalars.
    pub fn array_size(&self) -> usize {
        match self {
            Self::BooleanArray(v) => v.len(),
            Self::Int8Array(v) => v.len(),
            Self::Int16Array(v) => v.len(),
            Self::Int32Array(v) => v.len(),
            Self::Int64Array(v) => v.len(),
            Self::DoubleArray(v) => v.len(),
            Self::StringArray(v) => v.len(),
            Self::ObjectArray(v) => v.len(),
            _ => 0,
        }
    }
}
