mod reader;

use crate::{DeserializeOptions, Registry};
use gwyser_types::{
    BoxedSlot, DeserializeError, ErrorList, ItemType, ItemTypeInt, ObjectSlot, Serializable,
    SerializableBoxed, WireItem, WireValue,
};
use reader::Reader;
use std::borrow::Cow;
use std::fmt;
use std::str;
use tracing::{debug, warn};

/// Minimum encoded object size: a one-character type name, its nul, and the
/// size field.
const MIN_OBJECT_SIZE: usize = 10;

/// The outcome of one deserialization.
///
/// Either `object` is present and `errors` is empty, or `object` is `None`
/// and `errors` says why.
pub struct Deserialized {
    pub object: Option<Box<dyn Serializable>>,
    /// On success, the length of the root object's encoding. On failure,
    /// how far parsing got.
    pub bytes_consumed: usize,
    pub errors: ErrorList,
}

impl fmt::Debug for Deserialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deserialized")
            .field("object", &self.object.as_ref().map(|obj| obj.type_name()))
            .field("bytes_consumed", &self.bytes_consumed)
            .field("errors", &self.errors)
            .finish()
    }
}

pub struct Deserializer<'r> {
    registry: &'r Registry,
    options: DeserializeOptions,
}

impl<'r> Deserializer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_options(registry, DeserializeOptions::default())
    }

    pub fn with_options(registry: &'r Registry, options: DeserializeOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &DeserializeOptions {
        &self.options
    }

    /// Reads one object from the start of `buffer`.
    ///
    /// Bytes following the object are left alone. Any error anywhere in the
    /// object tree fails the whole call.
    pub fn deserialize(&self, buffer: &[u8]) -> Deserialized {
        let mut errors = ErrorList::new();
        let mut r = Reader::new(buffer);
        let object = self.read_object(&mut r, 1, &mut errors);
        let bytes_consumed = r.pos();

        let object = match object {
            Some(object) if errors.is_empty() => Some(object),
            _ => {
                if errors.is_empty() {
                    errors.push(DeserializeError::invalid("Object construction failed"));
                }
                None
            }
        };
        debug!(
            size = buffer.len(),
            bytes_consumed,
            n_errors = errors.len(),
            "deserialized"
        );

        Deserialized {
            object,
            bytes_consumed,
            errors,
        }
    }

    /// Like [`Self::deserialize`], additionally requiring the root to be a `T`.
    pub fn deserialize_as<T: Serializable>(&self, buffer: &[u8]) -> Result<Box<T>, ErrorList> {
        let Deserialized {
            object, mut errors, ..
        } = self.deserialize(buffer);
        let Some(object) = object else {
            return Err(errors);
        };
        let type_name = object.type_name();
        match object.downcast::<T>() {
            Some(object) => Ok(object),
            None => {
                errors.push(DeserializeError::object(format!(
                    "Object type {type_name} is not the requested {}",
                    std::any::type_name::<T>()
                )));
                Err(errors)
            }
        }
    }

    /// Reads a type name and block size, resolves the name with `create`
    /// and parses the items of the block.
    fn read_block<T>(
        &self,
        r: &mut Reader,
        depth: usize,
        errors: &mut ErrorList,
        what: &str,
        create: impl FnOnce(&str) -> Option<T>,
    ) -> Option<(T, Vec<WireItem<'static>>)> {
        if depth > self.options.max_depth {
            errors.push(DeserializeError::too_deep(format!(
                "Objects are nested deeper than {} levels",
                self.options.max_depth
            )));
            return None;
        }

        /* header */
        let header = r.cstring().and_then(|name| {
            let size = r.array_len(1, what)?;
            Ok((name, size))
        });
        let (raw_name, size) = match header {
            Ok(header) => header,
            Err(e) => {
                errors.push(e);
                return None;
            }
        };

        let Some(value) = str::from_utf8(raw_name).ok().and_then(create) else {
            errors.push(DeserializeError::object(format!(
                "The {what} type {} is not known. It was ignored.",
                String::from_utf8_lossy(raw_name)
            )));
            /* Skip the block so that consumption reflects the whole object. */
            if let Err(e) = r.sub_reader(size, what) {
                errors.push(e);
            }
            return None;
        };

        let mut block = match r.sub_reader(size, what) {
            Ok(block) => block,
            Err(e) => {
                errors.push(e);
                return None;
            }
        };
        let items = self.read_items(&mut block, depth, errors)?;
        Some((value, items))
    }

    fn read_object(
        &self,
        r: &mut Reader,
        depth: usize,
        errors: &mut ErrorList,
    ) -> Option<Box<dyn Serializable>> {
        let (mut object, items) =
            self.read_block(r, depth, errors, "object", |name| self.registry.create(name))?;

        let ok = object.construct(items, errors);
        object.done();
        if !ok {
            if errors.is_empty() {
                errors.push(DeserializeError::invalid(format!(
                    "Object {} could not be constructed",
                    object.type_name()
                )));
            }
            return None;
        }
        Some(object)
    }

    fn read_boxed(
        &self,
        r: &mut Reader,
        depth: usize,
        errors: &mut ErrorList,
    ) -> Option<Box<dyn SerializableBoxed>> {
        let (mut value, items) = self.read_block(r, depth, errors, "boxed", |name| {
            self.registry.create_boxed(name)
        })?;

        if !value.construct(items, errors) {
            if errors.is_empty() {
                errors.push(DeserializeError::invalid(format!(
                    "Boxed value {} could not be constructed",
                    value.type_name()
                )));
            }
            return None;
        }
        Some(value)
    }

    fn read_items(
        &self,
        r: &mut Reader,
        depth: usize,
        errors: &mut ErrorList,
    ) -> Option<Vec<WireItem<'static>>> {
        let mut items = vec![];
        while r.remaining() > 0 {
            match self.read_item(r, depth, errors) {
                Ok(Some(item)) => items.push(item),
                /* A nested object failed and recorded its errors. */
                Ok(None) => return None,
                Err(e) => {
                    errors.push(e);
                    return None;
                }
            }
        }
        Some(items)
    }

    fn read_item(
        &self,
        r: &mut Reader,
        depth: usize,
        errors: &mut ErrorList,
    ) -> Result<Option<WireItem<'static>>, DeserializeError> {
        let name = r.cstring()?;
        let name = str::from_utf8(name)
            .map_err(|_| {
                DeserializeError::item(format!(
                    "Item name {} is not valid text",
                    String::from_utf8_lossy(name)
                ))
            })?
            .to_owned();
        let item_type = ItemType::try_from(ItemTypeInt::from(r.u8("item-type")?))?;

        let value = match item_type {
            ItemType::Boolean => WireValue::Boolean(r.boolean()?),
            ItemType::Int8 => WireValue::Int8(r.i8()?),
            ItemType::Int16 => WireValue::Int16(r.i16()?),
            ItemType::Int32 => WireValue::Int32(r.i32()?),
            ItemType::Int64 => WireValue::Int64(r.i64()?),
            ItemType::Double => WireValue::Double(r.f64()?),
            ItemType::String => WireValue::String(Cow::Owned(read_string(r, &name)?)),
            ItemType::Object => match self.read_object(r, depth + 1, errors) {
                Some(child) => WireValue::Object(ObjectSlot::Owned(child)),
                None => return Ok(None),
            },
            ItemType::BooleanArray => {
                let len = r.array_len(1, "boolean-array")?;
                let bytes: Vec<u8> = r.array('C', len, "boolean-array")?;
                WireValue::BooleanArray(Cow::Owned(bytes.into_iter().map(|b| b != 0).collect()))
            }
            ItemType::Int8Array => {
                let len = r.array_len(1, "int8-array")?;
                WireValue::Int8Array(Cow::Owned(r.array('c', len, "int8-array")?))
            }
            ItemType::Int16Array => {
                let len = r.array_len(2, "int16-array")?;
                WireValue::Int16Array(Cow::Owned(r.array('h', len, "int16-array")?))
            }
            ItemType::Int32Array => {
                let len = r.array_len(4, "int32-array")?;
                WireValue::Int32Array(Cow::Owned(r.array('i', len, "int32-array")?))
            }
            ItemType::Int64Array => {
                let len = r.array_len(8, "int64-array")?;
                WireValue::Int64Array(Cow::Owned(r.array('q', len, "int64-array")?))
            }
            ItemType::DoubleArray => {
                let len = r.array_len(8, "double-array")?;
                WireValue::DoubleArray(Cow::Owned(r.array('d', len, "double-array")?))
            }
            ItemType::StringArray => {
                let len = r.array_len(1, "string-array")?;
                let mut strings = Vec::with_capacity(len);
                for _ in 0..len {
                    strings.push(read_string(r, &name)?);
                }
                WireValue::StringArray(Cow::Owned(strings))
            }
            ItemType::ObjectArray => {
                let len = r.array_len(MIN_OBJECT_SIZE, "object-array")?;
                let mut children = Vec::with_capacity(len);
                for _ in 0..len {
                    match self.read_object(r, depth + 1, errors) {
                        Some(child) => children.push(ObjectSlot::Owned(child)),
                        None => return Ok(None),
                    }
                }
                WireValue::ObjectArray(children)
            }
            ItemType::Boxed => match self.read_boxed(r, depth + 1, errors) {
                Some(value) => WireValue::Boxed(BoxedSlot::Owned(value)),
                None => return Ok(None),
            },
        };

        Ok(Some(WireItem::new(name, value)))
    }
}

/// String payloads that are not valid UTF-8 are kept with replacement characters.
fn read_string(r: &mut Reader, item: &str) -> Result<String, DeserializeError> {
    let bytes = r.cstring()?;
    let s = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = s {
        warn!(item, "string is not valid UTF-8, invalid sequences replaced");
    }
    Ok(s.into_owned())
}

/// Deserializes with default options.
pub fn deserialize(registry: &Registry, buffer: &[u8]) -> Deserialized {
    Deserializer::new(registry).deserialize(buffer)
}
