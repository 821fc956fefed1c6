use crate::{
    DeserializeError, ErrorList, ItemType, Serializable, SerializableBoxed, WireItem, WireValue,
};
use tracing::warn;

/// One expected item of a type.
///
/// A schema may list the same name more than once with different types, so
/// that older encodings of a field stay readable.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct ItemSpec {
    pub name: &'static str,
    pub item_type: ItemType,
    /// For boxed items, the required boxed type name. `None` accepts any.
    pub boxed_type: Option<&'static str>,
}
impl ItemSpec {
    pub const fn new(name: &'static str, item_type: ItemType) -> Self {
        Self {
            name,
            item_type,
            boxed_type: None,
        }
    }

    /// A boxed item that must hold a value of `type_name`.
    pub const fn boxed(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            item_type: ItemType::Boxed,
            boxed_type: Some(type_name),
        }
    }
}

/// Parsed items arranged in schema order, one optional slot per entry.
#[derive(Debug)]
pub struct FilteredItems {
    schema: &'static [ItemSpec],
    slots: Vec<Option<WireValue<'static>>>,
    n_errors: usize,
}

/// Matches `items` against `schema` by name and type.
///
/// An item whose name and type match an entry moves into its slot. A name
/// the schema only knows with other types, an entry seen twice, or a boxed
/// value of the wrong boxed type records an error. Names missing from the
/// schema are ignored.
pub fn filter_items(
    schema: &'static [ItemSpec],
    items: Vec<WireItem<'static>>,
    type_name: &str,
    errors: &mut ErrorList,
) -> FilteredItems {
    let mut slots = Vec::with_capacity(schema.len());
    slots.resize_with(schema.len(), || None);
    let mut n_errors = 0;

    for item in items.into_iter() {
        let actual = item.value.item_type();
        let Some(i) = schema
            .iter()
            .position(|spec| spec.name == item.name && spec.item_type == actual)
        else {
            if let Some(spec) = schema.iter().find(|spec| spec.name == item.name) {
                errors.push(DeserializeError::invalid(format!(
                    "Item {} of {type_name} has type {:?}, expected {:?}",
                    item.name, actual, spec.item_type
                )));
                n_errors += 1;
            } else {
                warn!(type_name, item = %item.name, "ignoring unexpected item");
            }
            continue;
        };

        if let (Some(expected), WireValue::Boxed(slot)) = (schema[i].boxed_type, &item.value) {
            let boxed_type = slot.as_dyn().type_name();
            if boxed_type != expected {
                errors.push(DeserializeError::invalid(format!(
                    "Item {} of {type_name} holds a {boxed_type}, expected {expected}",
                    item.name
                )));
                n_errors += 1;
                continue;
            }
        }
        if slots[i].is_some() {
            errors.push(DeserializeError::invalid(format!(
                "Item {} of {type_name} appears more than once",
                item.name
            )));
            n_errors += 1;
            continue;
        }
        slots[i] = Some(item.value);
    }

    FilteredItems {
        schema,
        slots,
        n_errors,
    }
}

/* Value variants and item types share their names. */
macro_rules! take_scalar {
    ($($fn_name:ident: $variant:ident => $t:ty),* $(,)?) => {
        $(
            pub fn $fn_name(&mut self, name: &str) -> Option<$t> {
                match self.take_typed(name, ItemType::$variant)? {
                    WireValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        )*
    };
}

macro_rules! take_owned {
    ($($fn_name:ident: $variant:ident => $t:ty),* $(,)?) => {
        $(
            pub fn $fn_name(&mut self, name: &str) -> Option<$t> {
                match self.take_typed(name, ItemType::$variant)? {
                    WireValue::$variant(v) => Some(v.into_owned()),
                    _ => None,
                }
            }
        )*
    };
}

impl FilteredItems {
    /// Whether filtering recorded no errors.
    pub fn is_ok(&self) -> bool {
        self.n_errors == 0
    }

    pub fn n_errors(&self) -> usize {
        self.n_errors
    }

    /// Whether any entry named `name` received a value.
    pub fn is_present(&self, name: &str) -> bool {
        self.schema
            .iter()
            .zip(self.slots.iter())
            .any(|(spec, slot)| spec.name == name && slot.is_some())
    }

    /// Moves out the value of the first filled entry named `name`.
    pub fn take(&mut self, name: &str) -> Option<WireValue<'static>> {
        let schema = self.schema;
        schema
            .iter()
            .zip(self.slots.iter_mut())
            .filter(|(spec, _)| spec.name == name)
            .find_map(|(_, slot)| slot.take())
    }

    /// Moves the value out of the entry with both `name` and `item_type`.
    pub fn take_typed(&mut self, name: &str, item_type: ItemType) -> Option<WireValue<'static>> {
        let i = self
            .schema
            .iter()
            .position(|spec| spec.name == name && spec.item_type == item_type)?;
        self.slots[i].take()
    }

    take_scalar!(
        take_boolean: Boolean => bool,
        take_int8: Int8 => i8,
        take_int16: Int16 => i16,
        take_int32: Int32 => i32,
        take_int64: Int64 => i64,
        take_double: Double => f64,
    );

    take_owned!(
        take_string: String => String,
        take_boolean_array: BooleanArray => Vec<bool>,
        take_int8_array: Int8Array => Vec<i8>,
        take_int16_array: Int16Array => Vec<i16>,
        take_int32_array: Int32Array => Vec<i32>,
        take_int64_array: Int64Array => Vec<i64>,
        take_double_array: DoubleArray => Vec<f64>,
        take_string_array: StringArray => Vec<String>,
    );

    pub fn take_object(&mut self, name: &str) -> Option<Box<dyn Serializable>> {
        match self.take_typed(name, ItemType::Object)? {
            WireValue::Object(slot) => Some(slot.into_boxed()),
            _ => None,
        }
    }

    pub fn take_object_array(&mut self, name: &str) -> Option<Vec<Box<dyn Serializable>>> {
        match self.take_typed(name, ItemType::ObjectArray)? {
            WireValue::ObjectArray(slots) => {
                Some(slots.into_iter().map(|slot| slot.into_boxed()).collect())
            }
            _ => None,
        }
    }

    pub fn take_boxed(&mut self, name: &str) -> Option<Box<dyn SerializableBoxed>> {
        match self.take_typed(name, ItemType::Boxed)? {
            WireValue::Boxed(slot) => Some(slot.into_boxed()),
            _ => None,
        }
    }

    /// Takes a boxed value known to be a `T`, which [`ItemSpec::boxed`]
    /// ensures when the schema names `T`'s type.
    pub fn take_boxed_as<T: SerializableBoxed>(&mut self, name: &str) -> Option<T> {
        self.take_boxed(name)?.downcast::<T>().map(|value| *value)
    }
}
