use crate::{AsAny, AssignError, ErrorList, WireItem, WireItems};
use std::fmt;

/// A plain value type that serializes inline into an `x` item.
///
/// Boxed values have no identity of their own. They are written with the
/// same header as objects, but they are resolved through the boxed half of
/// the registry, are not told when they are `done` and are compared and
/// copied by value.
pub trait SerializableBoxed: AsAny + fmt::Debug {
    /// The registered wire name.
    fn type_name(&self) -> &'static str;

    /// Number of list entries the value's items need, its header excluded.
    fn n_items(&self) -> usize;

    fn itemize<'a>(&'a self, items: &mut WireItems<'a>);

    /// Fills a default value from parsed items.
    fn construct(&mut self, items: Vec<WireItem<'static>>, errors: &mut ErrorList) -> bool;

    fn duplicate(&self) -> Box<dyn SerializableBoxed>;

    fn assign(&mut self, source: &dyn SerializableBoxed) -> Result<(), AssignError>;

    /// Values of different types are never equal.
    fn equal(&self, other: &dyn SerializableBoxed) -> bool;
}

impl dyn SerializableBoxed {
    pub fn is<T: SerializableBoxed>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: SerializableBoxed>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast<T: SerializableBoxed>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

/// Number of list entries needed to itemize `value`, its header included.
pub fn boxed_n_items(value: &dyn SerializableBoxed) -> usize {
    value.n_items() + 1
}

/// Implements [`SerializableBoxed::assign`] for types that are `Clone`.
pub fn assign_boxed_cloned<T: SerializableBoxed + Clone>(
    target: &mut T,
    source: &dyn SerializableBoxed,
) -> Result<(), AssignError> {
    match source.downcast_ref::<T>() {
        Some(source) => {
            target.clone_from(source);
            Ok(())
        }
        None => Err(AssignError {
            to_type: target.type_name(),
            from_type: source.type_name(),
        }),
    }
}

/// Implements [`SerializableBoxed::equal`] for types that are `PartialEq`.
pub fn boxed_equal<T: SerializableBoxed + PartialEq>(a: &T, b: &dyn SerializableBoxed) -> bool {
    b.downcast_ref::<T>().map_or(false, |b| a == b)
}

/// A boxed value inside an item, borrowed on the way out, owned on the way in.
pub enum BoxedSlot<'a> {
    Borrowed(&'a dyn SerializableBoxed),
    Owned(Box<dyn SerializableBoxed>),
}
impl<'a> BoxedSlot<'a> {
    pub fn as_dyn(&self) -> &dyn SerializableBoxed {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => &**value,
        }
    }

    pub fn into_boxed(self) -> Box<dyn SerializableBoxed> {
        match self {
            Self::Borrowed(value) => value.duplicate(),
            Self::Owned(value) => value,
        }
    }
}
impl<'a> fmt::Debug for BoxedSlot<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_dyn(), f)
    }
}
