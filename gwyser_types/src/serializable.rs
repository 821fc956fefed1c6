use crate::{AssignError, ErrorList, WireItem, WireItems};
use std::any::Any;

/// Upcasting to [`Any`], so that boxed serializables can be downcast to
/// their concrete types.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}
impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// The capability of writing oneself as items and reading oneself back.
///
/// Deserialization is two-phase: the registry creates a bare default
/// instance, then [`Serializable::construct`] fills it from the parsed items.
/// Whatever `construct` leaves in the items is dropped by the caller.
///
/// Itemization is read-only. Types that keep bookkeeping between
/// [`Serializable::itemize`] and [`Serializable::done`] use interior
/// mutability.
pub trait Serializable: AsAny {
    /// The registered wire name.
    fn type_name(&self) -> &'static str;

    /// Number of list entries this object's items need, including the
    /// entries of every nested object (use [`n_items`] for children).
    /// The object's own header is not included.
    fn n_items(&self) -> usize;

    /// Appends this object's items. Nested objects go through
    /// [`WireItems::push_object`] and [`WireItems::push_object_array`].
    ///
    /// Items equal to their documented default may be omitted.
    fn itemize<'a>(&'a self, items: &mut WireItems<'a>);

    /// Fills a bare instance from parsed items.
    ///
    /// Returns `false` after recording at least one error when the items
    /// cannot describe a valid instance.
    fn construct(&mut self, items: Vec<WireItem<'static>>, errors: &mut ErrorList) -> bool;

    /// Called once after itemization has been written out, and once after
    /// `construct`, whether either succeeded or not.
    fn done(&self) {}

    fn duplicate(&self) -> Box<dyn Serializable>;

    /// Copies the state of `source`, which must be of the same type.
    fn assign(&mut self, source: &dyn Serializable) -> Result<(), AssignError>;
}

impl dyn Serializable {
    pub fn is<T: Serializable>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Serializable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast<T: Serializable>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

/// Number of list entries needed to itemize `object`, its header included.
pub fn n_items(object: &dyn Serializable) -> usize {
    object.n_items() + 1
}

/// Appends the header of `object` and its items to `items`.
pub fn itemize<'a>(object: &'a dyn Serializable, items: &mut WireItems<'a>) {
    let header = items.open_header(object.type_name(), Some(object));
    object.itemize(items);
    items.close_header(header);
}

/// Implements [`Serializable::assign`] for types that are `Clone`.
pub fn assign_cloned<T: Serializable + Clone>(
    target: &mut T,
    source: &dyn Serializable,
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
