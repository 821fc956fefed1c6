use crate::{itemize, BoxedSlot, ObjectSlot, Serializable, SerializableBoxed, WireValue};
use std::borrow::Cow;
use std::fmt;

/// One named, typed value of an object.
#[derive(Debug)]
pub struct WireItem<'a> {
    pub name: Cow<'a, str>,
    pub value: WireValue<'a>,
}
impl<'a> WireItem<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: WireValue<'a>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Opens one object or boxed value in a flattened item list.
pub struct ObjectHeader<'a> {
    /// `None` for boxed values, which are not told when they are done.
    pub object: Option<&'a dyn Serializable>,
    pub type_name: &'static str,
    /// Items belonging to this object directly. A nested object counts as
    /// the single item that holds it.
    pub n_items: usize,
    /// Byte size of the item block. Filled in by size calculation.
    pub size: u64,
}
impl<'a> fmt::Debug for ObjectHeader<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHeader")
            .field("type_name", &self.type_name)
            .field("n_items", &self.n_items)
            .field("size", &self.size)
            .finish()
    }
}

#[derive(Debug)]
pub enum WireEntry<'a> {
    Header(ObjectHeader<'a>),
    Item(WireItem<'a>),
}

/// A flattened object tree, depth first.
///
/// Every object contributes its header followed by its items. An item
/// holding an object is immediately followed by that object's entries.
///
/// The capacity is fixed up front from [`n_items`](crate::n_items). Pushing
/// past it is a bug in some type's `n_items` and panics.
#[derive(Debug)]
pub struct WireItems<'a> {
    entries: Vec<WireEntry<'a>>,
    capacity: usize,
    own_count: usize,
}

impl<'a> WireItems<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            own_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[WireEntry<'a>] {
        &self.entries
    }
    pub fn entries_mut(&mut self) -> &mut [WireEntry<'a>] {
        &mut self.entries
    }

    /// Objects in the order they were itemized, the root first.
    pub fn objects(&self) -> impl DoubleEndedIterator<Item = &'a dyn Serializable> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            WireEntry::Header(header) => header.object,
            WireEntry::Item(_) => None,
        })
    }

    fn push_entry(&mut self, entry: WireEntry<'a>) {
        assert!(
            self.entries.len() < self.capacity,
            "Item list capacity {} exceeded; some n_items() is wrong",
            self.capacity
        );
        self.entries.push(entry);
    }

    pub fn push(&mut self, name: &'a str, value: WireValue<'a>) {
        self.push_entry(WireEntry::Item(WireItem::new(name, value)));
        self.own_count += 1;
    }

    /// Pushes an object item followed by the child's own entries.
    pub fn push_object(&mut self, name: &'a str, child: &'a dyn Serializable) {
        self.push(name, WireValue::Object(ObjectSlot::Borrowed(child)));
        itemize(child, self);
    }

    /// Pushes an object array item followed by every element's entries.
    pub fn push_object_array(&mut self, name: &'a str, children: &[&'a dyn Serializable]) {
        let slots = children.iter().map(|c| ObjectSlot::Borrowed(*c)).collect();
        self.push(name, WireValue::ObjectArray(slots));
        for child in children.iter() {
            itemize(*child, self);
        }
    }

    /// Pushes a boxed item followed by the value's header and items.
    pub fn push_boxed(&mut self, name: &'a str, value: &'a dyn SerializableBoxed) {
        self.push(name, WireValue::Boxed(BoxedSlot::Borrowed(value)));
        let header = self.open_header(value.type_name(), None);
        value.itemize(self);
        self.close_header(header);
    }

    /// Opens an object. Returns the header index and the item count of the
    /// enclosing object, to be handed back to [`Self::close_header`].
    pub(crate) fn open_header(
        &mut self,
        type_name: &'static str,
        object: Option<&'a dyn Serializable>,
    ) -> (usize, usize) {
        let index = self.entries.len();
        self.push_entry(WireEntry::Header(ObjectHeader {
            object,
            type_name,
            n_items: 0,
            size: 0,
        }));
        let outer_count = self.own_count;
        self.own_count = 0;
        (index, outer_count)
    }

    pub(crate) fn close_header(&mut self, (index, outer_count): (usize, usize)) {
        let n_items = self.own_count;
        if let Some(WireEntry::Header(header)) = self.entries.get_mut(index) {
            header.n_items = n_items;
        }
        self.own_count = outer_count;
    }
}
