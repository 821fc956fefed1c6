use crate::{Rgba, SelectionKind};
use gwyser_types::{Serializable, SerializableBoxed};
use std::collections::HashMap;

/// Creates a bare instance, to be filled by [`Serializable::construct`].
pub type Factory = fn() -> Box<dyn Serializable>;

/// Creates a default boxed value, to be filled by
/// [`SerializableBoxed::construct`].
pub type BoxedFactory = fn() -> Box<dyn SerializableBoxed>;

fn new_boxed<T: Serializable + Default>() -> Box<dyn Serializable> {
    Box::<T>::default()
}

fn new_boxed_value<T: SerializableBoxed + Default>() -> Box<dyn SerializableBoxed> {
    Box::<T>::default()
}

/// Maps wire type names to factories.
///
/// Objects and boxed values are kept apart: a name registered as one kind
/// does not resolve as the other.
#[derive(Default, Clone)]
pub struct Registry {
    factories: HashMap<&'static str, Factory>,
    boxed: HashMap<&'static str, BoxedFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry knowing the built-in selection types and [`Rgba`].
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        for kind in SelectionKind::ALL {
            reg.register(kind.type_name(), kind.factory());
        }
        reg.register_boxed_type::<Rgba>();
        reg
    }

    /// Registers `factory` under `type_name`, replacing any previous one.
    pub fn register(&mut self, type_name: &'static str, factory: Factory) -> &mut Self {
        self.factories.insert(type_name, factory);
        self
    }

    /// Registers `T` under the name its default instance reports.
    pub fn register_type<T: Serializable + Default>(&mut self) -> &mut Self {
        let type_name = T::default().type_name();
        self.register(type_name, new_boxed::<T>)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn create(&self, type_name: &str) -> Option<Box<dyn Serializable>> {
        self.factories.get(type_name).map(|factory| factory())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Registers a boxed value type, replacing any previous one.
    pub fn register_boxed(&mut self, type_name: &'static str, factory: BoxedFactory) -> &mut Self {
        self.boxed.insert(type_name, factory);
        self
    }

    pub fn register_boxed_type<T: SerializableBoxed + Default>(&mut self) -> &mut Self {
        let type_name = T::default().type_name();
        self.register_boxed(type_name, new_boxed_value::<T>)
    }

    pub fn contains_boxed(&self, type_name: &str) -> bool {
        self.boxed.contains_key(type_name)
    }

    pub fn create_boxed(&self, type_name: &str) -> Option<Box<dyn SerializableBoxed>> {
        self.boxed.get(type_name).map(|factory| factory())
    }

    pub fn boxed_type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.boxed.keys().copied()
    }
}
