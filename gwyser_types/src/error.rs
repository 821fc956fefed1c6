use derive_more::{Deref, DerefMut, Display, From, IntoIterator};
use std::fmt;
use thiserror::Error;

#[derive(Display, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum DeserializeErrorKind {
    /// Data end before the object, item or array they announce.
    #[display(fmt = "truncated")]
    Truncated,
    /// A length or size does not fit into memory.
    #[display(fmt = "size")]
    SizeT,
    /// A type name cannot be resolved to a constructible type.
    #[display(fmt = "object")]
    Object,
    /// Unknown item tag or malformed payload.
    #[display(fmt = "data")]
    Data,
    /// An item header cannot be read.
    #[display(fmt = "item")]
    Item,
    /// Items are readable but violate what the type expects.
    #[display(fmt = "invalid")]
    Invalid,
    /// Objects nest deeper than allowed.
    #[display(fmt = "too deep")]
    TooDeep,
}

#[derive(Error, PartialEq, Eq, Clone, Debug)]
#[error("{kind} error: {message}")]
pub struct DeserializeError {
    pub kind: DeserializeErrorKind,
    pub message: String,
}

macro_rules! kind_constructors {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        impl DeserializeError {
            pub fn new(kind: DeserializeErrorKind, message: impl Into<String>) -> Self {
                Self {
                    kind,
                    message: message.into(),
                }
            }
            $(
                pub fn $fn_name(message: impl Into<String>) -> Self {
                    Self::new(DeserializeErrorKind::$kind, message)
                }
            )*
        }
    };
}
kind_constructors!(
    truncated => Truncated,
    size_t => SizeT,
    object => Object,
    data => Data,
    item => Item,
    invalid => Invalid,
    too_deep => TooDeep,
);

/// Errors accumulated over one deserialization, in the order they occurred.
#[derive(From, Deref, DerefMut, IntoIterator, Default, PartialEq, Clone, Debug)]
pub struct ErrorList(Vec<DeserializeError>);
impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<DeserializeErrorKind> {
        self.0.iter().map(|e| e.kind).collect()
    }

    pub fn has_kind(&self, kind: DeserializeErrorKind) -> bool {
        self.0.iter().any(|e| e.kind == kind)
    }
}
impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

#[derive(Error, PartialEq, Eq, Clone, Debug)]
#[error("cannot assign {from_type} to {to_type}")]
pub struct AssignError {
    pub to_type: &'static str,
    pub from_type: &'static str,
}
