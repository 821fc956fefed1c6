//! # Object encoding
//!
//! A serializable object is written as its registered type name, the byte
//! size of its item block, and the items. All integers are little endian.
//!
//! Every item carries a one-byte [`ItemType`] tag. Scalars have fixed
//! payload lengths that are not encoded. Arrays encode their element count
//! following the tag. Objects nest: the payload of an `o` item is a whole
//! object encoding, and an `O` item holds `count` of them back to back. An
//! `x` item holds a boxed value encoded exactly like an object, under a type
//! name from the boxed registry.
//!
//! ```text
//! struct Object {
//!     type_name:      [u8; _],    // nul-terminated
//!     block_size:     u64,        // bytes of the items that follow
//!     items:          [Item; _],
//! }
//!
//! struct Item::Scalar {
//!     name:           [u8; _],    // nul-terminated
//!     item_type:      u8,         // one of b c h i q d s o x
//!     payload:        [u8; _],    // 1, 2, 4 or 8 bytes, a nul-terminated string, or an Object
//! }
//!
//! struct Item::Array {
//!     name:           [u8; _],
//!     item_type:      u8,         // one of B C H I Q D S O
//!     count:          u64,
//!     payload:        [Element; count],
//! }
//! ```
//!
//! On the way out, objects flatten themselves into [`WireItems`] through the
//! [`Serializable`] capability. On the way in, each object receives its own
//! items as [`WireItem`]s and picks them apart with [`filter_items`].

mod boxed;
mod error;
mod filter;
mod item;
mod item_type;
mod serializable;
mod value;

pub use boxed::*;
pub use error::*;
pub use filter::*;
pub use item::*;
pub use item_type::*;
pub use serializable::*;
pub use value::*;
