//! # Serialization engines
//!
//! [`serialize`] flattens an object tree into [`WireItems`](gwyser_types::WireItems),
//! computes the block sizes, and writes the encoding through the byte packer.
//! [`Deserializer`] reads an encoding back, resolving type names through a
//! caller-owned [`Registry`]. [`Selection`] and the boxed [`Rgba`] are built
//! in.
//!
//! Neither engine keeps global state. A `Registry` may be shared between
//! threads and deserializers freely.

mod deserialize;
mod options;
mod registry;
mod rgba;
mod selection;
mod serialize;

pub use deserialize::*;
pub use options::*;
pub use registry::*;
pub use rgba::*;
pub use selection::*;
pub use serialize::*;
