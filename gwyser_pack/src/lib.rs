//! # Byte packer
//!
//! Packs and unpacks fixed-layout binary records described by a format string.
//!
//! A format string starts with a byte order marker, `<` for little endian or
//! `>` for big endian. There is no native marker; every caller states the
//! order of the bytes it reads or writes.
//!
//! The marker is followed by items. Each item is an optional decimal count
//! and a type character. Whitespace may separate items, but not a count from
//! its type character.
//!
//! ```text
//! x   padding byte, written as zero, skipped when reading, no value
//! c   i8                          C   u8
//! h   i16                         H   u16
//! i   i32                         I   u32
//! q   i64                         Q   u64
//! f   f32                         d   f64
//! r   6-byte Pascal real, read and written as f64
//! S   byte block of `count` bytes, one value for the whole block
//! s   nul-terminated string, one value per repetition
//! p   Pascal string with a 1-byte length prefix, one value per repetition
//! ```
//!
//! For example `"<d 2h 13x 5S"` is a little endian double, two 16-bit
//! integers, 13 padding bytes and a 5-byte block, 35 bytes in total.

mod data;
mod error;
mod format;
mod pack;
mod pascal_real;
mod unpack;
mod value;

pub use data::*;
pub use error::*;
pub use format::*;
pub use pack::*;
pub use unpack::*;
pub use value::*;
