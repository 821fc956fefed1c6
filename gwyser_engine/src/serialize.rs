use crate::SerializeOptions;
use gwyser_pack::{pack, packed_size, pack_to_vec, PackError, PackValue};
use gwyser_types::{itemize, n_items, Serializable, WireEntry, WireItems, WireValue};
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

/// Elements per packer call when writing arrays.
const ARRAY_CHUNK: usize = 4096;

/// Bytes of an object's size field.
const SIZE_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("cannot write serialized data: {0}")]
    Io(#[from] io::Error),
    #[error("cannot pack item data: {0}")]
    Pack(#[from] PackError),
}

/// Writes `object` and everything it contains to `sink`.
///
/// Returns the number of bytes written. On failure the sink holds an
/// unspecified prefix of the encoding.
///
/// Every itemized object gets its [`Serializable::done`] call before this
/// returns, whether writing succeeded or not. Boxed values get none.
pub fn serialize<W: Write>(object: &dyn Serializable, sink: W) -> Result<usize, SerializeError> {
    serialize_with(object, sink, &SerializeOptions::default())
}

pub fn serialize_with<W: Write>(
    object: &dyn Serializable,
    sink: W,
    options: &SerializeOptions,
) -> Result<usize, SerializeError> {
    let mut items = WireItems::with_capacity(n_items(object));
    itemize(object, &mut items);

    let res = calculate_sizes(&mut items).and_then(|total| {
        debug!(
            type_name = object.type_name(),
            n_items = items.len(),
            size = total,
            "serializing"
        );
        let mut buf = SerBuffer::new(sink, options.buffer_size);
        dump_items(&items, &mut buf)?;
        let written = buf.finish()?;
        debug_assert_eq!(total, written);
        Ok(written)
    });

    items_done(&items);
    res
}

pub fn serialize_to_vec(object: &dyn Serializable) -> Result<Vec<u8>, SerializeError> {
    let mut out = vec![];
    serialize(object, &mut out)?;
    Ok(out)
}

/* Nested objects in reverse order, then the root. */
fn items_done(items: &WireItems) {
    let objects = items.objects().collect::<Vec<_>>();
    for obj in objects.iter().rev() {
        obj.done();
    }
}

/* size calculation */

fn string_size(s: &str) -> usize {
    s.len() + 1
}

/// Fills in the block sizes of all headers. Returns the size of the whole
/// encoding.
fn calculate_sizes(items: &mut WireItems) -> Result<usize, SerializeError> {
    let mut pos = 0;
    let total = object_size(items, &mut pos)?;
    Ok(total)
}

/// Size of the object whose header is at `pos`, including its type name and
/// size field. Leaves `pos` after the object's last entry.
fn object_size(items: &mut WireItems, pos: &mut usize) -> Result<usize, SerializeError> {
    let header_pos = *pos;
    let (type_name, n) = match items.entries().get(header_pos) {
        Some(WireEntry::Header(header)) => (header.type_name, header.n_items),
        _ => return Err(broken_list(header_pos)),
    };
    *pos += 1;

    let mut block = 0usize;
    for _ in 0..n {
        let item_pos = *pos;
        *pos += 1;

        let (name_len, nested) = match items.entries().get(item_pos) {
            Some(WireEntry::Item(item)) => {
                let payload = match &item.value {
                    WireValue::Boolean(_) | WireValue::Int8(_) => 1,
                    WireValue::Int16(_) => 2,
                    WireValue::Int32(_) => 4,
                    WireValue::Int64(_) | WireValue::Double(_) => 8,
                    WireValue::String(s) => string_size(s),
                    WireValue::Object(_) => 0,
                    WireValue::BooleanArray(v) => SIZE_LEN + v.len(),
                    WireValue::Int8Array(v) => SIZE_LEN + v.len(),
                    WireValue::Int16Array(v) => SIZE_LEN + 2 * v.len(),
                    WireValue::Int32Array(v) => SIZE_LEN + 4 * v.len(),
                    WireValue::Int64Array(v) => SIZE_LEN + 8 * v.len(),
                    WireValue::DoubleArray(v) => SIZE_LEN + 8 * v.len(),
                    WireValue::StringArray(v) => {
                        SIZE_LEN + v.iter().map(|s| string_size(s)).sum::<usize>()
                    }
                    WireValue::ObjectArray(_) => SIZE_LEN,
                    WireValue::Boxed(_) => 0,
                };
                let nested = match &item.value {
                    WireValue::Object(_) | WireValue::Boxed(_) => 1,
                    WireValue::ObjectArray(v) => v.len(),
                    _ => 0,
                };
                (string_size(&item.name) + 1 + payload, nested)
            }
            _ => return Err(broken_list(item_pos)),
        };

        block += name_len;
        for _ in 0..nested {
            block += object_size(items, pos)?;
        }
    }

    if let Some(WireEntry::Header(header)) = items.entries_mut().get_mut(header_pos) {
        header.size = block as u64;
    }
    Ok(string_size(type_name) + SIZE_LEN + block)
}

fn broken_list(pos: usize) -> SerializeError {
    SerializeError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Item list entry {pos} does not match the declared item counts"),
    ))
}

/* writing */

/// Collects packed bytes and hands them to the sink in large pieces.
struct SerBuffer<W: Write> {
    sink: W,
    buf: Vec<u8>,
    len: usize,
    written: usize,
}

impl<W: Write> SerBuffer<W> {
    fn new(sink: W, size: usize) -> Self {
        Self {
            sink,
            buf: vec![0u8; size.max(1)],
            len: 0,
            written: 0,
        }
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.sink.write_all(&self.buf[..self.len])?;
        self.written += self.len;
        self.len = 0;
        Ok(())
    }

    fn put(&mut self, format: &str, values: &[PackValue]) -> Result<(), SerializeError> {
        let size = packed_size(format, values)?;
        if self.len + size > self.buf.len() {
            self.flush_buf()?;
        }
        if size > self.buf.len() {
            let bytes = pack_to_vec(format, values)?;
            self.sink.write_all(&bytes)?;
            self.written += bytes.len();
            return Ok(());
        }
        self.len += pack(format, &mut self.buf[self.len..], values)?;
        Ok(())
    }

    fn put_array<T: Copy>(
        &mut self,
        code: char,
        data: &[T],
        to_value: impl Fn(T) -> PackValue<'static>,
    ) -> Result<(), SerializeError> {
        self.put("<Q", &[PackValue::UInt64(data.len() as u64)])?;
        for chunk in data.chunks(ARRAY_CHUNK) {
            let format = format!("<{}{code}", chunk.len());
            let values = chunk.iter().map(|v| to_value(*v)).collect::<Vec<_>>();
            self.put(&format, &values)?;
        }
        Ok(())
    }

    fn finish(mut self) -> io::Result<usize> {
        self.flush_buf()?;
        self.sink.flush()?;
        Ok(self.written)
    }
}

fn dump_items<W: Write>(items: &WireItems, buf: &mut SerBuffer<W>) -> Result<(), SerializeError> {
    for entry in items.entries().iter() {
        let item = match entry {
            WireEntry::Header(header) => {
                buf.put(
                    "<sQ",
                    &[
                        PackValue::from(header.type_name),
                        PackValue::UInt64(header.size),
                    ],
                )?;
                continue;
            }
            WireEntry::Item(item) => item,
        };

        let tag = item.value.item_type().tag();
        buf.put("<sC", &[PackValue::from(item.name.as_ref()), PackValue::UInt8(tag)])?;

        match &item.value {
            WireValue::Boolean(v) => buf.put("<C", &[PackValue::UInt8(*v as u8)])?,
            WireValue::Int8(v) => buf.put("<c", &[PackValue::Int8(*v)])?,
            WireValue::Int16(v) => buf.put("<h", &[PackValue::Int16(*v)])?,
            WireValue::Int32(v) => buf.put("<i", &[PackValue::Int32(*v)])?,
            WireValue::Int64(v) => buf.put("<q", &[PackValue::Int64(*v)])?,
            WireValue::Double(v) => buf.put("<d", &[PackValue::Double(*v)])?,
            WireValue::String(s) => buf.put("<s", &[PackValue::from(s.as_ref())])?,
            /* The object's own entries follow. */
            WireValue::Object(_) | WireValue::Boxed(_) => {}
            WireValue::BooleanArray(v) => buf.put_array('C', v, |b| PackValue::UInt8(b as u8))?,
            WireValue::Int8Array(v) => buf.put_array('c', v, PackValue::Int8)?,
            WireValue::Int16Array(v) => buf.put_array('h', v, PackValue::Int16)?,
            WireValue::Int32Array(v) => buf.put_array('i', v, PackValue::Int32)?,
            WireValue::Int64Array(v) => buf.put_array('q', v, PackValue::Int64)?,
            WireValue::DoubleArray(v) => buf.put_array('d', v, PackValue::Double)?,
            WireValue::StringArray(v) => {
                buf.put("<Q", &[PackValue::UInt64(v.len() as u64)])?;
                for s in v.iter() {
                    buf.put("<s", &[PackValue::from(s.as_str())])?;
                }
            }
            WireValue::ObjectArray(v) => buf.put("<Q", &[PackValue::UInt64(v.len() as u64)])?,
        }
    }
    Ok(())
}
