use crate::pascal_real;
use crate::value::value_fits;
use crate::{ByteOrder, Format, FormatItem, PackError, PackResult, PackValue, TypeCode};
use std::slice;

macro_rules! ordered_bytes {
    ($v:expr, $order:expr) => {
        match $order {
            ByteOrder::Little => $v.to_le_bytes(),
            ByteOrder::Big => $v.to_be_bytes(),
        }
    };
}

fn next_value<'v, 'a>(
    values: &mut slice::Iter<'v, PackValue<'a>>,
    item: &FormatItem,
) -> PackResult<&'v PackValue<'a>> {
    let value = values.next().ok_or_else(|| {
        PackError::arguments(format!("Too few values for item '{}'", item.code.as_char()))
    })?;
    if !value_fits(item.code, value) {
        return Err(PackError::arguments(format!(
            "Value of type {} cannot be packed as '{}'",
            value.kind_name(),
            item.code.as_char()
        )));
    }
    Ok(value)
}

fn ensure_fits(pos: usize, len: usize, size: usize) -> PackResult<()> {
    match pos.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(PackError::size("Packed data do not fit into buffer")),
    }
}

fn str_value<'a>(value: &PackValue<'a>) -> &'a [u8] {
    match value {
        PackValue::Str(s) => *s,
        _ => &[],
    }
}

/// Packs `values` into `buffer` as described by `format`.
///
/// Returns the number of bytes written. On failure the buffer may contain
/// some of the packed bytes and must be discarded; no item is ever written
/// past the buffer end.
pub fn pack(format: &str, buffer: &mut [u8], values: &[PackValue]) -> PackResult<usize> {
    let Format { order, items } = Format::parse(format)?;
    let size = buffer.len();
    let mut values = values.iter();
    let mut pos = 0usize;

    for item in items.iter() {
        let count = item.count;
        /* Strings check their room one by one, after their own argument checks. */
        if !item.code.is_variable_len() {
            ensure_fits(pos, count * item.code.size(), size)?;
        }

        match item.code {
            TypeCode::Pad => {
                buffer[pos..pos + count].fill(0);
                pos += count;
            }
            TypeCode::Block => {
                let value = next_value(&mut values, item)?;
                let block = match value {
                    PackValue::Bytes(b) => *b,
                    _ => &[],
                };
                if block.len() != count {
                    return Err(PackError::arguments(format!(
                        "Block of {} bytes given for a {count}-byte item",
                        block.len()
                    )));
                }
                buffer[pos..pos + count].copy_from_slice(block);
                pos += count;
            }
            TypeCode::CString => {
                for _ in 0..count {
                    let s = str_value(next_value(&mut values, item)?);
                    if s.contains(&0) {
                        return Err(PackError::arguments("C string contains a nul byte"));
                    }
                    ensure_fits(pos, s.len() + 1, size)?;
                    buffer[pos..pos + s.len()].copy_from_slice(s);
                    buffer[pos + s.len()] = 0;
                    pos += s.len() + 1;
                }
            }
            TypeCode::PascalString => {
                for _ in 0..count {
                    let s = str_value(next_value(&mut values, item)?);
                    if s.len() > 0xff {
                        return Err(PackError::arguments(
                            "Pascal string is longer than 255 bytes",
                        ));
                    }
                    ensure_fits(pos, s.len() + 1, size)?;
                    buffer[pos] = s.len() as u8;
                    buffer[pos + 1..pos + 1 + s.len()].copy_from_slice(s);
                    pos += s.len() + 1;
                }
            }
            TypeCode::PascalReal => {
                for _ in 0..count {
                    if let PackValue::Double(v) = next_value(&mut values, item)? {
                        let bytes = pascal_real::encode(*v, order);
                        buffer[pos..pos + bytes.len()].copy_from_slice(&bytes);
                        pos += bytes.len();
                    }
                }
            }
            _ => {
                for _ in 0..count {
                    let value = next_value(&mut values, item)?;
                    pos += write_number(&mut buffer[pos..], value, order);
                }
            }
        }
    }

    if values.next().is_some() {
        return Err(PackError::arguments("Too many values for the format"));
    }

    Ok(pos)
}

/* Room for the value has been checked by the caller. */
fn write_number(buffer: &mut [u8], value: &PackValue, order: ByteOrder) -> usize {
    fn put<const N: usize>(buffer: &mut [u8], bytes: [u8; N]) -> usize {
        buffer[..N].copy_from_slice(&bytes);
        N
    }
    match value {
        PackValue::Int8(v) => put(buffer, v.to_le_bytes()),
        PackValue::UInt8(v) => put(buffer, [*v]),
        PackValue::Int16(v) => put(buffer, ordered_bytes!(v, order)),
        PackValue::UInt16(v) => put(buffer, ordered_bytes!(v, order)),
        PackValue::Int32(v) => put(buffer, ordered_bytes!(v, order)),
        PackValue::UInt32(v) => put(buffer, ordered_bytes!(v, order)),
        PackValue::Int64(v) => put(buffer, ordered_bytes!(v, order)),
        PackValue::UInt64(v) => put(buffer, ordered_bytes!(v, order)),
        PackValue::Float(v) => put(buffer, ordered_bytes!(v, order)),
        PackValue::Double(v) => put(buffer, ordered_bytes!(v, order)),
        PackValue::Bytes(_) | PackValue::Str(_) => 0,
    }
}

/// Computes the exact number of bytes [`pack`] writes for `values`.
pub fn packed_size(format: &str, values: &[PackValue]) -> PackResult<usize> {
    let Format { items, .. } = Format::parse(format)?;
    let mut values = values.iter();
    let mut size = 0usize;

    for item in items.iter() {
        match item.code {
            TypeCode::Pad => size += item.count,
            TypeCode::CString | TypeCode::PascalString => {
                for _ in 0..item.count {
                    let s = str_value(next_value(&mut values, item)?);
                    size += s.len() + 1;
                }
            }
            TypeCode::Block => {
                next_value(&mut values, item)?;
                size += item.count;
            }
            code => {
                for _ in 0..item.count {
                    next_value(&mut values, item)?;
                }
                size += item.count * code.size();
            }
        }
    }

    if values.next().is_some() {
        return Err(PackError::arguments("Too many values for the format"));
    }

    Ok(size)
}

/// Packs into a freshly allocated buffer of exactly the required size.
pub fn pack_to_vec(format: &str, values: &[PackValue]) -> PackResult<Vec<u8>> {
    let mut buffer = vec![0u8; packed_size(format, values)?];
    let len = pack(format, &mut buffer, values)?;
    buffer.truncate(len);
    Ok(buffer)
}
