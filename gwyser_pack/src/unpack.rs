use crate::pascal_real;
use crate::{ByteOrder, Format, PackError, PackResult, TypeCode, Unpacked};

macro_rules! read_ordered {
    ($t:ty, $bytes:expr, $order:expr) => {{
        let mut arr = [0u8; std::mem::size_of::<$t>()];
        arr.copy_from_slice($bytes);
        match $order {
            ByteOrder::Little => <$t>::from_le_bytes(arr),
            ByteOrder::Big => <$t>::from_be_bytes(arr),
        }
    }};
}

/// Decodes one fixed-size numeric item. `bytes` is exactly `code.size()` long.
pub(crate) fn read_number(code: TypeCode, bytes: &[u8], order: ByteOrder) -> Option<Unpacked> {
    let value = match code {
        TypeCode::Int8 => Unpacked::Int8(bytes[0] as i8),
        TypeCode::UInt8 => Unpacked::UInt8(bytes[0]),
        TypeCode::Int16 => Unpacked::Int16(read_ordered!(i16, bytes, order)),
        TypeCode::UInt16 => Unpacked::UInt16(read_ordered!(u16, bytes, order)),
        TypeCode::Int32 => Unpacked::Int32(read_ordered!(i32, bytes, order)),
        TypeCode::UInt32 => Unpacked::UInt32(read_ordered!(u32, bytes, order)),
        TypeCode::Int64 => Unpacked::Int64(read_ordered!(i64, bytes, order)),
        TypeCode::UInt64 => Unpacked::UInt64(read_ordered!(u64, bytes, order)),
        TypeCode::Float => Unpacked::Float(read_ordered!(f32, bytes, order)),
        TypeCode::Double => Unpacked::Double(read_ordered!(f64, bytes, order)),
        TypeCode::PascalReal => Unpacked::Double(pascal_real::decode(bytes, order)),
        TypeCode::Pad | TypeCode::Block | TypeCode::CString | TypeCode::PascalString => {
            return None
        }
    };
    Some(value)
}

/// Unpacks `buffer` as described by `format`.
///
/// Returns the number of bytes consumed and one value per repetition of
/// every item except padding. A block yields a single [`Unpacked::Bytes`].
pub fn unpack(format: &str, buffer: &[u8]) -> PackResult<(usize, Vec<Unpacked>)> {
    let Format { order, items } = Format::parse(format)?;
    let size = buffer.len();
    let mut values = vec![];
    let mut pos = 0usize;

    for item in items.iter() {
        let count = item.count;
        let fixed_len = count * item.code.size();
        if pos + fixed_len > size {
            return Err(PackError::size(format!(
                "Item '{}' at offset {pos} runs past the buffer end",
                item.code.as_char()
            )));
        }

        match item.code {
            TypeCode::Pad => pos += count,
            TypeCode::Block => {
                values.push(Unpacked::Bytes(buffer[pos..pos + count].to_vec()));
                pos += count;
            }
            TypeCode::CString => {
                for _ in 0..count {
                    let rest = &buffer[pos..];
                    let len = rest.iter().position(|&b| b == 0).ok_or_else(|| {
                        PackError::data(format!("Unterminated string at offset {pos}"))
                    })?;
                    values.push(Unpacked::Str(rest[..len].to_vec()));
                    pos += len + 1;
                }
            }
            TypeCode::PascalString => {
                for _ in 0..count {
                    let len = *buffer.get(pos).ok_or_else(|| {
                        PackError::data(format!("Missing string length at offset {pos}"))
                    })? as usize;
                    if pos + 1 + len > size {
                        return Err(PackError::data(format!(
                            "String of {len} bytes at offset {pos} runs past the buffer end"
                        )));
                    }
                    values.push(Unpacked::Str(buffer[pos + 1..pos + 1 + len].to_vec()));
                    pos += len + 1;
                }
            }
            code => {
                let step = code.size();
                for chunk in buffer[pos..pos + fixed_len].chunks_exact(step) {
                    if let Some(value) = read_number(code, chunk, order) {
                        values.push(value);
                    }
                }
                pos += fixed_len;
            }
        }
    }

    Ok((pos, values))
}
