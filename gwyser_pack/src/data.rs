use crate::unpack::read_number;
use crate::{Format, PackError, PackResult, TypeCode, Unpacked};

/// Converts a packed array of one numeric type to `f64`.
///
/// `format` is a byte order marker followed by a single numeric type
/// character, such as `"<h"` or `">d"`. Every element becomes
/// `value * factor + shift`. Trailing bytes that do not form a whole
/// element are ignored.
pub fn unpack_data(format: &str, buffer: &[u8], factor: f64, shift: f64) -> PackResult<Vec<f64>> {
    let fmt = Format::parse(format)?;
    let code = match fmt.items.as_slice() {
        [item] if item.count == 1 => item.code,
        _ => {
            return Err(PackError::format(
                "Data format must be a byte order and a single type",
            ))
        }
    };
    if matches!(
        code,
        TypeCode::Pad | TypeCode::Block | TypeCode::CString | TypeCode::PascalString
    ) {
        return Err(PackError::format(format!(
            "Type '{}' cannot be converted to numbers",
            code.as_char()
        )));
    }

    let data = buffer
        .chunks_exact(code.size())
        .filter_map(|chunk| read_number(code, chunk, fmt.order))
        .map(|value| as_f64(value) * factor + shift)
        .collect();
    Ok(data)
}

fn as_f64(value: Unpacked) -> f64 {
    match value {
        Unpacked::Int8(v) => v as f64,
        Unpacked::UInt8(v) => v as f64,
        Unpacked::Int16(v) => v as f64,
        Unpacked::UInt16(v) => v as f64,
        Unpacked::Int32(v) => v as f64,
        Unpacked::UInt32(v) => v as f64,
        Unpacked::Int64(v) => v as f64,
        Unpacked::UInt64(v) => v as f64,
        Unpacked::Float(v) => v as f64,
        Unpacked::Double(v) => v,
        Unpacked::Bytes(_) | Unpacked::Str(_) => f64::NAN,
    }
}
