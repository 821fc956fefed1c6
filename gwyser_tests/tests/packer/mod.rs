use anyhow::Result;
use gwyser_pack::{
    compute_size, pack, pack_to_vec, packed_size, unpack, PackError, PackValue, Unpacked,
};
use itertools::iproduct;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// One format item together with the values it consumes.
struct Part {
    format: &'static str,
    values: Vec<PackValue<'static>>,
}

fn part(format: &'static str, values: Vec<PackValue<'static>>) -> Part {
    Part { format, values }
}

fn parts() -> Vec<Part> {
    use PackValue::*;
    vec![
        part("h", vec![Int16(-2)]),
        part("2I", vec![UInt32(1), UInt32(u32::MAX)]),
        part("d", vec![Double(std::f64::consts::PI)]),
        part("r", vec![Double(1234.5)]),
        part("5S", vec![Bytes(b"block")]),
        part("s", vec![PackValue::from("cstr")]),
        part("p", vec![PackValue::from("pascal")]),
        part("3x", vec![]),
        part("q", vec![Int64(-1)]),
        part("Q", vec![UInt64(7)]),
        part("f", vec![Float(0.5)]),
        part("C", vec![UInt8(200)]),
        part("c", vec![Int8(-100)]),
        part("H", vec![UInt16(65535)]),
        part("i", vec![Int32(-123456)]),
        part("4d", vec![Double(0.0), Double(-0.5), Double(1e300), Double(-1e-300)]),
    ]
}

fn expected(value: &PackValue) -> Unpacked {
    match *value {
        PackValue::Int8(v) => Unpacked::Int8(v),
        PackValue::UInt8(v) => Unpacked::UInt8(v),
        PackValue::Int16(v) => Unpacked::Int16(v),
        PackValue::UInt16(v) => Unpacked::UInt16(v),
        PackValue::Int32(v) => Unpacked::Int32(v),
        PackValue::UInt32(v) => Unpacked::UInt32(v),
        PackValue::Int64(v) => Unpacked::Int64(v),
        PackValue::UInt64(v) => Unpacked::UInt64(v),
        PackValue::Float(v) => Unpacked::Float(v),
        PackValue::Double(v) => Unpacked::Double(v),
        PackValue::Bytes(v) => Unpacked::Bytes(v.to_vec()),
        PackValue::Str(v) => Unpacked::Str(v.to_vec()),
    }
}

/// Packs the parts in random orders under both byte orders, then checks
/// that every buffer up to 101 bytes too short is refused.
#[test]
fn shuffled_formats() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    for (order, _) in iproduct!(['<', '>'], 0..20) {
        let mut parts = parts();
        parts.shuffle(&mut rng);

        let format = parts
            .iter()
            .fold(order.to_string(), |acc, p| format!("{acc} {}", p.format));
        let values = parts
            .iter()
            .flat_map(|p| p.values.iter().copied())
            .collect::<Vec<_>>();

        let size = packed_size(&format, &values)?;
        assert_eq!(104, size);
        /* The minimum size counts one byte per string. */
        assert_eq!(size - 4 - 6, compute_size(&format)?);

        let bytes = pack_to_vec(&format, &values)?;
        assert_eq!(size, bytes.len());
        let (len, unpacked) = unpack(&format, &bytes)?;
        assert_eq!(size, len);
        assert_eq!(values.iter().map(expected).collect::<Vec<_>>(), unpacked);

        for short in 1..=101 {
            let mut buf = vec![0u8; size - short];
            match pack(&format, &mut buf, &values) {
                Err(PackError::Size(_)) => {}
                res => panic!("{format} into {} bytes: {res:?}", buf.len()),
            }
            match unpack(&format, &bytes[..size - short]) {
                Err(PackError::Size(_)) | Err(PackError::Data(_)) => {}
                res => panic!("{format} from {} bytes: {res:?}", size - short),
            }
        }
    }
    Ok(())
}

#[test]
fn limits() {
    let long = "x".repeat(256);
    assert!(matches!(
        pack_to_vec("<p", &[PackValue::from(long.as_str())]),
        Err(PackError::Arguments(_))
    ));
    assert!(matches!(compute_size("<2d3"), Err(PackError::Format(_))));
    assert!(matches!(compute_size("2d"), Err(PackError::Format(_))));
}
