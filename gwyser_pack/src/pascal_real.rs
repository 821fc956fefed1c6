//! Turbo Pascal 6-byte reals.
//!
//! Little endian layout: byte 0 is the exponent biased by 129 (0 means the
//! value is zero), bytes 1..5 hold the 39-bit mantissa without its leading
//! one, and the top bit of byte 5 is the sign. The big endian layout is the
//! byte reversal.

use crate::ByteOrder;

const MANTISSA_B: f64 = 549755813888.0; // 2^39
const MANTISSA_2B: f64 = 1099511627776.0; // 2^40
const EXPONENT_BIAS: i32 = 129;

pub const PASCAL_REAL_SIZE: usize = 6;

fn encode_le(x: f64) -> [u8; PASCAL_REAL_SIZE] {
    let mut p = [0u8; PASCAL_REAL_SIZE];
    if x == 0.0 || x.is_nan() {
        return p;
    }

    let (mut x, sign) = if x < 0.0 { (-x, 0x80u8) } else { (x, 0u8) };
    if x.is_infinite() {
        p = [0xff; PASCAL_REAL_SIZE];
        p[5] &= 0x7f | sign;
        return p;
    }

    let mut power = x.log2().floor() as i32;
    x *= MANTISSA_B / (power as f64).exp2();
    if x < MANTISSA_B {
        x *= 2.0;
        power -= 1;
    }
    x = (x + 0.499).floor();
    if x >= MANTISSA_2B {
        x = (x / 2.0 + 0.499).floor();
        power += 1;
    }

    /* Underflow flushes to zero, overflow saturates. */
    let power = power.saturating_add(EXPONENT_BIAS);
    if power < 0 {
        return p;
    }
    if power > 255 {
        p = [0xff; PASCAL_REAL_SIZE];
        p[5] &= 0x7f | sign;
        return p;
    }

    p[0] = power as u8;
    let mantissa = (x - MANTISSA_B) as u64;
    p[1..].copy_from_slice(&mantissa.to_le_bytes()[..5]);
    p[5] |= sign;
    p
}

fn decode_le(p: &[u8; PASCAL_REAL_SIZE]) -> f64 {
    if p[0] == 0 {
        return 0.0;
    }

    let mut x = 1.0
        + ((((p[1] as f64 / 256.0 + p[2] as f64) / 256.0 + p[3] as f64) / 256.0 + p[4] as f64)
            / 256.0
            + (p[5] & 0x7f) as f64)
            / 128.0;
    if p[5] & 0x80 != 0 {
        x = -x;
    }

    x * 2f64.powi(p[0] as i32 - EXPONENT_BIAS)
}

pub(crate) fn encode(x: f64, order: ByteOrder) -> [u8; PASCAL_REAL_SIZE] {
    let mut p = encode_le(x);
    if order == ByteOrder::Big {
        p.reverse();
    }
    p
}

pub(crate) fn decode(buf: &[u8], order: ByteOrder) -> f64 {
    let mut p = [0u8; PASCAL_REAL_SIZE];
    p.copy_from_slice(&buf[..PASCAL_REAL_SIZE]);
    if order == ByteOrder::Big {
        p.reverse();
    }
    decode_le(&p)
}
