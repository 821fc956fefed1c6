use super::fixtures::{
    test_registry, SER_TEST_BOX, SER_TEST_DATA, SER_TEST_NESTED, SER_TEST_SIMPLE,
};
use crate::init_tracing;
use gwyser_engine::Deserializer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ITERATIONS: usize = 10_000;

/// Applies between 1 and 11 random deletions, insertions and swaps.
fn perturb(rng: &mut StdRng, orig: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(orig.len() + 20);
    buf.extend_from_slice(orig);

    for _ in 0..rng.gen_range(1..12) {
        match rng.gen_range(0..3) {
            0 => {
                if !buf.is_empty() {
                    let pos = rng.gen_range(0..buf.len());
                    buf.remove(pos);
                }
            }
            1 => {
                let pos = rng.gen_range(0..=buf.len());
                buf.insert(pos, rng.gen());
            }
            _ => {
                if !buf.is_empty() {
                    let pos = rng.gen_range(0..buf.len());
                    let pos2 = rng.gen_range(0..buf.len());
                    buf.swap(pos, pos2);
                }
            }
        }
    }
    buf
}

#[test]
fn deserialize_garbage() {
    init_tracing();
    let origs = [SER_TEST_SIMPLE, SER_TEST_DATA, SER_TEST_NESTED, SER_TEST_BOX];
    let reg = test_registry();
    let de = Deserializer::new(&reg);
    let mut rng = StdRng::seed_from_u64(42);

    let mut n_ok = 0;
    for _ in 0..ITERATIONS {
        let orig = origs[rng.gen_range(0..origs.len())];
        let buf = perturb(&mut rng, orig);

        let res = de.deserialize(&buf);
        assert_eq!(res.object.is_some(), res.errors.is_empty(), "{}", res.errors);
        assert!(res.bytes_consumed <= buf.len());
        if res.object.is_some() {
            n_ok += 1;
        }
    }
    /* Swapping equal bytes or appending leaves an object intact. */
    assert!(n_ok > 0);
}

#[test]
fn truncated_prefixes() {
    let reg = test_registry();
    let de = Deserializer::new(&reg);
    for orig in [SER_TEST_SIMPLE, SER_TEST_DATA, SER_TEST_NESTED, SER_TEST_BOX] {
        for len in 0..orig.len() {
            let res = de.deserialize(&orig[..len]);
            assert!(res.object.is_none(), "prefix of {len} bytes");
            assert!(!res.errors.is_empty());
        }
    }
}
