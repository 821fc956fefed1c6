use super::fixtures::{
    sin_pi_5, test_registry, SerTest, DATA, SER_TEST_DATA, SER_TEST_NESTED, SER_TEST_SIMPLE,
};
use anyhow::Result;
use gwyser_engine::{serialize, serialize_to_vec, Deserializer, SerializeError};
use gwyser_pack::{unpack, Unpacked};

#[test]
fn serialize_simple() -> Result<()> {
    let sertest = SerTest::default();
    let bytes = serialize_to_vec(&sertest)?;
    assert_eq!(SER_TEST_SIMPLE, &bytes[..]);
    assert_eq!(0, sertest.done_called.get());
    Ok(())
}

#[test]
fn deserialize_simple() -> Result<()> {
    let reg = test_registry();
    let res = Deserializer::new(&reg).deserialize(SER_TEST_SIMPLE);
    assert!(res.errors.is_empty(), "{}", res.errors);
    assert_eq!(SER_TEST_SIMPLE.len(), res.bytes_consumed);

    let obj = res.object.unwrap();
    let sertest = obj.downcast_ref::<SerTest>().unwrap();
    assert_eq!(&SerTest::default(), sertest);
    assert!(!sertest.flag);
    assert!(sertest.data.is_none());
    assert!(sertest.s.is_none());
    Ok(())
}

#[test]
fn serialize_data() -> Result<()> {
    let sertest = SerTest::golden_data();
    let bytes = serialize_to_vec(&sertest)?;
    assert_eq!(SER_TEST_DATA, &bytes[..]);
    assert_eq!(0, sertest.done_called.get());

    /* The header holds the type name and the byte size of the item block. */
    let (len, header) = unpack("<sQ", &bytes)?;
    assert_eq!(19, len);
    assert_eq!(
        vec![
            Unpacked::Str(b"GwySerTest".to_vec()),
            Unpacked::UInt64((bytes.len() - len) as u64)
        ],
        header
    );
    Ok(())
}

#[test]
fn deserialize_data() {
    let reg = test_registry();
    let sertest = Deserializer::new(&reg)
        .deserialize_as::<SerTest>(SER_TEST_DATA)
        .unwrap();

    assert!(sertest.flag);
    let data = sertest.data.as_deref().unwrap();
    assert_eq!(
        DATA.map(f64::to_bits).to_vec(),
        data.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
    assert_eq!(Some("Test Test"), sertest.s.as_deref());
    assert_eq!(0x12345678u32.to_le_bytes(), sertest.raw);
    assert_eq!(sin_pi_5(), sertest.dbl);
    assert!((sertest.dbl - (std::f64::consts::PI / 5.0).sin()).abs() < 1e-15);
    assert_eq!(0x1234, sertest.i16);
    assert_eq!(0xdeadbeef_u32 as i32, sertest.i32);
    assert_eq!(0x1020304050607080, sertest.i64);
    let strlist = sertest.strlist.clone().unwrap_or_default();
    assert_eq!(vec!["First things first", "Wait a second..."], strlist);
    assert!(sertest.child.is_none());
    assert_eq!(SerTest::golden_data(), *sertest);
}

#[test]
fn serialize_nested() -> Result<()> {
    let sertest = SerTest::golden_nested();
    let bytes = serialize_to_vec(&sertest)?;
    assert_eq!(SER_TEST_NESTED, &bytes[..]);

    let child = sertest.child.as_deref().unwrap();
    let grandchild = child.child.as_deref().unwrap();
    for obj in [&sertest, child, grandchild] {
        assert_eq!(0, obj.done_called.get());
    }
    Ok(())
}

#[test]
fn deserialize_nested() {
    let reg = test_registry();
    let res = Deserializer::new(&reg).deserialize(SER_TEST_NESTED);
    assert!(res.errors.is_empty(), "{}", res.errors);
    assert_eq!(SER_TEST_NESTED.len(), res.bytes_consumed);

    let obj = res.object.unwrap();
    let sertest = obj.downcast_ref::<SerTest>().unwrap();
    let child = sertest.child.as_deref().unwrap();
    let grandchild = child.child.as_deref().unwrap();
    assert!(grandchild.child.is_none());
    for obj in [sertest, child, grandchild] {
        assert!(!obj.flag);
        assert!(obj.data.is_none());
        assert!(obj.s.is_none());
        /* Construction is followed by exactly one done. */
        assert_eq!(1, obj.done_called.get());
    }
    assert_eq!(&SerTest::golden_nested(), sertest);
}

#[test]
fn serialize_to_short_sinks() {
    let sertest = SerTest::new_filled(true, &DATA, "Test Test", 0x12345678);
    for len in 1..102 {
        let mut sink = vec![0u8; len];
        match serialize(&sertest, &mut sink[..]) {
            Err(SerializeError::Io(_)) => {}
            res => panic!("sink of {len} bytes: {res:?}"),
        }
        assert_eq!(0, sertest.done_called.get());
    }
}
