use super::fixtures::{test_registry, SerBoxTest, SerList, SerPair, SerTest, SER_TEST_BOX};
use anyhow::Result;
use gwyser_engine::{serialize_to_vec, Deserialized, Deserializer, Rgba};
use gwyser_types::{DeserializeErrorKind, Serializable, SerializableBoxed};

fn deserialize(bytes: &[u8]) -> Deserialized {
    let reg = test_registry();
    Deserializer::new(&reg).deserialize(bytes)
}

/// Overwrites the first occurrence of `from` with `to` of the same length.
fn replaced(from: &[u8], to: &[u8]) -> Vec<u8> {
    assert_eq!(from.len(), to.len());
    let mut bytes = SER_TEST_BOX.to_vec();
    let pos = bytes
        .windows(from.len())
        .position(|w| w == from)
        .unwrap();
    bytes[pos..pos + to.len()].copy_from_slice(to);
    bytes
}

fn golden_box() -> SerBoxTest {
    SerBoxTest {
        color: Rgba::new(1.0, 0.0, 0.0, 0.5),
    }
}

#[test]
fn serialize_boxed() -> Result<()> {
    let bytes = serialize_to_vec(&golden_box())?;
    assert_eq!(SER_TEST_BOX, &bytes[..]);
    Ok(())
}

#[test]
fn deserialize_boxed() {
    let res = deserialize(SER_TEST_BOX);
    assert!(res.errors.is_empty(), "{}", res.errors);
    assert_eq!(SER_TEST_BOX.len(), res.bytes_consumed);
    let obj = res.object.unwrap();
    assert_eq!(Some(&golden_box()), obj.downcast_ref::<SerBoxTest>());
}

#[test]
fn renamed_boxed_item_is_ignored() {
    let bytes = replaced(b"color", b"skunk");
    let res = deserialize(&bytes);
    assert!(res.errors.is_empty(), "{}", res.errors);
    assert_eq!(bytes.len(), res.bytes_consumed);
    let obj = res.object.unwrap();
    assert_eq!(Some(&SerBoxTest::default()), obj.downcast_ref::<SerBoxTest>());
}

#[test]
fn unknown_boxed_type() {
    let bytes = replaced(b"GwyRGBA", b"BREAKME");
    let res = deserialize(&bytes);
    assert!(res.object.is_none());
    assert_eq!(vec![DeserializeErrorKind::Object], res.errors.kinds());
    assert_eq!(bytes.len(), res.bytes_consumed);
}

#[test]
fn boxed_type_mismatch() {
    /* A registered boxed type, but not the one the item requires. */
    let bytes = replaced(b"GwyRGBA", b"GwyPair");
    let res = deserialize(&bytes);
    assert!(res.object.is_none());
    assert_eq!(vec![DeserializeErrorKind::Invalid], res.errors.kinds());

    /* Tagged as an object, the payload names no known object type. */
    let bytes = replaced(b"color\0x", b"color\0o");
    let res = deserialize(&bytes);
    assert!(res.object.is_none());
    assert_eq!(vec![DeserializeErrorKind::Object], res.errors.kinds());
}

#[test]
fn boxed_inside_object_arrays() -> Result<()> {
    let mut list = SerList::default();
    list.push(SerBoxTest {
        color: Rgba::new(0.25, 0.5, 0.75, 1.0),
    });
    list.push(SerTest::default());
    list.push(golden_box());

    let bytes = serialize_to_vec(&list)?;
    let reg = test_registry();
    let copy = Deserializer::new(&reg)
        .deserialize_as::<SerList>(&bytes)
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    assert_eq!(3, copy.objects.len());
    assert_eq!(
        Some(&Rgba::new(0.25, 0.5, 0.75, 1.0)),
        copy.objects[0]
            .downcast_ref::<SerBoxTest>()
            .map(|obj| &obj.color)
    );
    assert_eq!(Some(&golden_box()), copy.objects[2].downcast_ref::<SerBoxTest>());
    Ok(())
}

#[test]
fn boxed_values() {
    let mut color = Rgba::default();
    let src = Rgba::new(0.1, 0.2, 0.3, 0.4);
    assert!(!color.equal(&src));
    color.assign(&src).unwrap();
    assert!(color.equal(&src));

    let pair = SerPair { x: 1.0, y: 2.0 };
    let err = color.assign(&pair).unwrap_err();
    assert_eq!("GwyRGBA", err.to_type);
    assert_eq!("GwyPair", err.from_type);
    assert!(!color.equal(&pair));
    assert_eq!(src, color);

    let dup = pair.duplicate();
    assert!(dup.equal(&pair));
    assert_eq!(Some(&pair), dup.downcast_ref::<SerPair>());

    let obj = golden_box();
    assert_eq!(Some(&obj), obj.duplicate().downcast_ref::<SerBoxTest>());
}
