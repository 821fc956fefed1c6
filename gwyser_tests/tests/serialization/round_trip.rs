use super::fixtures::{test_registry, SerList, SerTest, DATA, SER_TEST_DATA};
use anyhow::Result;
use gwyser_engine::{
    serialize_to_vec, serialize_with, DeserializeOptions, Deserializer, Selection, SelectionKind,
    SerializeOptions,
};
use gwyser_types::{DeserializeErrorKind, Serializable};
use itertools::Itertools;

fn serialize_and_back<T: Serializable>(object: &T) -> Result<Box<T>> {
    let bytes = serialize_to_vec(object)?;
    let reg = test_registry();
    let res = Deserializer::new(&reg).deserialize_as::<T>(&bytes);
    res.map_err(|errors| anyhow::anyhow!("{errors}"))
}

#[test]
fn registry_contents() {
    let reg = test_registry();
    assert_eq!(
        vec![
            "GwySelectionLine",
            "GwySelectionPoint",
            "GwySelectionRectangle",
            "GwySerBoxTest",
            "GwySerList",
            "GwySerTest",
        ],
        reg.type_names().sorted().collect::<Vec<_>>()
    );
    assert_eq!(
        vec!["GwyPair", "GwyRGBA"],
        reg.boxed_type_names().sorted().collect::<Vec<_>>()
    );
}

#[test]
fn nested_with_data() -> Result<()> {
    let mut child = SerTest::golden_data();
    child.child = Some(Box::new(SerTest::new_filled(false, &[], "", 7)));
    let sertest = SerTest {
        child: Some(Box::new(child)),
        i64: -1,
        ..SerTest::default()
    };

    let copy = serialize_and_back(&sertest)?;
    assert_eq!(sertest, *copy);
    let grandchild = copy
        .child
        .as_deref()
        .and_then(|c| c.child.as_deref())
        .unwrap();
    assert_eq!(Some(&[] as &[f64]), grandchild.data.as_deref());
    assert_eq!(Some(""), grandchild.s.as_deref());

    /* Every itemized object was told it is done. */
    let mut obj = Some(&sertest);
    while let Some(o) = obj {
        assert_eq!(0, o.done_called.get());
        obj = o.child.as_deref();
    }
    Ok(())
}

#[test]
fn defaults_are_omitted() -> Result<()> {
    let sertest = SerTest {
        dbl: std::f64::consts::LN_2,
        ..SerTest::default()
    };
    let bytes = serialize_to_vec(&sertest)?;
    assert_eq!(36, bytes.len());

    let sertest = SerTest {
        dbl: 0.0,
        ..SerTest::default()
    };
    let copy = serialize_and_back(&sertest)?;
    assert_eq!(0.0, copy.dbl);
    Ok(())
}

#[test]
fn buffer_sizes() -> Result<()> {
    let sertest = SerTest::golden_data();
    for buffer_size in [1, 8, 13, 100, 1 << 16] {
        let mut out = vec![];
        let len = serialize_with(&sertest, &mut out, &SerializeOptions { buffer_size })?;
        assert_eq!(SER_TEST_DATA.len(), len);
        assert_eq!(SER_TEST_DATA, &out[..]);
    }
    Ok(())
}

#[test]
fn object_arrays() -> Result<()> {
    let mut points = Selection::new(SelectionKind::Point);
    points.set_data(&[1.0, 2.0, 3.0, 4.0])?;
    let mut lines = Selection::new(SelectionKind::Line);
    lines.set(0, &[0.0, 0.0, 1.0, 1.0])?;

    let inner = SerList {
        name: "inner".to_owned(),
        objects: vec![Box::new(SerTest::golden_nested()) as Box<dyn Serializable>],
    };

    let mut list = SerList {
        name: "shapes".to_owned(),
        ..SerList::default()
    };
    list.push(points.clone());
    list.push(SerTest::new_filled(true, &DATA, "x", 1));
    list.push(lines.clone());
    list.push(inner);
    list.push(SerList::default());

    let copy = serialize_and_back(&list)?;
    assert_eq!("shapes", copy.name);
    assert_eq!(
        vec![
            "GwySelectionPoint",
            "GwySerTest",
            "GwySelectionLine",
            "GwySerList",
            "GwySerList"
        ],
        copy.objects.iter().map(|obj| obj.type_name()).collect::<Vec<_>>()
    );
    assert_eq!(Some(&points), copy.objects[0].downcast_ref::<Selection>());
    assert_eq!(Some(&lines), copy.objects[2].downcast_ref::<Selection>());
    assert_eq!(
        Some(&SerTest::new_filled(true, &DATA, "x", 1)),
        copy.objects[1].downcast_ref::<SerTest>()
    );

    let inner = copy.objects[3].downcast_ref::<SerList>().unwrap();
    assert_eq!("inner", inner.name);
    assert_eq!(
        Some(&SerTest::golden_nested()),
        inner.objects[0].downcast_ref::<SerTest>()
    );
    assert!(copy.objects[4].downcast_ref::<SerList>().unwrap().objects.is_empty());
    Ok(())
}

#[test]
fn duplicate_and_assign() -> Result<()> {
    let orig = SerTest::golden_data();
    let dup = orig.duplicate();
    assert_eq!(Some(&orig), dup.downcast_ref::<SerTest>());

    let mut target = SerTest::default();
    target.assign(&*dup)?;
    assert_eq!(orig, target);

    let err = target
        .assign(&Selection::new(SelectionKind::Point))
        .unwrap_err();
    assert_eq!("GwySerTest", err.to_type);
    assert_eq!("GwySelectionPoint", err.from_type);
    assert_eq!(orig, target);

    let mut list = SerList::default();
    list.push(orig.clone());
    let mut list_copy = SerList::default();
    list_copy.assign(&list)?;
    assert_eq!(Some(&orig), list_copy.objects[0].downcast_ref::<SerTest>());
    Ok(())
}

fn nested_chain(depth: usize) -> SerTest {
    let mut obj = SerTest::default();
    for i in 1..depth {
        obj = SerTest {
            i32: i as i32,
            child: Some(Box::new(obj)),
            ..SerTest::default()
        };
    }
    obj
}

#[test]
fn depth_limit() -> Result<()> {
    let chain = nested_chain(200);
    let bytes = serialize_to_vec(&chain)?;
    let reg = test_registry();

    let res = Deserializer::new(&reg).deserialize(&bytes);
    assert!(res.object.is_none());
    assert_eq!(vec![DeserializeErrorKind::TooDeep], res.errors.kinds());

    let de = Deserializer::with_options(&reg, DeserializeOptions { max_depth: 300 });
    let copy = de.deserialize_as::<SerTest>(&bytes).map_err(|e| anyhow::anyhow!("{e}"))?;
    assert_eq!(199, copy.i32);
    assert!(chain == *copy);

    let de = Deserializer::with_options(&reg, DeserializeOptions { max_depth: 200 });
    assert!(de.deserialize(&bytes).object.is_some());
    let de = Deserializer::with_options(&reg, DeserializeOptions { max_depth: 199 });
    assert!(de.deserialize(&bytes).object.is_none());
    Ok(())
}
