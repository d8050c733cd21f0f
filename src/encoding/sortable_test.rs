use std::cmp::Ordering;

use proptest::prelude::*;

use super::{decode, encode};
use crate::key::{Element, Key};

fn enc(key: &Key) -> Vec<u8> {
    encode(key).unwrap()
}

fn assert_sorted(keys: &[Key], allow_equal: bool) {
    for pair in keys.windows(2) {
        let (a, b) = (enc(&pair[0]), enc(&pair[1]));
        let cmp = a.cmp(&b);
        assert!(
            cmp == Ordering::Less || (allow_equal && cmp == Ordering::Equal),
            "sort order violation: {} ({:02x?}) should be before {} ({:02x?})",
            pair[0],
            a,
            pair[1],
            b,
        );
    }
}

#[test]
fn test_int_sort_order() {
    let keys: Vec<Key> = [i64::MIN, -1000, -2, -1, 0, 1, 2, 1000, i64::MAX]
        .iter()
        .map(|v| crate::key![*v])
        .collect();
    assert_sorted(&keys, false);
}

#[test]
fn test_float_sort_order() {
    let keys: Vec<Key> = [
        f64::NEG_INFINITY,
        -1000.5,
        -1.0,
        -0.5,
        -0.0,
        0.0,
        0.5,
        1.0,
        1000.5,
        f64::INFINITY,
    ]
    .iter()
    .map(|v| crate::key![*v])
    .collect();
    // -0.0 and 0.0 are equal as keys; the bytes only need to be non-decreasing.
    assert_sorted(&keys, true);
}

#[test]
fn test_string_sort_order() {
    let keys: Vec<Key> = [
        "", "\0", "\0\0", "a", "a\0", "a\0b", "aa", "aaa", "ab", "b", "ba", "hello", "world",
    ]
    .iter()
    .map(|v| crate::key![*v])
    .collect();
    assert_sorted(&keys, false);
}

#[test]
fn test_tuple_sort_order() {
    for keys in [
        vec![
            crate::key![1_i64, "a"],
            crate::key![1_i64, "b"],
            crate::key![2_i64, "a"],
        ],
        vec![
            crate::key!["a", 1_i64],
            crate::key!["a", 2_i64],
            crate::key!["b", 1_i64],
        ],
    ] {
        assert_sorted(&keys, false);
        for pair in keys.windows(2) {
            assert_eq!(pair[0].compare(&pair[1]).unwrap(), Ordering::Less);
        }
    }
}

#[test]
fn test_prefix_sorts_first() {
    assert!(enc(&crate::key!["p"]) < enc(&crate::key!["p", 1_i64]));
    assert!(enc(&crate::key!["p"]) < enc(&crate::key!["p\0"]));
    assert!(enc(&Key::new()) < enc(&crate::key![Element::Null]));
}

#[test]
fn test_kind_order() {
    let keys = [
        crate::key![Element::Null],
        crate::key![true],
        crate::key![false],
        crate::key![i64::MAX],
        crate::key![0_u64],
        crate::key![f64::NEG_INFINITY],
        crate::key![""],
        crate::key![Vec::<u8>::new()],
    ];
    assert_sorted(&keys, false);
}

#[test]
fn test_round_trip_edge_values() {
    let keys = [
        Key::new(),
        crate::key![Element::Null, true, false],
        crate::key![0_i64, i64::MIN, i64::MAX, -1_i64],
        crate::key![0_u64, u64::MAX],
        crate::key![0.0_f64, -0.0_f64, f64::INFINITY, f64::NEG_INFINITY, f64::MIN_POSITIVE],
        crate::key!["", "\0", "a\0b", "UTF-8: 日本語"],
        crate::key![Vec::<u8>::new(), vec![0_u8, 0, 0xff]],
    ];
    for key in keys.iter() {
        let decoded = decode(&enc(key)).unwrap();
        assert_eq!(&decoded, key, "{}", key);
    }

    // Signed zeros are equal as keys, so check that the sign survives too.
    let decoded = decode(&enc(&crate::key![-0.0_f64])).unwrap();
    match decoded.elements() {
        [Element::Float(f)] => assert!(f.is_sign_negative() && *f == 0.0),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_nan_round_trips_to_nan() {
    let decoded = decode(&enc(&crate::key![f64::NAN])).unwrap();
    match decoded.elements() {
        [Element::Float(f)] => assert!(f.is_nan()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_opaque_encodes_as_string() {
    let opaque = Element::opaque("point", &"(1, 2)");
    let decoded = decode(&enc(&crate::key![opaque])).unwrap();
    assert_eq!(decoded, crate::key!["(1, 2)"]);
}

fn arb_element() -> impl Strategy<Value = Element> {
    prop_oneof![
        Just(Element::Null),
        any::<bool>().prop_map(Element::Bool),
        any::<i64>().prop_map(Element::SignedInt),
        any::<u64>().prop_map(Element::UnsignedInt),
        any::<f64>()
            .prop_filter("not NaN", |f| !f.is_nan())
            .prop_map(Element::Float),
        any::<String>().prop_map(Element::String),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Element::Bytes),
    ]
}

fn arb_key() -> impl Strategy<Value = Key> {
    prop::collection::vec(arb_element(), 0..6).prop_map(Key::from)
}

proptest! {
    #[test]
    fn prop_round_trip(key in arb_key()) {
        let decoded = decode(&enc(&key)).unwrap();
        prop_assert_eq!(decoded, key);
    }

    #[test]
    fn prop_int_order(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(a.cmp(&b), enc(&crate::key![a]).cmp(&enc(&crate::key![b])));
    }

    #[test]
    fn prop_float_order(a in any::<f64>(), b in any::<f64>()) {
        // The transform is exactly IEEE-754 total order, NaN included.
        prop_assert_eq!(a.total_cmp(&b), enc(&crate::key![a]).cmp(&enc(&crate::key![b])));
    }

    #[test]
    fn prop_string_order(a in any::<String>(), b in any::<String>()) {
        let ka = crate::key![a.as_str()];
        let kb = crate::key![b.as_str()];
        prop_assert_eq!(ka.compare(&kb).unwrap(), enc(&ka).cmp(&enc(&kb)));
    }

    #[test]
    fn prop_tuple_order(a in (any::<i64>(), "[a-c\\x00]{0,3}"), b in (any::<i64>(), "[a-c\\x00]{0,3}")) {
        let ka = crate::key![a.0, a.1.as_str()];
        let kb = crate::key![b.0, b.1.as_str()];
        prop_assert_eq!(ka.compare(&kb).unwrap(), enc(&ka).cmp(&enc(&kb)));
    }
}
