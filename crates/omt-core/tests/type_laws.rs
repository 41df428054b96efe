//! Property tests for the open type model.
//!
//! - Structural equality is reflexive, symmetric and transitive.
//! - Composite equality ignores item declaration order.
//! - Tabular equality is sensitive to index name order.
//! - Every simple kind round-trips through its canonical text.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use omt_core::{
    ArrayType, BigInt, CompositeType, Decimal, ItemDef, ObjectName, OpenType, OpenValue, SimpleType,
    TabularType,
};
use proptest::prelude::*;

fn hash_of<T: Hash>(t: &T) -> u64 {
    let mut h = DefaultHasher::new();
    t.hash(&mut h);
    h.finish()
}

fn arb_simple() -> impl Strategy<Value = SimpleType> {
    prop::sample::select(SimpleType::all().to_vec())
}

fn composite_from(name: &str, items: &[(String, OpenType)]) -> CompositeType {
    CompositeType::new(
        name,
        "generated",
        items
            .iter()
            .map(|(n, t)| ItemDef::new(n.clone(), format!("item {n}"), t.clone()))
            .collect(),
    )
    .expect("generated composite is well formed")
}

fn arb_open_type() -> impl Strategy<Value = OpenType> {
    let leaf = arb_simple().prop_map(OpenType::Simple);
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (1usize..4, inner.clone()).prop_map(|(dim, t)| {
                OpenType::from(ArrayType::new(dim, t).expect("dimension >= 1"))
            }),
            (
                "[A-C]",
                prop::collection::btree_map("[a-e]", inner.clone(), 1..4)
            )
                .prop_map(|(name, items)| {
                    let items: Vec<_> = items.into_iter().collect();
                    OpenType::from(composite_from(&name, &items))
                }),
            (
                "[A-C]",
                prop::collection::btree_map("[a-e]", inner, 1..4),
                any::<prop::sample::Index>()
            )
                .prop_map(|(name, items, idx)| {
                    let items: Vec<_> = items.into_iter().collect();
                    let key = items[idx.index(items.len())].0.clone();
                    let row = composite_from(&format!("{name}Row"), &items);
                    OpenType::from(
                        TabularType::new(name, "generated", row, vec![key])
                            .expect("index name exists in row"),
                    )
                }),
        ]
    })
}

proptest! {
    #[test]
    fn equality_is_reflexive(t in arb_open_type()) {
        prop_assert_eq!(&t, &t.clone());
        prop_assert_eq!(hash_of(&t), hash_of(&t.clone()));
    }

    #[test]
    fn equality_is_symmetric(a in arb_open_type(), b in arb_open_type()) {
        prop_assert_eq!(a == b, b == a);
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }

    #[test]
    fn equality_is_transitive(
        a in arb_open_type(),
        b in arb_open_type(),
        c in arb_open_type(),
    ) {
        if a == b && b == c {
            prop_assert_eq!(&a, &c);
        }
    }

    #[test]
    fn equal_types_are_mutually_assignable(t in arb_open_type()) {
        prop_assert!(t.is_assignable_from(&t.clone()));
    }

    #[test]
    fn composite_equality_ignores_item_order(
        items in prop::collection::btree_map("[a-h]{1,3}", arb_open_type(), 1..6)
    ) {
        let forward: Vec<_> = items.into_iter().collect();
        let mut backward = forward.clone();
        backward.reverse();
        let a = composite_from("Rec", &forward);
        let b = composite_from("Rec", &backward);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn tabular_equality_is_index_order_sensitive(
        items in prop::collection::btree_map("[a-h]{1,3}", arb_simple(), 2..6)
    ) {
        let items: Vec<(String, OpenType)> =
            items.into_iter().map(|(n, s)| (n, OpenType::Simple(s))).collect();
        let row = Arc::new(composite_from("Row", &items));
        let first = items[0].0.clone();
        let second = items[1].0.clone();
        let ab = TabularType::new("T", "t", row.clone(), vec![first.clone(), second.clone()]).unwrap();
        let ba = TabularType::new("T", "t", row.clone(), vec![second.clone(), first.clone()]).unwrap();
        let ab_again = TabularType::new("T", "t", row, vec![first, second]).unwrap();
        prop_assert_ne!(&ab, &ba);
        prop_assert_eq!(ab, ab_again);
    }
}

// ─── Round-trip law ──────────────────────────────────────────────────

fn arb_big_int() -> impl Strategy<Value = BigInt> {
    prop_oneof![
        any::<i64>().prop_map(BigInt::from),
        any::<i128>().prop_map(BigInt::from),
        "-?[1-9][0-9]{38,80}".prop_map(|digits| digits.parse::<BigInt>().unwrap()),
    ]
}

fn arb_scalar() -> impl Strategy<Value = OpenValue> {
    prop_oneof![
        any::<bool>().prop_map(OpenValue::Boolean),
        any::<char>().prop_map(OpenValue::Character),
        any::<i8>().prop_map(OpenValue::Byte),
        any::<i16>().prop_map(OpenValue::Short),
        any::<i32>().prop_map(OpenValue::Integer),
        any::<i64>().prop_map(OpenValue::Long),
        any::<f32>().prop_filter("NaN payloads do not survive text", |f| !f.is_nan())
            .prop_map(OpenValue::Float),
        any::<f64>().prop_filter("NaN payloads do not survive text", |f| !f.is_nan())
            .prop_map(OpenValue::Double),
        ".{0,20}".prop_map(OpenValue::String),
        (arb_big_int(), prop_oneof![-12i32..24, any::<i32>()])
            .prop_map(|(u, s)| OpenValue::BigDecimal(Decimal::new(u, s))),
        arb_big_int().prop_map(OpenValue::BigInteger),
        // Years -1200 to 11476, so signed and five-digit years are covered.
        (-100_000_000_000_000i64..=300_000_000_000_000).prop_map(|ms| {
            OpenValue::Date(omt_core::temporal::date_from_epoch_millis(ms).unwrap())
        }),
        (
            "[a-z.]{0,8}",
            prop::collection::btree_map("[a-z]{1,5}", "[a-zA-Z0-9]{1,5}", 1..4)
        )
            .prop_map(|(d, props)| OpenValue::ObjectName(ObjectName::new(d, props).unwrap())),
    ]
}

proptest! {
    #[test]
    fn canonical_text_roundtrips(value in arb_scalar()) {
        let kind = value.simple_type().unwrap();
        let text = value.to_string();
        let parsed = kind.parse(&text);
        prop_assert!(parsed.is_ok(), "{kind} failed to parse its own rendering {text:?}");
        let parsed = parsed.unwrap();
        prop_assert_eq!(parsed.to_string(), text);
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn parsed_values_belong_to_their_type(value in arb_scalar()) {
        let kind = value.simple_type().unwrap();
        prop_assert!(OpenType::Simple(kind).is_value(&value));
    }

    #[test]
    fn natural_order_is_antisymmetric(a in arb_scalar(), b in arb_scalar()) {
        match (a.natural_cmp(&b), b.natural_cmp(&a)) {
            (Some(x), Some(y)) => prop_assert_eq!(x, y.reverse()),
            (None, None) => {}
            other => prop_assert!(false, "asymmetric comparability: {other:?}"),
        }
    }
}

#[test]
fn composite_value_with_extra_item_is_conversion_error() {
    let point = Arc::new(composite_from(
        "Point",
        &[
            ("x".into(), SimpleType::Integer.into()),
            ("y".into(), SimpleType::Integer.into()),
        ],
    ));
    let err = omt_core::CompositeData::of(point, [("x", 1), ("y", 2), ("z", 3)]).unwrap_err();
    assert!(matches!(err, omt_core::OpenDataError::ValueConversion(_)));
}

#[test]
fn tabular_rejects_duplicate_index() {
    let point = Arc::new(composite_from(
        "Point",
        &[
            ("x".into(), SimpleType::Integer.into()),
            ("y".into(), SimpleType::Integer.into()),
        ],
    ));
    let ty = TabularType::new("Points", "points", point.clone(), vec!["x".into()]).unwrap();
    let mut table = omt_core::TabularData::new(ty);
    table
        .put(omt_core::CompositeData::of(point.clone(), [("x", 1), ("y", 1)]).unwrap())
        .unwrap();
    let err = table
        .put(omt_core::CompositeData::of(point, [("x", 1), ("y", 2)]).unwrap())
        .unwrap_err();
    assert!(matches!(err, omt_core::OpenDataError::KeyAlreadyExists { .. }));
}

#[test]
fn big_numbers_are_not_capped_at_128_bits() {
    let two_pow_127 = "170141183460469231731687303715884105728";
    let v = SimpleType::BigInteger.parse(two_pow_127).unwrap();
    assert_eq!(v.to_string(), two_pow_127);

    let min = OpenValue::BigDecimal(Decimal::new(i128::MIN, 0));
    assert_eq!(SimpleType::BigDecimal.parse(&min.to_string()).unwrap(), min);

    let tiny = SimpleType::BigDecimal.parse("1e-70000").unwrap();
    assert_eq!(tiny.to_string(), "1E-70000");
}
