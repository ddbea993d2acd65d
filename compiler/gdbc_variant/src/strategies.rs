//! Proptest strategies for object-free values whose round trip is exact.

use proptest::collection::vec;
use proptest::prelude::*;

use crate::math::{Color, Real, Vector2, Vector2i, Vector3};
use crate::value::{Array, ElementType, NodePath, Signal, Variant};
use crate::VariantType;

fn real() -> impl Strategy<Value = Real> {
    (-1.0e6_f32..1.0e6).prop_map(Real::from)
}

fn scalar() -> impl Strategy<Value = Variant> {
    prop_oneof![
        Just(Variant::Nil),
        Just(Variant::Callable),
        any::<bool>().prop_map(Variant::Bool),
        any::<i64>().prop_map(Variant::Int),
        any::<i32>().prop_map(Variant::from),
        any::<f64>()
            .prop_filter("NaN never compares equal", |f| !f.is_nan())
            .prop_map(Variant::Float),
        "\\PC{0,12}".prop_map(Variant::String),
        "[a-z_]{0,9}".prop_map(Variant::StringName),
        any::<u64>().prop_map(Variant::Rid),
    ]
}

fn aggregate() -> impl Strategy<Value = Variant> {
    prop_oneof![
        (real(), real()).prop_map(|(x, y)| Variant::Vector2(Vector2::new(x, y))),
        (real(), real(), real()).prop_map(|(x, y, z)| Variant::Vector3(Vector3::new(x, y, z))),
        (any::<i32>(), any::<i32>()).prop_map(|(x, y)| Variant::Vector2i(Vector2i { x, y })),
        (0.0_f32..1.0, 0.0_f32..1.0, 0.0_f32..1.0, 0.0_f32..1.0)
            .prop_map(|(r, g, b, a)| Variant::Color(Color::rgba(r, g, b, a))),
        ("[a-z]{1,5}", any::<u64>())
            .prop_map(|(name, object_id)| Variant::Signal(Signal { name, object_id })),
        (vec("[A-Za-z]{1,6}", 0..3), vec("[a-z]{1,6}", 0..2), any::<bool>()).prop_map(
            |(names, subnames, absolute)| Variant::NodePath(NodePath {
                names,
                subnames,
                absolute,
            })
        ),
    ]
}

fn packed() -> impl Strategy<Value = Variant> {
    prop_oneof![
        vec(any::<u8>(), 0..9).prop_map(Variant::PackedByteArray),
        vec(any::<i32>(), 0..5).prop_map(Variant::PackedInt32Array),
        vec(any::<i64>(), 0..5).prop_map(Variant::PackedInt64Array),
        vec(-1.0e6_f32..1.0e6, 0..5).prop_map(Variant::PackedFloat32Array),
        vec("[a-z]{0,6}", 0..4).prop_map(Variant::PackedStringArray),
        vec((real(), real()), 0..4).prop_map(|v| {
            Variant::PackedVector2Array(v.into_iter().map(|(x, y)| Vector2::new(x, y)).collect())
        }),
    ]
}

/// Arbitrary object-free value, nested up to four levels.
pub(crate) fn arb_variant() -> impl Strategy<Value = Variant> {
    let leaf = prop_oneof![scalar(), aggregate(), packed()];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(|v| Variant::Array(Array::untyped(v))),
            vec(any::<i32>().prop_map(Variant::from), 0..4).prop_map(|v| Variant::Array(
                Array::typed(ElementType::Builtin(VariantType::Int), v)
            )),
            vec((inner.clone(), inner), 0..3).prop_map(Variant::Dictionary),
        ]
    })
}
