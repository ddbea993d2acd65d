use super::*;
use crate::math::{Aabb, Basis, Plane, Projection, Quaternion, Rect2, Transform2D, Transform3D};
use crate::{encode_variant, ObjectMode};
use pretty_assertions::assert_eq;

fn round_trip(value: &Variant, mode: ObjectMode) -> Variant {
    let bytes = encode_variant(value, mode).unwrap();
    let (decoded, consumed) = decode_variant(&bytes, mode != ObjectMode::Reject).unwrap();
    assert_eq!(consumed, bytes.len());
    decoded
}

fn words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

// === Scalars ===

#[test]
fn scalars_round_trip() {
    for value in [
        Variant::Nil,
        Variant::Bool(true),
        Variant::Bool(false),
        Variant::Int(-7),
        Variant::Int(i64::MAX),
        Variant::Float(0.5),
        Variant::Float(0.1),
        Variant::Rid(0xDEAD_BEEF_0000_0001),
        Variant::Callable,
    ] {
        assert_eq!(round_trip(&value, ObjectMode::Reject), value);
    }
}

#[test]
fn strings_round_trip() {
    for value in [
        Variant::from(""),
        Variant::from("abc"),
        Variant::from("abcd"),
        Variant::from("héllo wörld"),
        Variant::StringName("ready".to_owned()),
    ] {
        assert_eq!(round_trip(&value, ObjectMode::Reject), value);
    }
}

#[test]
fn any_nonzero_bool_word_is_true() {
    let bytes = words(&[VariantType::Bool.as_u32(), 7]);
    assert_eq!(decode_variant(&bytes, false).unwrap(), (Variant::Bool(true), 8));
}

#[test]
fn decoding_stops_after_one_value() {
    let mut bytes = encode_variant(&Variant::Int(3), ObjectMode::Reject).unwrap();
    bytes.extend_from_slice(&[0xFF; 6]);
    assert_eq!(decode_variant(&bytes, false).unwrap(), (Variant::Int(3), 8));
}

// === Aggregates ===

#[test]
fn real_aggregates_round_trip() {
    let v3 = Vector3::new(1.0, -2.0, 3.5);
    for value in [
        Variant::Vector2(Vector2::new(1.5, -0.25)),
        Variant::Rect2(Rect2 {
            position: Vector2::new(1.0, 2.0),
            size: Vector2::new(3.0, 4.0),
        }),
        Variant::Vector3(v3),
        Variant::Transform2D(Transform2D {
            columns: [
                Vector2::new(1.0, 0.0),
                Vector2::new(0.0, 1.0),
                Vector2::new(5.0, 6.0),
            ],
        }),
        Variant::Vector4(Vector4::new(1.0, 2.0, 3.0, 4.0)),
        Variant::Plane(Plane { normal: v3, d: 9.0 }),
        Variant::Quaternion(Quaternion::default()),
        Variant::Aabb(Aabb {
            position: v3,
            size: Vector3::new(1.0, 1.0, 1.0),
        }),
        Variant::Basis(Basis::default()),
        Variant::Transform3D(Transform3D {
            basis: Basis::default(),
            origin: v3,
        }),
        Variant::Projection(Projection::default()),
        Variant::Color(Color::rgba(0.1, 0.2, 0.3, 1.0)),
    ] {
        assert_eq!(round_trip(&value, ObjectMode::Reject), value);
    }
}

#[test]
fn integer_aggregates_round_trip() {
    for value in [
        Variant::Vector2i(Vector2i { x: -1, y: 2 }),
        Variant::Rect2i(Rect2i {
            position: Vector2i { x: 1, y: 2 },
            size: Vector2i { x: 3, y: 4 },
        }),
        Variant::Vector3i(Vector3i { x: 1, y: 2, z: 3 }),
        Variant::Vector4i(Vector4i {
            x: 1,
            y: 2,
            z: 3,
            w: i32::MIN,
        }),
    ] {
        assert_eq!(round_trip(&value, ObjectMode::Reject), value);
    }
}

#[test]
fn wide_reals_decode_regardless_of_build_width() {
    let mut bytes = words(&[VariantType::Vector2.as_u32() | HeaderFlags::FLAG_64.bits()]);
    bytes.extend_from_slice(&1.5_f64.to_le_bytes());
    bytes.extend_from_slice(&(-2.0_f64).to_le_bytes());
    let (value, consumed) = decode_variant(&bytes, false).unwrap();
    assert_eq!(value, Variant::Vector2(Vector2::new(1.5, -2.0)));
    assert_eq!(consumed, 20);
}

#[test]
fn reference_payloads_round_trip() {
    for value in [
        Variant::NodePath(NodePath::parse("/root/Player:position:x")),
        Variant::NodePath(NodePath::default()),
        Variant::Signal(Signal {
            name: "pressed".to_owned(),
            object_id: 77,
        }),
    ] {
        assert_eq!(round_trip(&value, ObjectMode::Reject), value);
    }
}

// === Containers ===

#[test]
fn packed_arrays_round_trip() {
    for value in [
        Variant::PackedByteArray(vec![1, 2, 3, 4, 5]),
        Variant::PackedInt32Array(vec![-1, 0, 1]),
        Variant::PackedInt64Array(vec![i64::MIN, i64::MAX]),
        Variant::PackedFloat32Array(vec![0.5, -1.25]),
        Variant::PackedFloat64Array(vec![0.1, 1e300]),
        Variant::PackedStringArray(vec!["a".to_owned(), String::new(), "xyz".to_owned()]),
        Variant::PackedVector2Array(vec![Vector2::new(1.0, 2.0)]),
        Variant::PackedVector3Array(vec![Vector3::new(1.0, 2.0, 3.0)]),
        Variant::PackedColorArray(vec![Color::rgba(1.0, 0.0, 0.0, 1.0)]),
        Variant::PackedVector4Array(vec![Vector4::new(1.0, 2.0, 3.0, 4.0)]),
        Variant::PackedInt32Array(Vec::new()),
    ] {
        assert_eq!(round_trip(&value, ObjectMode::Reject), value);
    }
}

#[test]
fn nested_containers_round_trip() {
    let value = Variant::Dictionary(vec![
        (Variant::from("list"), Variant::from(Array::untyped(vec![
            Variant::Int(1),
            Variant::from("two"),
            Variant::Nil,
        ]))),
        (Variant::Int(3), Variant::Dictionary(Vec::new())),
    ]);
    assert_eq!(round_trip(&value, ObjectMode::Reject), value);
}

#[test]
fn builtin_typed_array_keeps_element_type() {
    let value = Variant::from(Array::typed(
        ElementType::Builtin(VariantType::String),
        vec![Variant::from("a"), Variant::from("b")],
    ));
    assert_eq!(round_trip(&value, ObjectMode::Reject), value);
}

#[test]
fn class_typed_array_keeps_class_in_full_mode() {
    let value = Variant::from(Array::typed(ElementType::ClassName("Node".to_owned()), Vec::new()));
    assert_eq!(round_trip(&value, ObjectMode::Full), value);
}

#[test]
fn script_typed_array_keeps_path_in_full_mode() {
    let value = Variant::from(Array::typed(
        ElementType::Script(ScriptRef::new("res://enemy.gd")),
        Vec::new(),
    ));
    assert_eq!(round_trip(&value, ObjectMode::Full), value);
}

#[test]
fn unknown_array_element_type_is_rejected() {
    let header = VariantType::Array.as_u32() | ArrayTyping::Builtin.flags().bits();
    let bytes = words(&[header, 200, 0]);
    assert_eq!(
        decode_variant(&bytes, false),
        Err(DecodeError::InvalidArrayType(200))
    );
}

// === Objects ===

#[test]
fn object_as_id_round_trip() {
    let value = Variant::object(Object::new("Node", 1234));
    let decoded = round_trip(&value, ObjectMode::AsId);
    assert_eq!(decoded, Variant::object(Object::encoded_id(1234)));
}

#[test]
fn object_id_zero_decodes_as_null() {
    let header = VariantType::Object.as_u32() | HeaderFlags::OBJECT_AS_ID.bits();
    let bytes = words(&[header, 0, 0]);
    assert_eq!(decode_variant(&bytes, true).unwrap(), (Variant::Object(None), 12));
}

#[test]
fn null_object_decodes_as_nil() {
    assert_eq!(round_trip(&Variant::Object(None), ObjectMode::Full), Variant::Nil);
}

#[test]
fn full_object_round_trip() {
    let object = Object::new("Sprite2D", 0)
        .with_property(Property::stored("visible", Variant::Bool(true)))
        .with_property(Property::transient("cache", Variant::Int(5)))
        .with_property(Property::stored("offset", Variant::Vector2(Vector2::new(1.0, 2.0))));
    let decoded = round_trip(&Variant::object(object), ObjectMode::Full);

    let expected = Object::new("Sprite2D", 0)
        .with_property(Property::stored("visible", Variant::Bool(true)))
        .with_property(Property::stored("offset", Variant::Vector2(Vector2::new(1.0, 2.0))));
    assert_eq!(decoded, Variant::object(expected));
}

#[test]
fn full_object_script_property_restores_script() {
    let object = Object::new("Node", 0)
        .with_property(Property::stored(SCRIPT_PROPERTY, Variant::Nil))
        .with_script(ScriptRef::new("res://player.gd"));
    let decoded = round_trip(&Variant::object(object.clone()), ObjectMode::Full);
    assert_eq!(decoded, Variant::object(object));
}

#[test]
fn objects_refused_unless_allowed() {
    let bytes = encode_variant(&Variant::object(Object::new("Node", 9)), ObjectMode::AsId).unwrap();
    assert_eq!(decode_variant(&bytes, false), Err(DecodeError::ObjectNotAllowed));
}

// === Malformed input ===

#[test]
fn empty_input_is_truncated() {
    assert_eq!(
        decode_variant(&[], false),
        Err(DecodeError::UnexpectedEnd {
            needed: 4,
            available: 0
        })
    );
}

#[test]
fn truncated_string_payload() {
    let bytes = encode_variant(&Variant::from("hello"), ObjectMode::Reject).unwrap();
    assert!(matches!(
        decode_variant(&bytes[..7], false),
        Err(DecodeError::UnexpectedEnd { .. })
    ));
}

#[test]
fn huge_count_fails_without_allocating() {
    let bytes = words(&[VariantType::PackedInt64Array.as_u32(), u32::MAX]);
    assert!(matches!(
        decode_variant(&bytes, false),
        Err(DecodeError::UnexpectedEnd { .. })
    ));
}

#[test]
fn unknown_type_tag() {
    let bytes = words(&[99]);
    assert_eq!(decode_variant(&bytes, false), Err(DecodeError::UnknownType(99)));
}

#[test]
fn invalid_utf8_string() {
    let mut bytes = words(&[VariantType::String.as_u32(), 2]);
    bytes.extend_from_slice(&[0xC3, 0x28, 0, 0]);
    assert_eq!(decode_variant(&bytes, false), Err(DecodeError::InvalidUtf8));
}

#[test]
fn nesting_past_depth_limit_is_refused() {
    let array = VariantType::Array.as_u32();
    let mut raw = Vec::new();
    for _ in 0..=MAX_RECURSION_DEPTH {
        raw.extend_from_slice(&[array, 1]);
    }
    raw.push(VariantType::Nil.as_u32());
    assert_eq!(
        decode_variant(&words(&raw), false),
        Err(DecodeError::DepthExceeded {
            depth: MAX_RECURSION_DEPTH + 1
        })
    );
}

// === Properties ===

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_round_trip {
    use super::super::decode_variant;
    use crate::strategies::arb_variant;
    use crate::{encode_variant, ObjectMode};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decode_inverts_encode(value in arb_variant()) {
            let bytes = encode_variant(&value, ObjectMode::Reject).unwrap();
            let (decoded, consumed) = decode_variant(&bytes, false).unwrap();
            prop_assert_eq!(consumed, bytes.len());
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn truncated_input_never_panics(value in arb_variant(), cut in 0usize..64) {
            let bytes = encode_variant(&value, ObjectMode::Reject).unwrap();
            let end = bytes.len().saturating_sub(cut);
            let _ = decode_variant(&bytes[..end], false);
        }
    }
}
