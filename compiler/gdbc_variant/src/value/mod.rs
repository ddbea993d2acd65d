//! The dynamic value model.

mod object;

pub use object::{
    NodePath, Object, Property, ScriptRef, Signal, ENCODED_OBJECT_ID_CLASS, RESOURCE_SCHEME,
    SCRIPT_PROPERTY,
};

use crate::math::{
    Aabb, Basis, Color, Plane, Projection, Quaternion, RealComponents, Rect2, Rect2i,
    Transform2D, Transform3D, Vector2, Vector2i, Vector3, Vector3i, Vector4, Vector4i,
};
use crate::stack::ensure_sufficient_stack;
use crate::VariantType;

/// Element typing of an [`Array`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementType {
    #[default]
    Untyped,
    /// Elements are all of one built-in type.
    Builtin(VariantType),
    /// Elements are objects of a named class.
    ClassName(String),
    /// Elements are instances of a script.
    Script(ScriptRef),
}

/// Ordered sequence of values, optionally element-typed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Array {
    pub element_type: ElementType,
    pub elements: Vec<Variant>,
}

impl Array {
    pub fn untyped(elements: Vec<Variant>) -> Self {
        Array {
            element_type: ElementType::Untyped,
            elements,
        }
    }

    pub fn typed(element_type: ElementType, elements: Vec<Variant>) -> Self {
        Array {
            element_type,
            elements,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A value of the dynamic, tagged-union value model.
///
/// Equality is structural. Dictionaries keep their pairs in iteration
/// order, which is also encoding order.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Variant {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),

    Vector2(Vector2),
    Vector2i(Vector2i),
    Rect2(Rect2),
    Rect2i(Rect2i),
    Vector3(Vector3),
    Vector3i(Vector3i),
    Transform2D(Transform2D),
    Vector4(Vector4),
    Vector4i(Vector4i),
    Plane(Plane),
    Quaternion(Quaternion),
    Aabb(Aabb),
    Basis(Basis),
    Transform3D(Transform3D),
    Projection(Projection),

    Color(Color),
    StringName(String),
    NodePath(NodePath),
    Rid(u64),
    /// `None` is the null object.
    Object(Option<Box<Object>>),
    Callable,
    Signal(Signal),
    Dictionary(Vec<(Variant, Variant)>),
    Array(Array),

    PackedByteArray(Vec<u8>),
    PackedInt32Array(Vec<i32>),
    PackedInt64Array(Vec<i64>),
    PackedFloat32Array(Vec<f32>),
    PackedFloat64Array(Vec<f64>),
    PackedStringArray(Vec<String>),
    PackedVector2Array(Vec<Vector2>),
    PackedVector3Array(Vec<Vector3>),
    PackedColorArray(Vec<Color>),
    PackedVector4Array(Vec<Vector4>),
}

impl Variant {
    pub fn get_type(&self) -> VariantType {
        match self {
            Variant::Nil => VariantType::Nil,
            Variant::Bool(_) => VariantType::Bool,
            Variant::Int(_) => VariantType::Int,
            Variant::Float(_) => VariantType::Float,
            Variant::String(_) => VariantType::String,
            Variant::Vector2(_) => VariantType::Vector2,
            Variant::Vector2i(_) => VariantType::Vector2i,
            Variant::Rect2(_) => VariantType::Rect2,
            Variant::Rect2i(_) => VariantType::Rect2i,
            Variant::Vector3(_) => VariantType::Vector3,
            Variant::Vector3i(_) => VariantType::Vector3i,
            Variant::Transform2D(_) => VariantType::Transform2D,
            Variant::Vector4(_) => VariantType::Vector4,
            Variant::Vector4i(_) => VariantType::Vector4i,
            Variant::Plane(_) => VariantType::Plane,
            Variant::Quaternion(_) => VariantType::Quaternion,
            Variant::Aabb(_) => VariantType::Aabb,
            Variant::Basis(_) => VariantType::Basis,
            Variant::Transform3D(_) => VariantType::Transform3D,
            Variant::Projection(_) => VariantType::Projection,
            Variant::Color(_) => VariantType::Color,
            Variant::StringName(_) => VariantType::StringName,
            Variant::NodePath(_) => VariantType::NodePath,
            Variant::Rid(_) => VariantType::Rid,
            Variant::Object(_) => VariantType::Object,
            Variant::Callable => VariantType::Callable,
            Variant::Signal(_) => VariantType::Signal,
            Variant::Dictionary(_) => VariantType::Dictionary,
            Variant::Array(_) => VariantType::Array,
            Variant::PackedByteArray(_) => VariantType::PackedByteArray,
            Variant::PackedInt32Array(_) => VariantType::PackedInt32Array,
            Variant::PackedInt64Array(_) => VariantType::PackedInt64Array,
            Variant::PackedFloat32Array(_) => VariantType::PackedFloat32Array,
            Variant::PackedFloat64Array(_) => VariantType::PackedFloat64Array,
            Variant::PackedStringArray(_) => VariantType::PackedStringArray,
            Variant::PackedVector2Array(_) => VariantType::PackedVector2Array,
            Variant::PackedVector3Array(_) => VariantType::PackedVector3Array,
            Variant::PackedColorArray(_) => VariantType::PackedColorArray,
            Variant::PackedVector4Array(_) => VariantType::PackedVector4Array,
        }
    }

    pub fn object(object: Object) -> Self {
        Variant::Object(Some(Box::new(object)))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) | Variant::StringName(s) => Some(s),
            _ => None,
        }
    }

    /// Copy of this value with every negative float zero made positive.
    ///
    /// `-0.0 == 0.0`, so the result compares equal to `self` but encodes
    /// to the same bytes as any other value equal to it (NaN aside).
    pub fn with_unsigned_zeros(&self) -> Variant {
        ensure_sufficient_stack(|| match self {
            Variant::Float(f) => Variant::Float(f + 0.0),
            Variant::Vector2(v) => Variant::Vector2(unsigned_components::<_, 2>(v)),
            Variant::Rect2(v) => Variant::Rect2(unsigned_components::<_, 4>(v)),
            Variant::Vector3(v) => Variant::Vector3(unsigned_components::<_, 3>(v)),
            Variant::Transform2D(v) => Variant::Transform2D(unsigned_components::<_, 6>(v)),
            Variant::Vector4(v) => Variant::Vector4(unsigned_components::<_, 4>(v)),
            Variant::Plane(v) => Variant::Plane(unsigned_components::<_, 4>(v)),
            Variant::Quaternion(v) => Variant::Quaternion(unsigned_components::<_, 4>(v)),
            Variant::Aabb(v) => Variant::Aabb(unsigned_components::<_, 6>(v)),
            Variant::Basis(v) => Variant::Basis(unsigned_components::<_, 9>(v)),
            Variant::Transform3D(v) => Variant::Transform3D(unsigned_components::<_, 12>(v)),
            Variant::Projection(v) => Variant::Projection(unsigned_components::<_, 16>(v)),
            Variant::Color(c) => Variant::Color(unsigned_color(*c)),
            Variant::Dictionary(pairs) => Variant::Dictionary(
                pairs
                    .iter()
                    .map(|(k, v)| (k.with_unsigned_zeros(), v.with_unsigned_zeros()))
                    .collect(),
            ),
            Variant::Array(array) => Variant::Array(Array {
                element_type: array.element_type.clone(),
                elements: array
                    .elements
                    .iter()
                    .map(Variant::with_unsigned_zeros)
                    .collect(),
            }),
            Variant::PackedFloat32Array(values) => {
                Variant::PackedFloat32Array(values.iter().map(|f| f + 0.0).collect())
            }
            Variant::PackedFloat64Array(values) => {
                Variant::PackedFloat64Array(values.iter().map(|f| f + 0.0).collect())
            }
            Variant::PackedVector2Array(values) => Variant::PackedVector2Array(
                values.iter().map(unsigned_components::<_, 2>).collect(),
            ),
            Variant::PackedVector3Array(values) => Variant::PackedVector3Array(
                values.iter().map(unsigned_components::<_, 3>).collect(),
            ),
            Variant::PackedColorArray(values) => {
                Variant::PackedColorArray(values.iter().copied().map(unsigned_color).collect())
            }
            Variant::PackedVector4Array(values) => Variant::PackedVector4Array(
                values.iter().map(unsigned_components::<_, 4>).collect(),
            ),
            other => other.clone(),
        })
    }
}

// IEEE addition rounds `-0.0 + 0.0` to `+0.0` and leaves every other value alone.
fn unsigned_components<T: RealComponents<N>, const N: usize>(value: &T) -> T {
    T::from_components(value.to_components().map(|c| c + 0.0))
}

fn unsigned_color(color: Color) -> Color {
    Color::from_components(color.to_components().map(|c| c + 0.0))
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Bool(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Int(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::Int(i64::from(value))
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Float(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_owned())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl From<Array> for Variant {
    fn from(value: Array) -> Self {
        Variant::Array(value)
    }
}
