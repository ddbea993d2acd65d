//! Type tags for the dynamic value model.

use std::fmt;

/// Discriminant of a [`Variant`](crate::Variant), as stored in the low byte
/// of every encoded value header.
///
/// The numbering is part of the wire format and must never be reordered.
///
/// | Range | Category                  |
/// |-------|---------------------------|
/// | 0-4   | Scalars and strings       |
/// | 5-19  | Fixed-shape math types    |
/// | 20-28 | Misc, object, containers  |
/// | 29-38 | Packed arrays             |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum VariantType {
    Nil = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,

    Vector2 = 5,
    Vector2i = 6,
    Rect2 = 7,
    Rect2i = 8,
    Vector3 = 9,
    Vector3i = 10,
    Transform2D = 11,
    Vector4 = 12,
    Vector4i = 13,
    Plane = 14,
    Quaternion = 15,
    Aabb = 16,
    Basis = 17,
    Transform3D = 18,
    Projection = 19,

    Color = 20,
    StringName = 21,
    NodePath = 22,
    Rid = 23,
    Object = 24,
    Callable = 25,
    Signal = 26,
    Dictionary = 27,
    Array = 28,

    PackedByteArray = 29,
    PackedInt32Array = 30,
    PackedInt64Array = 31,
    PackedFloat32Array = 32,
    PackedFloat64Array = 33,
    PackedStringArray = 34,
    PackedVector2Array = 35,
    PackedVector3Array = 36,
    PackedColorArray = 37,
    PackedVector4Array = 38,
}

impl VariantType {
    /// Number of defined type tags.
    pub const COUNT: u32 = 39;

    const ALL: [VariantType; Self::COUNT as usize] = [
        VariantType::Nil,
        VariantType::Bool,
        VariantType::Int,
        VariantType::Float,
        VariantType::String,
        VariantType::Vector2,
        VariantType::Vector2i,
        VariantType::Rect2,
        VariantType::Rect2i,
        VariantType::Vector3,
        VariantType::Vector3i,
        VariantType::Transform2D,
        VariantType::Vector4,
        VariantType::Vector4i,
        VariantType::Plane,
        VariantType::Quaternion,
        VariantType::Aabb,
        VariantType::Basis,
        VariantType::Transform3D,
        VariantType::Projection,
        VariantType::Color,
        VariantType::StringName,
        VariantType::NodePath,
        VariantType::Rid,
        VariantType::Object,
        VariantType::Callable,
        VariantType::Signal,
        VariantType::Dictionary,
        VariantType::Array,
        VariantType::PackedByteArray,
        VariantType::PackedInt32Array,
        VariantType::PackedInt64Array,
        VariantType::PackedFloat32Array,
        VariantType::PackedFloat64Array,
        VariantType::PackedStringArray,
        VariantType::PackedVector2Array,
        VariantType::PackedVector3Array,
        VariantType::PackedColorArray,
        VariantType::PackedVector4Array,
    ];

    /// Look up a tag by its wire value.
    #[inline]
    pub fn from_u32(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Wire value of this tag.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Whether values of this type are built from the build-configured
    /// `Real` width (and therefore carry the 64-bit flag in double builds).
    pub const fn is_real_aggregate(self) -> bool {
        matches!(
            self,
            VariantType::Vector2
                | VariantType::Vector3
                | VariantType::Vector4
                | VariantType::PackedVector2Array
                | VariantType::PackedVector3Array
                | VariantType::PackedVector4Array
                | VariantType::Transform2D
                | VariantType::Transform3D
                | VariantType::Projection
                | VariantType::Quaternion
                | VariantType::Plane
                | VariantType::Basis
                | VariantType::Rect2
                | VariantType::Aabb
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            VariantType::Nil => "Nil",
            VariantType::Bool => "bool",
            VariantType::Int => "int",
            VariantType::Float => "float",
            VariantType::String => "String",
            VariantType::Vector2 => "Vector2",
            VariantType::Vector2i => "Vector2i",
            VariantType::Rect2 => "Rect2",
            VariantType::Rect2i => "Rect2i",
            VariantType::Vector3 => "Vector3",
            VariantType::Vector3i => "Vector3i",
            VariantType::Transform2D => "Transform2D",
            VariantType::Vector4 => "Vector4",
            VariantType::Vector4i => "Vector4i",
            VariantType::Plane => "Plane",
            VariantType::Quaternion => "Quaternion",
            VariantType::Aabb => "AABB",
            VariantType::Basis => "Basis",
            VariantType::Transform3D => "Transform3D",
            VariantType::Projection => "Projection",
            VariantType::Color => "Color",
            VariantType::StringName => "StringName",
            VariantType::NodePath => "NodePath",
            VariantType::Rid => "RID",
            VariantType::Object => "Object",
            VariantType::Callable => "Callable",
            VariantType::Signal => "Signal",
            VariantType::Dictionary => "Dictionary",
            VariantType::Array => "Array",
            VariantType::PackedByteArray => "PackedByteArray",
            VariantType::PackedInt32Array => "PackedInt32Array",
            VariantType::PackedInt64Array => "PackedInt64Array",
            VariantType::PackedFloat32Array => "PackedFloat32Array",
            VariantType::PackedFloat64Array => "PackedFloat64Array",
            VariantType::PackedStringArray => "PackedStringArray",
            VariantType::PackedVector2Array => "PackedVector2Array",
            VariantType::PackedVector3Array => "PackedVector3Array",
            VariantType::PackedColorArray => "PackedColorArray",
            VariantType::PackedVector4Array => "PackedVector4Array",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
