//! Fixed-shape numeric aggregates carried by [`Variant`](crate::Variant).
//!
//! Real-valued types are built on [`Real`], whose width is a build-time
//! choice (`double-precision` feature). Integer vectors are always 32-bit and
//! [`Color`] is always single precision.

/// Floating-point width used by real-valued aggregates.
#[cfg(not(feature = "double-precision"))]
pub type Real = f32;

/// Floating-point width used by real-valued aggregates.
#[cfg(feature = "double-precision")]
pub type Real = f64;

/// Flat view of a real-valued aggregate, in wire order.
pub trait RealComponents<const N: usize>: Sized {
    fn to_components(&self) -> [Real; N];
    fn from_components(c: [Real; N]) -> Self;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: Real,
    pub y: Real,
}

impl Vector2 {
    pub const fn new(x: Real, y: Real) -> Self {
        Vector2 { x, y }
    }
}

impl RealComponents<2> for Vector2 {
    fn to_components(&self) -> [Real; 2] {
        [self.x, self.y]
    }

    fn from_components([x, y]: [Real; 2]) -> Self {
        Vector2 { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: Real,
    pub y: Real,
    pub z: Real,
}

impl Vector3 {
    pub const fn new(x: Real, y: Real, z: Real) -> Self {
        Vector3 { x, y, z }
    }
}

impl RealComponents<3> for Vector3 {
    fn to_components(&self) -> [Real; 3] {
        [self.x, self.y, self.z]
    }

    fn from_components([x, y, z]: [Real; 3]) -> Self {
        Vector3 { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector4 {
    pub x: Real,
    pub y: Real,
    pub z: Real,
    pub w: Real,
}

impl Vector4 {
    pub const fn new(x: Real, y: Real, z: Real, w: Real) -> Self {
        Vector4 { x, y, z, w }
    }
}

impl RealComponents<4> for Vector4 {
    fn to_components(&self) -> [Real; 4] {
        [self.x, self.y, self.z, self.w]
    }

    fn from_components([x, y, z, w]: [Real; 4]) -> Self {
        Vector4 { x, y, z, w }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector2i {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector4i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect2 {
    pub position: Vector2,
    pub size: Vector2,
}

impl RealComponents<4> for Rect2 {
    fn to_components(&self) -> [Real; 4] {
        [self.position.x, self.position.y, self.size.x, self.size.y]
    }

    fn from_components([px, py, sx, sy]: [Real; 4]) -> Self {
        Rect2 {
            position: Vector2::new(px, py),
            size: Vector2::new(sx, sy),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect2i {
    pub position: Vector2i,
    pub size: Vector2i,
}

/// 2D affine transform stored as three column vectors (x axis, y axis, origin).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform2D {
    pub columns: [Vector2; 3],
}

impl RealComponents<6> for Transform2D {
    fn to_components(&self) -> [Real; 6] {
        let [a, b, c] = self.columns;
        [a.x, a.y, b.x, b.y, c.x, c.y]
    }

    fn from_components(c: [Real; 6]) -> Self {
        Transform2D {
            columns: [
                Vector2::new(c[0], c[1]),
                Vector2::new(c[2], c[3]),
                Vector2::new(c[4], c[5]),
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: Vector3,
    pub d: Real,
}

impl RealComponents<4> for Plane {
    fn to_components(&self) -> [Real; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.d]
    }

    fn from_components([x, y, z, d]: [Real; 4]) -> Self {
        Plane {
            normal: Vector3::new(x, y, z),
            d,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub x: Real,
    pub y: Real,
    pub z: Real,
    pub w: Real,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl RealComponents<4> for Quaternion {
    fn to_components(&self) -> [Real; 4] {
        [self.x, self.y, self.z, self.w]
    }

    fn from_components([x, y, z, w]: [Real; 4]) -> Self {
        Quaternion { x, y, z, w }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub position: Vector3,
    pub size: Vector3,
}

impl RealComponents<6> for Aabb {
    fn to_components(&self) -> [Real; 6] {
        let (p, s) = (self.position, self.size);
        [p.x, p.y, p.z, s.x, s.y, s.z]
    }

    fn from_components(c: [Real; 6]) -> Self {
        Aabb {
            position: Vector3::new(c[0], c[1], c[2]),
            size: Vector3::new(c[3], c[4], c[5]),
        }
    }
}

/// 3x3 matrix stored row-major.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub rows: [Vector3; 3],
}

impl Default for Basis {
    fn default() -> Self {
        Basis {
            rows: [
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ],
        }
    }
}

impl RealComponents<9> for Basis {
    fn to_components(&self) -> [Real; 9] {
        let [a, b, c] = self.rows;
        [a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z]
    }

    fn from_components(c: [Real; 9]) -> Self {
        Basis {
            rows: [
                Vector3::new(c[0], c[1], c[2]),
                Vector3::new(c[3], c[4], c[5]),
                Vector3::new(c[6], c[7], c[8]),
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform3D {
    pub basis: Basis,
    pub origin: Vector3,
}

impl RealComponents<12> for Transform3D {
    fn to_components(&self) -> [Real; 12] {
        let b = self.basis.to_components();
        let o = self.origin;
        [
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], o.x, o.y, o.z,
        ]
    }

    fn from_components(c: [Real; 12]) -> Self {
        Transform3D {
            basis: Basis::from_components([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7], c[8]]),
            origin: Vector3::new(c[9], c[10], c[11]),
        }
    }
}

/// 4x4 matrix stored as four column vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Projection {
    pub columns: [Vector4; 4],
}

impl RealComponents<16> for Projection {
    fn to_components(&self) -> [Real; 16] {
        let mut out = [0.0; 16];
        for (i, column) in self.columns.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&column.to_components());
        }
        out
    }

    fn from_components(c: [Real; 16]) -> Self {
        let column = |i: usize| Vector4::new(c[i * 4], c[i * 4 + 1], c[i * 4 + 2], c[i * 4 + 3]);
        Projection {
            columns: [column(0), column(1), column(2), column(3)],
        }
    }
}

/// RGBA color, always single precision regardless of [`Real`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    pub(crate) fn to_components(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub(crate) fn from_components([r, g, b, a]: [f32; 4]) -> Self {
        Color { r, g, b, a }
    }
}
