//! Value decoder, the structural mirror of [`encode`](crate::encode).
//!
//! Widths are read from the header flags, so a buffer written by a
//! double-precision build decodes in a single-precision build (with the
//! usual narrowing) and vice versa.

use std::cmp;

use crate::header::{ArrayTyping, Header, HeaderFlags};
use crate::math::{
    Color, Real, RealComponents, Rect2i, Vector2, Vector2i, Vector3, Vector3i, Vector4, Vector4i,
};
use crate::stack::ensure_sufficient_stack;
use crate::value::{
    Array, ElementType, NodePath, Object, Property, ScriptRef, Signal, Variant, SCRIPT_PROPERTY,
};
use crate::{DecodeError, VariantType, MAX_RECURSION_DEPTH};

/// Decode one value from the start of `data`.
///
/// Returns the value and the number of bytes it occupied. Object payloads
/// are refused unless `allow_objects` is set.
pub fn decode_variant(data: &[u8], allow_objects: bool) -> Result<(Variant, usize), DecodeError> {
    let mut decoder = Decoder {
        data,
        pos: 0,
        allow_objects,
    };
    let value = decoder.value(0)?;
    Ok((value, decoder.pos))
}

struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    allow_objects: bool,
}

fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

impl<'a> Decoder<'a> {
    // === Primitives ===

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::UnexpectedEnd {
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        self.array().map(u32::from_le_bytes)
    }

    fn i32(&mut self) -> Result<i32, DecodeError> {
        self.array().map(i32::from_le_bytes)
    }

    fn u64(&mut self) -> Result<u64, DecodeError> {
        self.array().map(u64::from_le_bytes)
    }

    fn i64(&mut self) -> Result<i64, DecodeError> {
        self.array().map(i64::from_le_bytes)
    }

    fn f32(&mut self) -> Result<f32, DecodeError> {
        self.array().map(f32::from_le_bytes)
    }

    fn f64(&mut self) -> Result<f64, DecodeError> {
        self.array().map(f64::from_le_bytes)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::unnecessary_cast,
        reason = "narrowing a 64-bit payload into a single-precision build"
    )]
    fn real(&mut self, wide: bool) -> Result<Real, DecodeError> {
        if wide {
            Ok(self.f64()? as Real)
        } else {
            Ok(Real::from(self.f32()?))
        }
    }

    fn reals<T: RealComponents<N>, const N: usize>(&mut self, wide: bool) -> Result<T, DecodeError> {
        let mut c: [Real; N] = [0.0; N];
        for slot in &mut c {
            *slot = self.real(wide)?;
        }
        Ok(T::from_components(c))
    }

    fn color(&mut self) -> Result<Color, DecodeError> {
        Ok(Color::from_components([
            self.f32()?,
            self.f32()?,
            self.f32()?,
            self.f32()?,
        ]))
    }

    fn count(&mut self) -> Result<usize, DecodeError> {
        Ok(self.u32()? as usize)
    }

    /// Capacity hint for a count read from untrusted data: never more
    /// elements than could possibly fit in the remaining bytes.
    fn capacity(&self, count: usize, min_elem_size: usize) -> usize {
        cmp::min(count, self.remaining() / min_elem_size)
    }

    fn utf8(bytes: &[u8]) -> Result<String, DecodeError> {
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8)
    }

    fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.count()?;
        let bytes = self.take(len)?;
        self.take(padding(len))?;
        Self::utf8(bytes)
    }

    // === Values ===

    fn value(&mut self, depth: usize) -> Result<Variant, DecodeError> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(DecodeError::DepthExceeded { depth });
        }
        ensure_sufficient_stack(|| self.value_at(depth))
    }

    fn value_at(&mut self, depth: usize) -> Result<Variant, DecodeError> {
        let header = Header::from_word(self.u32()?);
        let ty = VariantType::from_u32(header.raw_type)
            .ok_or(DecodeError::UnknownType(header.raw_type))?;
        let wide = header.is_64();

        let value = match ty {
            VariantType::Nil => Variant::Nil,
            VariantType::Bool => Variant::Bool(self.u32()? != 0),
            VariantType::Int => Variant::Int(if wide {
                self.i64()?
            } else {
                i64::from(self.i32()?)
            }),
            VariantType::Float => Variant::Float(if wide {
                self.f64()?
            } else {
                f64::from(self.f32()?)
            }),
            VariantType::String => Variant::String(self.string()?),
            VariantType::StringName => Variant::StringName(self.string()?),

            VariantType::Vector2 => Variant::Vector2(self.reals::<_, 2>(wide)?),
            VariantType::Vector2i => Variant::Vector2i(Vector2i {
                x: self.i32()?,
                y: self.i32()?,
            }),
            VariantType::Rect2 => Variant::Rect2(self.reals::<_, 4>(wide)?),
            VariantType::Rect2i => Variant::Rect2i(Rect2i {
                position: Vector2i {
                    x: self.i32()?,
                    y: self.i32()?,
                },
                size: Vector2i {
                    x: self.i32()?,
                    y: self.i32()?,
                },
            }),
            VariantType::Vector3 => Variant::Vector3(self.reals::<_, 3>(wide)?),
            VariantType::Vector3i => Variant::Vector3i(Vector3i {
                x: self.i32()?,
                y: self.i32()?,
                z: self.i32()?,
            }),
            VariantType::Transform2D => Variant::Transform2D(self.reals::<_, 6>(wide)?),
            VariantType::Vector4 => Variant::Vector4(self.reals::<_, 4>(wide)?),
            VariantType::Vector4i => Variant::Vector4i(Vector4i {
                x: self.i32()?,
                y: self.i32()?,
                z: self.i32()?,
                w: self.i32()?,
            }),
            VariantType::Plane => Variant::Plane(self.reals::<_, 4>(wide)?),
            VariantType::Quaternion => Variant::Quaternion(self.reals::<_, 4>(wide)?),
            VariantType::Aabb => Variant::Aabb(self.reals::<_, 6>(wide)?),
            VariantType::Basis => Variant::Basis(self.reals::<_, 9>(wide)?),
            VariantType::Transform3D => Variant::Transform3D(self.reals::<_, 12>(wide)?),
            VariantType::Projection => Variant::Projection(self.reals::<_, 16>(wide)?),
            VariantType::Color => Variant::Color(self.color()?),

            VariantType::NodePath => Variant::NodePath(self.node_path()?),
            VariantType::Rid => Variant::Rid(self.u64()?),
            VariantType::Object => self.object(header.flags, depth)?,
            VariantType::Callable => Variant::Callable,
            VariantType::Signal => Variant::Signal(Signal {
                name: self.string()?,
                object_id: self.u64()?,
            }),
            VariantType::Dictionary => {
                let count = self.count()?;
                let mut pairs = Vec::with_capacity(self.capacity(count, 8));
                for _ in 0..count {
                    let key = self.value(depth + 1)?;
                    let value = self.value(depth + 1)?;
                    pairs.push((key, value));
                }
                Variant::Dictionary(pairs)
            }
            VariantType::Array => Variant::Array(self.array_value(header.flags, depth)?),

            VariantType::PackedByteArray => {
                let len = self.count()?;
                let bytes = self.take(len)?.to_vec();
                self.take(padding(len))?;
                Variant::PackedByteArray(bytes)
            }
            VariantType::PackedInt32Array => {
                Variant::PackedInt32Array(self.packed(4, Self::i32)?)
            }
            VariantType::PackedInt64Array => {
                Variant::PackedInt64Array(self.packed(8, Self::i64)?)
            }
            VariantType::PackedFloat32Array => {
                Variant::PackedFloat32Array(self.packed(4, Self::f32)?)
            }
            VariantType::PackedFloat64Array => {
                Variant::PackedFloat64Array(self.packed(8, Self::f64)?)
            }
            VariantType::PackedStringArray => {
                Variant::PackedStringArray(self.packed(4, Self::terminated_string)?)
            }
            VariantType::PackedVector2Array => {
                Variant::PackedVector2Array(self.packed(8, |d| d.reals::<Vector2, 2>(wide))?)
            }
            VariantType::PackedVector3Array => {
                Variant::PackedVector3Array(self.packed(12, |d| d.reals::<Vector3, 3>(wide))?)
            }
            VariantType::PackedColorArray => {
                Variant::PackedColorArray(self.packed(16, Self::color)?)
            }
            VariantType::PackedVector4Array => {
                Variant::PackedVector4Array(self.packed(16, |d| d.reals::<Vector4, 4>(wide))?)
            }
        };
        Ok(value)
    }

    fn packed<T>(
        &mut self,
        elem_size: usize,
        mut read: impl FnMut(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let count = self.count()?;
        let mut out = Vec::with_capacity(self.capacity(count, elem_size));
        for _ in 0..count {
            out.push(read(self)?);
        }
        Ok(out)
    }

    /// Packed-string-array element: the length includes a NUL terminator.
    fn terminated_string(&mut self) -> Result<String, DecodeError> {
        let len = self.count()?;
        let bytes = self.take(len)?;
        self.take(padding(len))?;
        let text = match bytes.split_last() {
            Some((0, rest)) => rest,
            _ => bytes,
        };
        Self::utf8(text)
    }

    fn node_path(&mut self) -> Result<NodePath, DecodeError> {
        let names = (self.u32()? & 0x7FFF_FFFF) as usize;
        let subnames = self.count()?;
        let flags = self.u32()?;

        let mut path = NodePath {
            names: Vec::with_capacity(self.capacity(names, 4)),
            subnames: Vec::with_capacity(self.capacity(subnames, 4)),
            absolute: flags & 1 != 0,
        };
        for _ in 0..names {
            path.names.push(self.string()?);
        }
        for _ in 0..subnames {
            path.subnames.push(self.string()?);
        }
        Ok(path)
    }

    fn object(&mut self, flags: HeaderFlags, depth: usize) -> Result<Variant, DecodeError> {
        if !self.allow_objects {
            return Err(DecodeError::ObjectNotAllowed);
        }

        if flags.contains(HeaderFlags::OBJECT_AS_ID) {
            let id = self.u64()?;
            if id == 0 {
                return Ok(Variant::Object(None));
            }
            return Ok(Variant::object(Object::encoded_id(id)));
        }

        let class_name = self.string()?;
        if class_name.is_empty() {
            return Ok(Variant::Object(None));
        }

        let mut object = Object::new(class_name, 0);
        let count = self.count()?;
        for _ in 0..count {
            let name = self.string()?;
            let value = self.value(depth + 1)?;
            if name == SCRIPT_PROPERTY {
                if let Variant::String(path) = value {
                    object.script = Some(ScriptRef::new(path));
                }
                object.properties.push(Property::stored(name, Variant::Nil));
            } else {
                object.properties.push(Property::stored(name, value));
            }
        }
        Ok(Variant::object(object))
    }

    fn array_value(&mut self, flags: HeaderFlags, depth: usize) -> Result<Array, DecodeError> {
        let element_type = match ArrayTyping::from_flags(flags) {
            ArrayTyping::None => ElementType::Untyped,
            ArrayTyping::Builtin => {
                let raw = self.u32()?;
                let ty = VariantType::from_u32(raw).ok_or(DecodeError::InvalidArrayType(raw))?;
                ElementType::Builtin(ty)
            }
            ArrayTyping::ClassName => ElementType::ClassName(self.string()?),
            ArrayTyping::Script => ElementType::Script(ScriptRef::new(self.string()?)),
        };

        let count = self.count()?;
        let mut elements = Vec::with_capacity(self.capacity(count, 4));
        for _ in 0..count {
            elements.push(self.value(depth + 1)?);
        }
        Ok(Array {
            element_type,
            elements,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
