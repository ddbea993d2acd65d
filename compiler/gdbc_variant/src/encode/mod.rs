//! Value encoder.
//!
//! Every encoded value is a 4-byte [`Header`] followed by a type-specific
//! payload. All lengths are padded so each encoded value, nested or not,
//! occupies a multiple of 4 bytes.
//!
//! Width rules:
//! - `int`: 4 bytes unless the value is outside the `i32` range.
//! - `float`: 4 bytes unless the value changes after a trip through `f32`.
//! - Real aggregates: fixed by the build's [`Real`] width.
//! - `Color`: always four `f32`s.

use crate::header::{real_width_flags, ArrayTyping, Header, HeaderFlags};
use crate::math::{Real, RealComponents};
use crate::stack::ensure_sufficient_stack;
use crate::value::{Array, ElementType, Object, ScriptRef, Variant, ENCODED_OBJECT_ID_CLASS};
use crate::{EncodeError, VariantType, MAX_RECURSION_DEPTH};

/// How object values are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObjectMode {
    /// Any non-null object is an error. Used for persisted constants.
    #[default]
    Reject,
    /// Objects are reduced to their instance id.
    AsId,
    /// Objects are flattened to their storage property list.
    Full,
}

/// Encode `value` into a fresh buffer.
pub fn encode_variant(value: &Variant, objects: ObjectMode) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    encode_variant_into(value, objects, &mut out)?;
    Ok(out)
}

/// Append the encoding of `value` to `out`, returning the number of bytes
/// written. On error `out` is left exactly as it was.
pub fn encode_variant_into(
    value: &Variant,
    objects: ObjectMode,
    out: &mut Vec<u8>,
) -> Result<usize, EncodeError> {
    let start = out.len();
    let mut encoder = Encoder {
        out: &mut *out,
        base: start,
        objects,
    };
    match encoder.child(value, 0) {
        Ok(()) => Ok(out.len() - start),
        Err(err) => {
            out.truncate(start);
            Err(err)
        }
    }
}

/// Number of bytes `value` encodes to.
pub fn encoded_len(value: &Variant, objects: ObjectMode) -> Result<usize, EncodeError> {
    let mut scratch = Vec::new();
    encode_variant_into(value, objects, &mut scratch)
}

fn len_u32(what: &'static str, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooLarge { what, len })
}

fn validated_script_path(script: &ScriptRef) -> Result<&str, EncodeError> {
    if script.is_resource_path() {
        Ok(&script.path)
    } else {
        Err(EncodeError::InvalidScriptPath {
            path: script.path.clone(),
        })
    }
}

struct Encoder<'a> {
    out: &'a mut Vec<u8>,
    /// Start of the top-level value; padding is relative to it.
    base: usize,
    objects: ObjectMode,
}

impl Encoder<'_> {
    // === Primitives ===

    #[inline]
    fn u32(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    #[inline]
    fn i32(&mut self, v: i32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    #[inline]
    fn u64(&mut self, v: u64) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    #[inline]
    fn i64(&mut self, v: i64) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    #[inline]
    fn f32(&mut self, v: f32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    #[inline]
    fn f64(&mut self, v: f64) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    #[inline]
    fn real(&mut self, v: Real) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn reals<const N: usize>(&mut self, value: &impl RealComponents<N>) {
        for c in value.to_components() {
            self.real(c);
        }
    }

    fn pad(&mut self) {
        while (self.out.len() - self.base) % 4 != 0 {
            self.out.push(0);
        }
    }

    fn count(&mut self, what: &'static str, len: usize) -> Result<(), EncodeError> {
        let len = len_u32(what, len)?;
        self.u32(len);
        Ok(())
    }

    /// Length-prefixed UTF-8, zero-padded to 4 bytes. The length counts the
    /// unpadded bytes.
    fn string(&mut self, s: &str) -> Result<(), EncodeError> {
        self.count("string", s.len())?;
        self.out.extend_from_slice(s.as_bytes());
        self.pad();
        Ok(())
    }

    // === Values ===

    /// Encode a nested value and check it stayed aligned.
    fn child(&mut self, value: &Variant, depth: usize) -> Result<(), EncodeError> {
        let start = self.out.len();
        self.value(value, depth)?;
        let len = self.out.len() - start;
        if len % 4 != 0 {
            return Err(EncodeError::Misaligned {
                ty: value.get_type(),
                len,
            });
        }
        Ok(())
    }

    fn value(&mut self, value: &Variant, depth: usize) -> Result<(), EncodeError> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(EncodeError::DepthExceeded { depth });
        }
        ensure_sufficient_stack(|| self.value_at(value, depth))
    }

    fn header_flags(&self, value: &Variant) -> Result<HeaderFlags, EncodeError> {
        let mut flags = real_width_flags(value.get_type());
        match value {
            Variant::Int(v) if i32::try_from(*v).is_err() => flags |= HeaderFlags::FLAG_64,
            #[allow(clippy::cast_possible_truncation, reason = "narrowing is the probe")]
            Variant::Float(d) if f64::from(*d as f32) != *d => flags |= HeaderFlags::FLAG_64,
            Variant::Object(Some(_)) => match self.objects {
                ObjectMode::Reject => return Err(EncodeError::ObjectNotAllowed),
                ObjectMode::AsId => flags |= HeaderFlags::OBJECT_AS_ID,
                ObjectMode::Full => {}
            },
            Variant::Array(array) => flags |= self.array_typing(array).flags(),
            _ => {}
        }
        Ok(flags)
    }

    fn array_typing(&self, array: &Array) -> ArrayTyping {
        match array.element_type {
            ElementType::Untyped => ArrayTyping::None,
            ElementType::Builtin(_) => ArrayTyping::Builtin,
            ElementType::ClassName(_) => ArrayTyping::ClassName,
            ElementType::Script(_) if self.objects == ObjectMode::Full => ArrayTyping::Script,
            ElementType::Script(_) => ArrayTyping::ClassName,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        reason = "width flags guarantee the narrowed value is exact"
    )]
    fn value_at(&mut self, value: &Variant, depth: usize) -> Result<(), EncodeError> {
        // A null object is stored as nil, with no payload.
        if let Variant::Object(None) = value {
            self.u32(VariantType::Nil.as_u32());
            return Ok(());
        }

        let flags = self.header_flags(value)?;
        let header = Header::new(value.get_type(), flags);
        self.u32(header.to_word());

        match value {
            Variant::Nil | Variant::Callable => {}
            Variant::Bool(b) => self.u32(u32::from(*b)),
            Variant::Int(v) => {
                if header.is_64() {
                    self.i64(*v);
                } else {
                    self.i32(*v as i32);
                }
            }
            Variant::Float(v) => {
                if header.is_64() {
                    self.f64(*v);
                } else {
                    self.f32(*v as f32);
                }
            }
            Variant::String(s) | Variant::StringName(s) => self.string(s)?,

            Variant::Vector2(v) => self.reals::<2>(v),
            Variant::Vector2i(v) => {
                self.i32(v.x);
                self.i32(v.y);
            }
            Variant::Rect2(v) => self.reals::<4>(v),
            Variant::Rect2i(v) => {
                for c in [v.position.x, v.position.y, v.size.x, v.size.y] {
                    self.i32(c);
                }
            }
            Variant::Vector3(v) => self.reals::<3>(v),
            Variant::Vector3i(v) => {
                for c in [v.x, v.y, v.z] {
                    self.i32(c);
                }
            }
            Variant::Transform2D(v) => self.reals::<6>(v),
            Variant::Vector4(v) => self.reals::<4>(v),
            Variant::Vector4i(v) => {
                for c in [v.x, v.y, v.z, v.w] {
                    self.i32(c);
                }
            }
            Variant::Plane(v) => self.reals::<4>(v),
            Variant::Quaternion(v) => self.reals::<4>(v),
            Variant::Aabb(v) => self.reals::<6>(v),
            Variant::Basis(v) => self.reals::<9>(v),
            Variant::Transform3D(v) => self.reals::<12>(v),
            Variant::Projection(v) => self.reals::<16>(v),
            Variant::Color(c) => {
                for f in c.to_components() {
                    self.f32(f);
                }
            }

            Variant::NodePath(path) => {
                let names = len_u32("node path", path.names.len())?;
                self.u32(names | 0x8000_0000);
                self.count("node path", path.subnames.len())?;
                self.u32(u32::from(path.absolute));
                for name in path.names.iter().chain(&path.subnames) {
                    self.string(name)?;
                }
            }
            Variant::Rid(id) => self.u64(*id),
            Variant::Object(Some(object)) => {
                if self.objects == ObjectMode::Full {
                    self.object_snapshot(object, depth)?;
                } else {
                    self.u64(object.instance_id);
                }
            }
            Variant::Object(None) => {}
            Variant::Signal(signal) => {
                self.string(&signal.name)?;
                self.u64(signal.object_id);
            }
            Variant::Dictionary(pairs) => {
                self.count("dictionary", pairs.len())?;
                for (key, value) in pairs {
                    self.child(key, depth + 1)?;
                    self.child(value, depth + 1)?;
                }
            }
            Variant::Array(array) => self.array(array, depth)?,

            Variant::PackedByteArray(data) => {
                self.count("packed array", data.len())?;
                self.out.extend_from_slice(data);
                self.pad();
            }
            Variant::PackedInt32Array(data) => {
                self.count("packed array", data.len())?;
                for v in data {
                    self.i32(*v);
                }
            }
            Variant::PackedInt64Array(data) => {
                self.count("packed array", data.len())?;
                for v in data {
                    self.i64(*v);
                }
            }
            Variant::PackedFloat32Array(data) => {
                self.count("packed array", data.len())?;
                for v in data {
                    self.f32(*v);
                }
            }
            Variant::PackedFloat64Array(data) => {
                self.count("packed array", data.len())?;
                for v in data {
                    self.f64(*v);
                }
            }
            Variant::PackedStringArray(data) => {
                self.count("packed array", data.len())?;
                for s in data {
                    // Length includes the NUL terminator, which is written.
                    self.count("string", s.len() + 1)?;
                    self.out.extend_from_slice(s.as_bytes());
                    self.out.push(0);
                    self.pad();
                }
            }
            Variant::PackedVector2Array(data) => {
                self.count("packed array", data.len())?;
                for v in data {
                    self.reals::<2>(v);
                }
            }
            Variant::PackedVector3Array(data) => {
                self.count("packed array", data.len())?;
                for v in data {
                    self.reals::<3>(v);
                }
            }
            Variant::PackedColorArray(data) => {
                self.count("packed array", data.len())?;
                for c in data {
                    for f in c.to_components() {
                        self.f32(f);
                    }
                }
            }
            Variant::PackedVector4Array(data) => {
                self.count("packed array", data.len())?;
                for v in data {
                    self.reals::<4>(v);
                }
            }
        }
        Ok(())
    }

    fn array(&mut self, array: &Array, depth: usize) -> Result<(), EncodeError> {
        let full = self.objects == ObjectMode::Full;
        match &array.element_type {
            ElementType::Untyped => {}
            ElementType::Builtin(ty) => self.u32(ty.as_u32()),
            ElementType::ClassName(name) => {
                self.string(if full { name.as_str() } else { ENCODED_OBJECT_ID_CLASS })?;
            }
            ElementType::Script(script) => {
                if full {
                    let path = validated_script_path(script)?;
                    self.string(path)?;
                } else {
                    self.string(ENCODED_OBJECT_ID_CLASS)?;
                }
            }
        }

        self.count("array", array.len())?;
        for element in &array.elements {
            self.child(element, depth + 1)?;
        }
        Ok(())
    }

    fn object_snapshot(&mut self, object: &Object, depth: usize) -> Result<(), EncodeError> {
        if !object.instantiable {
            return Err(EncodeError::ObjectNotInstantiable {
                class: object.class_name.clone(),
            });
        }
        self.string(&object.class_name)?;
        self.count("property list", object.storage_properties().count())?;

        tracing::trace!(
            class = %object.class_name,
            depth,
            "encoding full object snapshot"
        );

        for property in object.storage_properties() {
            self.string(&property.name)?;

            if property.name == crate::value::SCRIPT_PROPERTY {
                let script_value = match &object.script {
                    Some(script) => Variant::String(validated_script_path(script)?.to_owned()),
                    None => Variant::Nil,
                };
                self.child(&script_value, depth + 1)?;
            } else {
                self.child(&property.value, depth + 1)?;
            }
        }
        Ok(())
    }
}
