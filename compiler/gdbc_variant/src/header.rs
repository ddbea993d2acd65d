//! The 4-byte header that starts every encoded value.
//!
//! Byte 0 is the [`VariantType`] tag, byte 1 is unused, and bits 16 and up
//! carry per-type flags.

use bitflags::bitflags;

use crate::VariantType;

/// Mask selecting the type tag from a header word.
pub const HEADER_TYPE_MASK: u32 = 0xFF;

bitflags! {
    /// Per-type header flags.
    ///
    /// Bit 16 is overloaded: it is the 64-bit width flag for numeric types
    /// and the identity flag for objects. Arrays use bits 16-17 as a
    /// two-bit element-typing field, see [`ArrayTyping`].
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct HeaderFlags: u32 {
        /// Payload uses 64-bit numbers (`int`, `float`, real aggregates).
        const FLAG_64 = 1 << 16;
        /// Object is stored as its instance id, not as a snapshot.
        const OBJECT_AS_ID = 1 << 16;
        /// Two-bit array element typing field.
        const TYPED_ARRAY_MASK = 0b11 << 16;
    }
}

/// Value of the two-bit array element typing field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ArrayTyping {
    None = 0b00,
    Builtin = 0b01,
    ClassName = 0b10,
    Script = 0b11,
}

impl ArrayTyping {
    pub const fn flags(self) -> HeaderFlags {
        HeaderFlags::from_bits_retain((self as u32) << 16)
    }

    pub fn from_flags(flags: HeaderFlags) -> Self {
        match (flags & HeaderFlags::TYPED_ARRAY_MASK).bits() >> 16 {
            0b00 => ArrayTyping::None,
            0b01 => ArrayTyping::Builtin,
            0b10 => ArrayTyping::ClassName,
            _ => ArrayTyping::Script,
        }
    }
}

/// Split header word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub raw_type: u32,
    pub flags: HeaderFlags,
}

impl Header {
    pub fn new(ty: VariantType, flags: HeaderFlags) -> Self {
        Header {
            raw_type: ty.as_u32(),
            flags,
        }
    }

    pub fn to_word(self) -> u32 {
        self.raw_type | self.flags.bits()
    }

    pub fn from_word(word: u32) -> Self {
        Header {
            raw_type: word & HEADER_TYPE_MASK,
            flags: HeaderFlags::from_bits_retain(word & !HEADER_TYPE_MASK),
        }
    }

    pub fn is_64(self) -> bool {
        self.flags.contains(HeaderFlags::FLAG_64)
    }
}

/// Header flags implied by the build's `Real` width for `ty`.
pub(crate) fn real_width_flags(ty: VariantType) -> HeaderFlags {
    if cfg!(feature = "double-precision") && ty.is_real_aggregate() {
        HeaderFlags::FLAG_64
    } else {
        HeaderFlags::empty()
    }
}
