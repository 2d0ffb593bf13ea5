use std::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};

const SIGN_SHIFT: u32 = 23;
const EXPONENT_SHIFT: u32 = 16;
const EXPONENT_MASK: u32 = 0x7f;
const MANTISSA_MASK: u32 = 0xffff;
const EXPONENT_BIAS: i32 = 63;

/// 24-bit floating point number as used by the PICA shader units.
///
/// Layout: 1 sign bit, 7 exponent bits (bias 63), 16 mantissa bits.
/// There are no denormals: an exponent of zero always encodes a signed zero.
///
/// Equality is bit-exact, so `+0` and `-0` compare as different values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Float24(u32);

impl Float24 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self((EXPONENT_BIAS as u32) << EXPONENT_SHIFT);
    pub const INFINITY: Self = Self(EXPONENT_MASK << EXPONENT_SHIFT);
    pub const MAX: Self = Self(((EXPONENT_MASK - 1) << EXPONENT_SHIFT) | MANTISSA_MASK);

    /// Build a value from its raw 24-bit pattern. The upper 8 bits are ignored.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw & 0x00ff_ffff)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Lossy conversion from a host float.
    ///
    /// The mantissa is truncated toward zero, values too large for a finite exponent saturate to
    /// [`Float24::MAX`], and values below the smallest normal flush to a signed zero.
    /// NaN and infinities keep their meaning, so no input produces an invalid pattern.
    pub fn from_f32(value: f32) -> Self {
        let bits = value.to_bits();
        let sign = (bits >> 31) << SIGN_SHIFT;

        if value.is_nan() {
            return Self(sign | (EXPONENT_MASK << EXPONENT_SHIFT) | 0x8000);
        }

        if value.is_infinite() {
            return Self(sign | Self::INFINITY.0);
        }

        let exponent = ((bits >> 23) & 0xff) as i32 - 127 + EXPONENT_BIAS;
        if exponent <= 0 {
            return Self(sign);
        }

        if exponent >= EXPONENT_MASK as i32 {
            return Self(sign | Self::MAX.0);
        }

        let mantissa = (bits >> 7) & MANTISSA_MASK;
        Self(sign | ((exponent as u32) << EXPONENT_SHIFT) | mantissa)
    }

    /// Exact conversion to a host float.
    pub fn to_f32(self) -> f32 {
        let sign = (self.0 >> SIGN_SHIFT) << 31;
        let exponent = (self.0 >> EXPONENT_SHIFT) & EXPONENT_MASK;
        let mantissa = self.0 & MANTISSA_MASK;

        match exponent {
            0 => f32::from_bits(sign),
            EXPONENT_MASK if mantissa == 0 => f32::from_bits(sign | 0x7f80_0000),
            EXPONENT_MASK => f32::from_bits(sign | 0x7fc0_0000),
            _ => {
                let exponent = exponent + 127 - EXPONENT_BIAS as u32;
                f32::from_bits(sign | (exponent << 23) | (mantissa << 7))
            }
        }
    }

    pub fn is_nan(self) -> bool {
        (self.0 >> EXPONENT_SHIFT) & EXPONENT_MASK == EXPONENT_MASK && self.0 & MANTISSA_MASK != 0
    }

    pub fn abs(self) -> Self {
        Self(self.0 & !(1 << SIGN_SHIFT))
    }

    pub fn min(self, other: Self) -> Self {
        if self.to_f32() < other.to_f32() { self } else { other }
    }

    pub fn max(self, other: Self) -> Self {
        if self.to_f32() > other.to_f32() { self } else { other }
    }

    pub fn floor(self) -> Self {
        Self::from_f32(self.to_f32().floor())
    }

    pub fn recip(self) -> Self {
        Self::from_f32(1.0 / self.to_f32())
    }

    pub fn rsqrt(self) -> Self {
        Self::from_f32(1.0 / self.to_f32().sqrt())
    }
}

impl From<f32> for Float24 {
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<Float24> for f32 {
    fn from(value: Float24) -> Self {
        value.to_f32()
    }
}

impl Add for Float24 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::from_f32(self.to_f32() + rhs.to_f32())
    }
}

impl Sub for Float24 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_f32(self.to_f32() - rhs.to_f32())
    }
}

impl Mul for Float24 {
    type Output = Self;

    /// The hardware returns zero where IEEE multiplication of two non-NaN values gives NaN (`0 * inf`).
    fn mul(self, rhs: Self) -> Self::Output {
        let (a, b) = (self.to_f32(), rhs.to_f32());
        let result = a * b;
        if result.is_nan() && !a.is_nan() && !b.is_nan() {
            Self::ZERO
        } else {
            Self::from_f32(result)
        }
    }
}

impl Neg for Float24 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(self.0 ^ (1 << SIGN_SHIFT))
    }
}

impl fmt::Debug for Float24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}f24", self.to_f32())
    }
}

impl fmt::Display for Float24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}
