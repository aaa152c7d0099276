//! Little-endian wire primitives and scaled amounts.

use {
    crate::constants::AMOUNT_MULTIPLIER,
    arrayref::{array_refs, mut_array_refs},
    std::fmt,
};

/// Number of fractional bits carried by a [`ScaledAmount`].
pub const AMOUNT_FRACTION_BITS: u32 = 24;

/// A 128-bit wire integer: two u64 words, low word first.
pub fn unpack_u128(src: &[u8; 16]) -> u128 {
    let (low, high) = array_refs![src, 8, 8];
    let low = u64::from_le_bytes(*low) as u128;
    let high = u64::from_le_bytes(*high) as u128;
    (high << 64) + low
}

pub fn pack_u128(value: u128, dst: &mut [u8; 16]) {
    let (low, high) = mut_array_refs![dst, 8, 8];
    *low = (value as u64).to_le_bytes();
    *high = ((value >> 64) as u64).to_le_bytes();
}

/// Text field padded with NUL bytes. Decoding stops at the first NUL, or uses
/// the whole width when there is none.
pub fn unpack_str(src: &[u8]) -> String {
    let len = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..len]).into_owned()
}

/// Writes `value` NUL padded; text longer than the field is cut.
pub fn pack_str(value: &str, dst: &mut [u8]) {
    dst.fill(0);
    let len = value.len().min(dst.len());
    dst[..len].copy_from_slice(&value.as_bytes()[..len]);
}

/// An amount stored on chain multiplied by 2^24.
///
/// The raw value is kept exactly. Converting to whole units truncates the 24
/// fractional bits, so only raw values that are multiples of 2^24 survive a
/// trip through [`ScaledAmount::units`] and [`ScaledAmount::from_units`]
/// unchanged.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ScaledAmount(u128);

impl ScaledAmount {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// `None` if `units * 2^24` does not fit in 128 bits.
    pub fn from_units(units: u128) -> Option<Self> {
        units.checked_mul(AMOUNT_MULTIPLIER).map(Self)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Whole base units, fraction dropped.
    pub const fn units(self) -> u128 {
        self.0 >> AMOUNT_FRACTION_BITS
    }

    /// The fractional part, in 1/2^24 steps.
    pub const fn fraction(self) -> u32 {
        (self.0 & (AMOUNT_MULTIPLIER - 1)) as u32
    }

    /// Lossy view for display.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / AMOUNT_MULTIPLIER as f64
    }

    /// Amount in token units given the mint's `10^decimals` multiplier.
    pub fn to_ui_amount(self, mint_decimal_mult: u64) -> f64 {
        if mint_decimal_mult == 0 {
            return 0.0;
        }
        self.to_f64() / mint_decimal_mult as f64
    }

    pub fn unpack(src: &[u8; 16]) -> Self {
        Self(unpack_u128(src))
    }

    pub fn pack(self, dst: &mut [u8; 16]) {
        pack_u128(self.0, dst)
    }
}

impl fmt::Display for ScaledAmount {
    /// Exact decimal rendering; 2^-24 has a finite expansion of 24 digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fraction = self.fraction();
        if fraction == 0 {
            return write!(f, "{}", self.units());
        }
        // fraction / 2^24 == fraction * 5^24 / 10^24
        let digits = fraction as u128 * 5u128.pow(AMOUNT_FRACTION_BITS);
        let digits = format!("{:024}", digits);
        write!(f, "{}.{}", self.units(), digits.trim_end_matches('0'))
    }
}
