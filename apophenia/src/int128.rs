//! 128-bit unsigned integer built from two 64-bit words
//!
//! Offsets into a [`Sequence`](crate::Sequence) and the values it yields are
//! both 128 bits wide. `Uint128` keeps the two halves explicit because the
//! halves mean different things to callers: `hi` carries the namespace
//! (class, seed, iteration) and `lo` carries the per-item id.
//!
//! # Semantics
//!
//! - Arithmetic wraps (two's complement), carries and borrows cross words
//! - Shifts zero-fill; shifting by 128 or more yields zero
//! - Rotations are mod 128
//!
//! Every operation is total; nothing here can fail or panic.

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl,
    Shr, Sub, SubAssign,
};

/// A 128-bit unsigned value, `(hi << 64) | lo`.
///
/// # Example
/// ```
/// use apophenia::Uint128;
///
/// let mut u = Uint128::new(0, u64::MAX);
/// u.increment();
/// assert_eq!(u, Uint128::new(1, 0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uint128 {
    /// High-order word (compared first, so ordering matches the numeric value)
    pub hi: u64,
    /// Low-order word
    pub lo: u64,
}

impl Uint128 {
    pub const ZERO: Uint128 = Uint128 { hi: 0, lo: 0 };
    pub const MAX: Uint128 = Uint128 {
        hi: u64::MAX,
        lo: u64::MAX,
    };

    /// Create a value from explicit high and low words.
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Create a value from a single 64-bit word (high word zero).
    pub const fn from_u64(lo: u64) -> Self {
        Self { hi: 0, lo }
    }

    pub const fn from_u128(value: u128) -> Self {
        Self {
            hi: (value >> 64) as u64,
            lo: value as u64,
        }
    }

    pub const fn as_u128(self) -> u128 {
        ((self.hi as u128) << 64) | self.lo as u128
    }

    /// Wrapping addition; the carry out of `lo` lands in `hi`.
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        let (lo, carry) = self.lo.overflowing_add(rhs.lo);
        let hi = self.hi.wrapping_add(rhs.hi).wrapping_add(carry as u64);
        Self { hi, lo }
    }

    /// Wrapping subtraction; a borrow out of `lo` is taken from `hi`.
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        let (lo, borrow) = self.lo.overflowing_sub(rhs.lo);
        let hi = self.hi.wrapping_sub(rhs.hi).wrapping_sub(borrow as u64);
        Self { hi, lo }
    }

    /// Shift left by `n` bits, zero-filling. `n >= 128` yields zero.
    pub const fn shift_left(self, n: u32) -> Self {
        if n >= 128 {
            return Self::ZERO;
        }
        if n >= 64 {
            return Self {
                hi: self.lo << (n - 64),
                lo: 0,
            };
        }
        if n == 0 {
            return self;
        }
        Self {
            hi: (self.hi << n) | (self.lo >> (64 - n)),
            lo: self.lo << n,
        }
    }

    /// Shift right by `n` bits, zero-filling. `n >= 128` yields zero.
    pub const fn shift_right(self, n: u32) -> Self {
        if n >= 128 {
            return Self::ZERO;
        }
        if n >= 64 {
            return Self {
                hi: 0,
                lo: self.hi >> (n - 64),
            };
        }
        if n == 0 {
            return self;
        }
        Self {
            hi: self.hi >> n,
            lo: (self.lo >> n) | (self.hi << (64 - n)),
        }
    }

    /// Shift right by `n <= 64` bits, also returning the `n` bits shifted out.
    ///
    /// For a power-of-two divisor `2^n` this yields both `self / 2^n` and
    /// `self % 2^n` in one step. For `n > 64` the result is `(ZERO, 0)`.
    ///
    /// # Example
    /// ```
    /// use apophenia::Uint128;
    ///
    /// let (q, r) = Uint128::from_u64(0x1234).shift_right_with_carry(8);
    /// assert_eq!(q, Uint128::from_u64(0x12));
    /// assert_eq!(r, 0x34);
    /// ```
    pub const fn shift_right_with_carry(self, n: u32) -> (Self, u64) {
        if n > 64 {
            return (Self::ZERO, 0);
        }
        if n == 64 {
            return (Self::from_u64(self.hi), self.lo);
        }
        if n == 0 {
            return (self, 0);
        }
        let carry = self.lo & ((1u64 << n) - 1);
        (self.shift_right(n), carry)
    }

    /// Rotate left by `n` bits, mod 128.
    pub const fn rotate_left(self, n: u32) -> Self {
        // Bit 6 of n means "swap the words"; the rest is a sub-word rotation.
        let swapped = if n & 64 != 0 {
            Self {
                hi: self.lo,
                lo: self.hi,
            }
        } else {
            self
        };
        let n = n & 63;
        if n == 0 {
            return swapped;
        }
        Self {
            hi: (swapped.hi << n) | (swapped.lo >> (64 - n)),
            lo: (swapped.lo << n) | (swapped.hi >> (64 - n)),
        }
    }

    /// Rotate right by `n` bits, mod 128.
    pub const fn rotate_right(self, n: u32) -> Self {
        let swapped = if n & 64 != 0 {
            Self {
                hi: self.lo,
                lo: self.hi,
            }
        } else {
            self
        };
        let n = n & 63;
        if n == 0 {
            return swapped;
        }
        Self {
            hi: (swapped.hi >> n) | (swapped.lo << (64 - n)),
            lo: (swapped.lo >> n) | (swapped.hi << (64 - n)),
        }
    }

    /// Returns 1 if bit `n` is set, 0 otherwise (always 0 for `n >= 128`).
    pub const fn bit(self, n: u32) -> u64 {
        if n >= 128 {
            0
        } else if n >= 64 {
            (self.hi >> (n - 64)) & 1
        } else {
            (self.lo >> n) & 1
        }
    }

    /// Keep only the low `n` bits. `n >= 128` leaves the value unchanged.
    pub const fn mask(self, n: u32) -> Self {
        let m = mask_of(n);
        Self {
            hi: self.hi & m.hi,
            lo: self.lo & m.lo,
        }
    }

    /// Wrapping increment in place.
    pub fn increment(&mut self) {
        self.lo = self.lo.wrapping_add(1);
        if self.lo == 0 {
            self.hi = self.hi.wrapping_add(1);
        }
    }
}

/// A bitmask with the low `n` bits set (`n >= 128` gives all ones).
///
/// # Example
/// ```
/// use apophenia::{mask_of, Uint128};
///
/// assert_eq!(mask_of(4), Uint128::from_u64(0xf));
/// assert_eq!(mask_of(64), Uint128::new(0, u64::MAX));
/// assert_eq!(mask_of(200), Uint128::MAX);
/// ```
pub const fn mask_of(n: u32) -> Uint128 {
    if n >= 128 {
        Uint128::MAX
    } else if n >= 64 {
        Uint128 {
            hi: (1u64 << (n - 64)).wrapping_sub(1),
            lo: u64::MAX,
        }
    } else {
        Uint128 {
            hi: 0,
            lo: (1u64 << n).wrapping_sub(1),
        }
    }
}

impl From<u64> for Uint128 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<Uint128> for u128 {
    fn from(value: Uint128) -> Self {
        value.as_u128()
    }
}

impl Add for Uint128 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

impl AddAssign for Uint128 {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.wrapping_add(rhs);
    }
}

impl Sub for Uint128 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
}

impl SubAssign for Uint128 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.wrapping_sub(rhs);
    }
}

impl BitAnd for Uint128 {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::new(self.hi & rhs.hi, self.lo & rhs.lo)
    }
}

impl BitAndAssign for Uint128 {
    fn bitand_assign(&mut self, rhs: Self) {
        self.hi &= rhs.hi;
        self.lo &= rhs.lo;
    }
}

impl BitOr for Uint128 {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::new(self.hi | rhs.hi, self.lo | rhs.lo)
    }
}

impl BitOrAssign for Uint128 {
    fn bitor_assign(&mut self, rhs: Self) {
        self.hi |= rhs.hi;
        self.lo |= rhs.lo;
    }
}

impl BitXor for Uint128 {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self::new(self.hi ^ rhs.hi, self.lo ^ rhs.lo)
    }
}

impl BitXorAssign for Uint128 {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.hi ^= rhs.hi;
        self.lo ^= rhs.lo;
    }
}

impl Not for Uint128 {
    type Output = Self;

    fn not(self) -> Self {
        Self::new(!self.hi, !self.lo)
    }
}

impl Shl<u32> for Uint128 {
    type Output = Self;

    fn shl(self, n: u32) -> Self {
        self.shift_left(n)
    }
}

impl Shr<u32> for Uint128 {
    type Output = Self;

    fn shr(self, n: u32) -> Self {
        self.shift_right(n)
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}{:016x}", self.hi, self.lo)
    }
}

impl fmt::LowerHex for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hi == 0 {
            fmt::LowerHex::fmt(&self.lo, f)
        } else {
            write!(f, "{:x}{:016x}", self.hi, self.lo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_carries_into_high_word() {
        let a = Uint128::new(0, u64::MAX);
        assert_eq!(a + Uint128::from_u64(1), Uint128::new(1, 0));
    }

    #[test]
    fn test_sub_borrows_from_high_word() {
        let a = Uint128::new(1, 0);
        assert_eq!(a - Uint128::from_u64(1), Uint128::new(0, u64::MAX));
    }

    #[test]
    fn test_add_sub_wrap() {
        assert_eq!(Uint128::MAX + Uint128::from_u64(1), Uint128::ZERO);
        assert_eq!(Uint128::ZERO - Uint128::from_u64(1), Uint128::MAX);
    }

    #[test]
    fn test_increment_wraps_to_zero() {
        let mut u = Uint128::MAX;
        u.increment();
        assert_eq!(u, Uint128::ZERO);
    }

    #[test]
    fn test_bit_out_of_range_is_zero() {
        assert_eq!(Uint128::MAX.bit(127), 1);
        assert_eq!(Uint128::MAX.bit(128), 0);
        assert_eq!(Uint128::new(1, 0).bit(64), 1);
    }

    #[test]
    fn test_mask_keeps_low_bits() {
        let u = Uint128::MAX;
        assert_eq!(u.mask(0), Uint128::ZERO);
        assert_eq!(u.mask(70), Uint128::new(0x3f, u64::MAX));
        assert_eq!(u.mask(128), Uint128::MAX);
    }

    #[test]
    fn test_shift_right_with_carry_full_word() {
        let u = Uint128::new(7, 9);
        assert_eq!(u.shift_right_with_carry(64), (Uint128::from_u64(7), 9));
        assert_eq!(u.shift_right_with_carry(65), (Uint128::ZERO, 0));
        assert_eq!(u.shift_right_with_carry(0), (u, 0));
    }

    #[test]
    fn test_rotate_by_64_swaps_words() {
        let u = Uint128::new(1, 2);
        assert_eq!(u.rotate_left(64), Uint128::new(2, 1));
        assert_eq!(u.rotate_right(64), Uint128::new(2, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Uint128::new(0x1, 0x2).to_string(), "0x10000000000000002");
    }
}
