//! Exact rationals over 32-bit numerator and denominator, extended
//! with signed zero, signed infinity and NaN.
//!
//! Every operation is total. Comparisons involving NaN, or two
//! infinities of the same sign, are *incomparable*, reported through
//! [`FracOrdering::Incomparable`] and [`Truth::Unknown`].
//!
//! Results whose reduced numerator or denominator do not fit in 32 bits
//! saturate: magnitudes at or above one become a signed infinity,
//! magnitudes below one become a signed zero. The `checked_*` variants
//! return [`Error::Overflow`] instead.

use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

use crate::error::{Error, Result};

/// Sign of a fraction, NaN carries no sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
    NaN,
}

impl Sign {
    fn from_negative(negative: bool) -> Sign {
        if negative {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }

    fn flip(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
            Sign::NaN => Sign::NaN,
        }
    }
}

/// Four-way ordering, `Incomparable` for NaN and same-signed infinities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FracOrdering {
    Less,
    Equal,
    Greater,
    Incomparable,
}

/// Three-valued truth returned by fraction predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl From<bool> for Truth {
    fn from(b: bool) -> Truth {
        if b {
            Truth::True
        } else {
            Truth::False
        }
    }
}

/// Reduced fraction `sign * num / den`.
///
/// Canonical forms: NaN is `(0, 0, NaN)`, infinities are `(1, 0, ±)`,
/// zero is `(0, 1, ±)` and every other value has `gcd(num, den) = 1`.
///
/// ```
/// use sorted_collections::{Fraction, FracOrdering, Sign};
///
/// let a = Fraction::new(6, 24, Sign::Positive);
/// assert_eq!((a.numerator(), a.denominator()), (1, 4));
///
/// let third = Fraction::new(1, 3, Sign::Positive);
/// let sum = third + Fraction::new(7, 4, Sign::Positive);
/// assert_eq!((sum.numerator(), sum.denominator()), (25, 12));
/// assert_eq!(Fraction::NAN.compare(&third), FracOrdering::Incomparable);
/// ```
#[derive(Clone, Copy)]
pub struct Fraction {
    num: u32,
    den: u32,
    sign: Sign,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction::raw(0, 1, Sign::Positive);
    pub const NEG_ZERO: Fraction = Fraction::raw(0, 1, Sign::Negative);
    pub const ONE: Fraction = Fraction::raw(1, 1, Sign::Positive);
    pub const NAN: Fraction = Fraction::raw(0, 0, Sign::NaN);
    pub const INFINITY: Fraction = Fraction::raw(1, 0, Sign::Positive);
    pub const NEG_INFINITY: Fraction = Fraction::raw(1, 0, Sign::Negative);

    const fn raw(num: u32, den: u32, sign: Sign) -> Fraction {
        Fraction { num, den, sign }
    }

    /// Make a fraction in canonical form. In order: a NaN sign gives
    /// NaN, a zero denominator gives a signed infinity, a zero
    /// numerator gives `+0`, anything else is reduced. Negative zero
    /// only comes out of arithmetic, or [`Fraction::NEG_ZERO`].
    pub fn new(num: u32, den: u32, sign: Sign) -> Fraction {
        match sign {
            Sign::NaN => Fraction::NAN,
            sign if den == 0 => Fraction::infinity(sign),
            _ if num == 0 => Fraction::ZERO,
            sign => {
                let g = gcd(u128::from(num), u128::from(den)) as u32;
                Fraction::raw(num / g, den / g, sign)
            }
        }
    }

    /// Integer `n` as `n/1`.
    pub fn from_int(n: i32) -> Fraction {
        let sign = Sign::from_negative(n < 0);
        Fraction::new(n.unsigned_abs(), 1, sign)
    }

    fn infinity(sign: Sign) -> Fraction {
        match sign {
            Sign::Negative => Fraction::NEG_INFINITY,
            Sign::Positive => Fraction::INFINITY,
            Sign::NaN => Fraction::NAN,
        }
    }

    fn zero(sign: Sign) -> Fraction {
        match sign {
            Sign::Negative => Fraction::NEG_ZERO,
            Sign::Positive => Fraction::ZERO,
            Sign::NaN => Fraction::NAN,
        }
    }

    #[inline]
    pub fn numerator(&self) -> u32 {
        self.num
    }

    #[inline]
    pub fn denominator(&self) -> u32 {
        self.den
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }
}

/// Classification.
impl Fraction {
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.sign == Sign::NaN
    }

    #[inline]
    pub fn is_inf(&self) -> bool {
        !self.is_nan() && self.den == 0
    }

    #[inline]
    pub fn is_pos_inf(&self) -> bool {
        self.is_inf() && self.sign == Sign::Positive
    }

    #[inline]
    pub fn is_neg_inf(&self) -> bool {
        self.is_inf() && self.sign == Sign::Negative
    }

    /// True for both `+0` and `-0`.
    #[inline]
    pub fn is_zero(&self) -> bool {
        !self.is_nan() && self.num == 0 && self.den != 0
    }

    /// True only for positive `1/1`.
    #[inline]
    pub fn is_one(&self) -> bool {
        self.sign == Sign::Positive && self.num == 1 && self.den == 1
    }

    /// True for values strictly above zero, `+inf` included.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.sign == Sign::Positive && self.num != 0
    }

    /// True for values strictly below zero, `-inf` included.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative && self.num != 0
    }

    /// Neither NaN nor infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        !self.is_nan() && self.den != 0
    }

    /// NaN and `-inf` map to `f64::MIN`, `+inf` maps to `f64::MAX`.
    pub fn to_f64(&self) -> f64 {
        if self.is_nan() || self.is_neg_inf() {
            f64::MIN
        } else if self.is_pos_inf() {
            f64::MAX
        } else if self.is_zero() {
            0.0
        } else if self.is_one() {
            1.0
        } else {
            let magnitude = f64::from(self.num) / f64::from(self.den);
            match self.sign {
                Sign::Negative => -magnitude,
                _ => magnitude,
            }
        }
    }

    #[inline]
    fn negative(&self) -> bool {
        self.sign == Sign::Negative
    }
}

/// Arithmetic.
impl Fraction {
    pub fn neg(self) -> Fraction {
        Fraction::raw(self.num, self.den, self.sign.flip())
    }

    pub fn abs(self) -> Fraction {
        match self.sign {
            Sign::Negative => self.neg(),
            _ => self,
        }
    }

    /// Reciprocal, `±0` and `±inf` swap into each other.
    pub fn recip(self) -> Fraction {
        if self.is_nan() {
            Fraction::NAN
        } else if self.is_inf() {
            Fraction::zero(self.sign)
        } else if self.is_zero() {
            Fraction::infinity(self.sign)
        } else {
            Fraction::raw(self.den, self.num, self.sign)
        }
    }

    pub fn add(self, other: Fraction) -> Fraction {
        self.add_wide(other).unwrap_or_else(|saturated| saturated)
    }

    pub fn sub(self, other: Fraction) -> Fraction {
        self.add(other.neg())
    }

    pub fn mul(self, other: Fraction) -> Fraction {
        self.mul_wide(other).unwrap_or_else(|saturated| saturated)
    }

    pub fn div(self, other: Fraction) -> Fraction {
        self.div_wide(other).unwrap_or_else(|saturated| saturated)
    }

    /// Multiply by the integer `k`.
    pub fn scale_by_int(self, k: i32) -> Fraction {
        self.mul(Fraction::from_int(k))
    }

    pub fn checked_add(self, other: Fraction) -> Result<Fraction> {
        self.add_wide(other).map_err(|_| Error::Overflow)
    }

    pub fn checked_sub(self, other: Fraction) -> Result<Fraction> {
        self.add_wide(other.neg()).map_err(|_| Error::Overflow)
    }

    pub fn checked_mul(self, other: Fraction) -> Result<Fraction> {
        self.mul_wide(other).map_err(|_| Error::Overflow)
    }

    pub fn checked_div(self, other: Fraction) -> Result<Fraction> {
        self.div_wide(other).map_err(|_| Error::Overflow)
    }

    // Err carries the saturated result.
    fn add_wide(self, other: Fraction) -> std::result::Result<Fraction, Fraction> {
        if self.is_nan() || other.is_nan() {
            return Ok(Fraction::NAN);
        }
        match (self.is_inf(), other.is_inf()) {
            (true, true) if self.sign == other.sign => return Ok(self),
            (true, true) => return Ok(Fraction::NAN),
            (true, false) => return Ok(self),
            (false, true) => return Ok(other),
            (false, false) => (),
        }
        match (self.is_zero(), other.is_zero()) {
            (true, true) => {
                let negative = self.negative() && other.negative();
                return Ok(Fraction::zero(Sign::from_negative(negative)));
            }
            (true, false) => return Ok(other),
            (false, true) => return Ok(self),
            (false, false) => (),
        }

        let g = gcd(u128::from(self.den), u128::from(other.den));
        let (a_scale, b_scale) = (u128::from(other.den) / g, u128::from(self.den) / g);
        let a = signed(u128::from(self.num) * a_scale, self.negative());
        let b = signed(u128::from(other.num) * b_scale, other.negative());
        let num = a + b;
        let den = u128::from(self.den) * a_scale;
        settle(num < 0, num.unsigned_abs(), den)
    }

    // Cross-reduce before multiplying to keep intermediates small.
    fn mul_wide(self, other: Fraction) -> std::result::Result<Fraction, Fraction> {
        if self.is_nan() || other.is_nan() {
            return Ok(Fraction::NAN);
        }
        let sign = Sign::from_negative(self.negative() != other.negative());
        if self.is_inf() || other.is_inf() {
            if self.is_zero() || other.is_zero() {
                return Ok(Fraction::NAN);
            }
            return Ok(Fraction::infinity(sign));
        }
        if self.is_zero() || other.is_zero() {
            return Ok(Fraction::zero(sign));
        }

        let g1 = gcd(u128::from(self.num), u128::from(other.den));
        let g2 = gcd(u128::from(other.num), u128::from(self.den));
        let num = (u128::from(self.num) / g1) * (u128::from(other.num) / g2);
        let den = (u128::from(self.den) / g2) * (u128::from(other.den) / g1);
        settle(sign == Sign::Negative, num, den)
    }

    fn div_wide(self, other: Fraction) -> std::result::Result<Fraction, Fraction> {
        if self.is_nan() || other.is_nan() {
            return Ok(Fraction::NAN);
        }
        if self.is_zero() && other.is_zero() {
            return Ok(Fraction::NAN);
        }
        if self.is_inf() && other.is_inf() {
            return Ok(Fraction::NAN);
        }
        self.mul_wide(other.recip())
    }
}

fn signed(magnitude: u128, negative: bool) -> i128 {
    let magnitude = magnitude as i128;
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

// Reduce `num/den` and fit it into 32 bits, den is non-zero.
fn settle(negative: bool, num: u128, den: u128) -> std::result::Result<Fraction, Fraction> {
    if num == 0 {
        return Ok(Fraction::ZERO);
    }
    let g = gcd(num, den);
    let (num, den) = (num / g, den / g);
    let sign = Sign::from_negative(negative);
    if num <= u128::from(u32::MAX) && den <= u128::from(u32::MAX) {
        Ok(Fraction::raw(num as u32, den as u32, sign))
    } else if num >= den {
        Err(Fraction::infinity(sign))
    } else {
        Err(Fraction::zero(sign))
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = std::mem::replace(&mut b, r);
    }
    a
}

/// Comparison.
impl Fraction {
    /// Order `self` relative to `other`. `+0` and `-0` are equal.
    pub fn compare(&self, other: &Fraction) -> FracOrdering {
        if self.is_nan() || other.is_nan() {
            return FracOrdering::Incomparable;
        }
        if self.is_inf() && other.is_inf() && self.sign == other.sign {
            return FracOrdering::Incomparable;
        }
        if self.is_pos_inf() || other.is_neg_inf() {
            return FracOrdering::Greater;
        }
        if self.is_neg_inf() || other.is_pos_inf() {
            return FracOrdering::Less;
        }

        let (a, b) = (self.signum(), other.signum());
        let ord = if a != b || a == 0 {
            a.cmp(&b)
        } else {
            // same sign, compare magnitudes over the reduced common denominator.
            let g = u64::from(gcd(u128::from(self.den), u128::from(other.den)) as u32);
            let lhs = u64::from(self.num) * (u64::from(other.den) / g);
            let rhs = u64::from(other.num) * (u64::from(self.den) / g);
            if a < 0 {
                rhs.cmp(&lhs)
            } else {
                lhs.cmp(&rhs)
            }
        };
        match ord {
            Ordering::Less => FracOrdering::Less,
            Ordering::Equal => FracOrdering::Equal,
            Ordering::Greater => FracOrdering::Greater,
        }
    }

    pub fn eq(&self, other: &Fraction) -> Truth {
        self.truth(other, |ord| ord == FracOrdering::Equal)
    }

    pub fn lt(&self, other: &Fraction) -> Truth {
        self.truth(other, |ord| ord == FracOrdering::Less)
    }

    pub fn le(&self, other: &Fraction) -> Truth {
        self.truth(other, |ord| ord != FracOrdering::Greater)
    }

    pub fn gt(&self, other: &Fraction) -> Truth {
        self.truth(other, |ord| ord == FracOrdering::Greater)
    }

    pub fn ge(&self, other: &Fraction) -> Truth {
        self.truth(other, |ord| ord != FracOrdering::Less)
    }

    fn truth<F>(&self, other: &Fraction, pred: F) -> Truth
    where
        F: Fn(FracOrdering) -> bool,
    {
        match self.compare(other) {
            FracOrdering::Incomparable => Truth::Unknown,
            ord => Truth::from(pred(ord)),
        }
    }

    fn signum(&self) -> i8 {
        match self.sign {
            _ if self.num == 0 => 0,
            Sign::Negative => -1,
            _ => 1,
        }
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Fraction) -> bool {
        self.compare(other) == FracOrdering::Equal
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Fraction) -> Option<Ordering> {
        match self.compare(other) {
            FracOrdering::Less => Some(Ordering::Less),
            FracOrdering::Equal => Some(Ordering::Equal),
            FracOrdering::Greater => Some(Ordering::Greater),
            FracOrdering::Incomparable => None,
        }
    }
}

impl Default for Fraction {
    fn default() -> Fraction {
        Fraction::ZERO
    }
}

impl From<u32> for Fraction {
    fn from(n: u32) -> Fraction {
        Fraction::new(n, 1, Sign::Positive)
    }
}

impl From<i32> for Fraction {
    fn from(n: i32) -> Fraction {
        Fraction::from_int(n)
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, other: Fraction) -> Fraction {
        Fraction::add(self, other)
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, other: Fraction) -> Fraction {
        Fraction::sub(self, other)
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, other: Fraction) -> Fraction {
        Fraction::mul(self, other)
    }
}

impl Div for Fraction {
    type Output = Fraction;

    fn div(self, other: Fraction) -> Fraction {
        Fraction::div(self, other)
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction::neg(self)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minus = if self.negative() { "-" } else { "" };
        if self.is_nan() {
            write!(f, "NaN")
        } else if self.is_inf() {
            write!(f, "{}inf", minus)
        } else if self.den == 1 {
            write!(f, "{}{}", minus, self.num)
        } else {
            write!(f, "{}{}/{}", minus, self.num, self.den)
        }
    }
}

impl fmt::Debug for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fraction({}, {}, {:?})", self.num, self.den, self.sign)
    }
}
