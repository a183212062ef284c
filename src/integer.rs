//! Immutable arbitrary-precision integers.
//!
//! [`LargeInt`] is the public value type of the library. Every operation
//! allocates a fresh result sized from its inputs, calls into the signed
//! layer, and normalizes before returning, so values can be shared
//! freely. Mutability and space management stay inside the lower layers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::ArithError;
use crate::limb::{self, Limb, PreparedDivisor};
use crate::random::RandomSource;
use crate::signed::{self, SignedInt};

/// Immutable signed arbitrary-precision integer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LargeInt {
    pub(crate) inner: SignedInt,
}

impl LargeInt {
    fn from_signed(mut inner: SignedInt) -> LargeInt {
        signed::normalize(&mut inner);
        if limb::is_zero(&inner.limbs) {
            inner.sign = 0;
        }
        LargeInt { inner }
    }

    /// Returns an integer with the given sign and little-endian limb
    /// magnitude. A zero magnitude forces the sign to zero.
    pub fn new(sign: i32, limbs: Vec<Limb>) -> LargeInt {
        LargeInt::from_signed(SignedInt::new(sign, limbs))
    }

    /// Returns zero.
    pub fn zero() -> LargeInt {
        LargeInt { inner: SignedInt::new(0, vec![0]) }
    }

    /// Returns one.
    pub fn one() -> LargeInt {
        LargeInt { inner: SignedInt::new(1, vec![1]) }
    }

    /// Returns two.
    pub fn two() -> LargeInt {
        LargeInt { inner: SignedInt::new(1, vec![2]) }
    }

    /// Returns the non-negative integer with the given big-endian byte
    /// representation of its magnitude.
    pub fn from_bytes_be(bytes: &[u8]) -> LargeInt {
        let le: Vec<u8> = bytes.iter().rev().copied().collect();
        let limbs = limb::from_bytes_le(&le);
        let sign = if limb::is_zero(&limbs) { 0 } else { 1 };
        LargeInt::from_signed(SignedInt::new(sign, limbs))
    }

    /// Returns the non-negative integer with the given value.
    pub fn from_u64(v: u64) -> LargeInt {
        let mut limbs = Vec::new();
        let mut rest = v;
        loop {
            limbs.push((rest & limb::MASK_ALL as u64) as Limb);
            rest >>= limb::WORDSIZE;
            if rest == 0 {
                break;
            }
        }
        let sign = if v == 0 { 0 } else { 1 };
        LargeInt::from_signed(SignedInt::new(sign, limbs))
    }

    /// Parses a raw hexadecimal representation with an optional leading
    /// "-" for negative values.
    pub fn from_hex(s: &str) -> Result<LargeInt, ArithError> {
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, s),
        };
        if digits.is_empty() {
            return Err(ArithError::EmptyInput);
        }

        let mut nibbles = Vec::with_capacity(digits.len());
        for ch in digits.chars() {
            let nibble = ch.to_digit(16).ok_or(ArithError::InvalidHexDigit(ch))? as u8;
            nibbles.push(nibble);
        }

        // Pack pairs of nibbles into bytes from the least significant
        // end.
        let mut le = Vec::with_capacity(nibbles.len() / 2 + 1);
        let mut iter = nibbles.iter().rev();
        while let Some(&low) = iter.next() {
            let high = iter.next().copied().unwrap_or(0);
            le.push((high << 4) | low);
        }

        let limbs = limb::from_bytes_le(&le);
        let sign = if limb::is_zero(&limbs) { 0 } else { sign };
        Ok(LargeInt::from_signed(SignedInt::new(sign, limbs)))
    }

    /// Returns a random non-negative integer with at most the given
    /// number of bits.
    pub fn random(bits: usize, source: &mut dyn RandomSource) -> LargeInt {
        let byte_length = (bits + 7) / 8;
        let top_zeros = (8 - bits % 8) % 8;

        let mut data = source.random_bytes(byte_length);
        if let Some(first) = data.first_mut() {
            *first &= 0xFF >> top_zeros;
        }
        LargeInt::from_bytes_be(&data)
    }

    /// Sign of this integer as -1, 0, or 1.
    pub fn sign(&self) -> i32 {
        self.inner.sign
    }

    /// Checks whether this integer is zero.
    pub fn is_zero(&self) -> bool {
        self.inner.sign == 0
    }

    /// Checks whether this integer is one.
    pub fn is_one(&self) -> bool {
        signed::is_one(&self.inner)
    }

    /// Bit length of this integer, where zero has bit length one.
    pub fn bit_length(&self) -> usize {
        limb::msbit(&self.inner.limbs) + 1
    }

    /// Returns the given bit of the magnitude as 0 or 1.
    pub fn get_bit(&self, index: usize) -> u32 {
        limb::getbit(&self.inner.limbs, index)
    }

    /// Absolute value of this integer.
    pub fn abs(&self) -> LargeInt {
        LargeInt::new(1, self.inner.limbs.clone())
    }

    /// Negative of this integer.
    pub fn neg(&self) -> LargeInt {
        LargeInt::new(-self.inner.sign, self.inner.limbs.clone())
    }

    /// Sum of this integer and the term.
    pub fn add(&self, term: &LargeInt) -> LargeInt {
        let len = self.limb_len().max(term.limb_len()) + 1;
        let mut res = SignedInt::with_len(len);
        signed::add(&mut res, &self.inner, &term.inner);
        LargeInt::from_signed(res)
    }

    /// Difference of this integer and the term.
    pub fn sub(&self, term: &LargeInt) -> LargeInt {
        let len = self.limb_len().max(term.limb_len()) + 1;
        let mut res = SignedInt::with_len(len);
        signed::sub(&mut res, &self.inner, &term.inner);
        LargeInt::from_signed(res)
    }

    /// Product of this integer and the factor.
    pub fn mul(&self, factor: &LargeInt) -> LargeInt {
        let len = self.limb_len() + factor.limb_len();
        let mut res = SignedInt::with_len(len);
        signed::mul(&mut res, &self.inner, &factor.inner);
        LargeInt::from_signed(res)
    }

    /// Square of this integer.
    pub fn square(&self) -> LargeInt {
        let mut res = SignedInt::with_len(2 * self.limb_len());
        signed::square(&mut res, &self.inner);
        LargeInt::from_signed(res)
    }

    /// Returns (q, r) such that this = q * divisor + r rounded toward
    /// negative infinity, so 0 <= r < divisor for a positive divisor.
    ///
    /// Panics on a zero divisor.
    pub fn div_qr(&self, divisor: &LargeInt) -> (LargeInt, LargeInt) {
        if divisor.inner.sign == 0 {
            panic!("attempt to divide by zero");
        }

        let dlen = divisor.limb_len();

        // Copy the dividend with extra space, since division computes
        // the remainder destructively in place.
        let rlen = self.limb_len().max(dlen) + 2;
        let mut remainder = SignedInt::with_len(rlen);
        signed::set(&mut remainder, &self.inner);

        let qlen = (rlen - dlen).max(dlen) + 1;
        let mut quotient = SignedInt::with_len(qlen);

        signed::div_qr(&mut quotient, &mut remainder, &divisor.inner);

        (LargeInt::from_signed(quotient), LargeInt::from_signed(remainder))
    }

    /// Integer quotient rounded toward negative infinity.
    pub fn div(&self, divisor: &LargeInt) -> LargeInt {
        self.div_qr(divisor).0
    }

    /// Remainder in [0, modulus - 1] for a positive modulus.
    pub fn modulo(&self, modulus: &LargeInt) -> LargeInt {
        self.div_qr(modulus).1
    }

    /// (this + term) mod modulus for non-negative operands and a
    /// positive modulus.
    pub fn mod_add(&self, term: &LargeInt, modulus: &LargeInt) -> LargeInt {
        self.add(term).modulo(modulus)
    }

    /// (this - term) mod modulus for non-negative operands and a
    /// positive modulus.
    pub fn mod_sub(&self, term: &LargeInt, modulus: &LargeInt) -> LargeInt {
        self.sub(term).modulo(modulus)
    }

    /// (this * factor) mod modulus for non-negative operands and a
    /// positive modulus.
    pub fn mod_mul(&self, factor: &LargeInt, modulus: &LargeInt) -> LargeInt {
        self.mul(factor).modulo(modulus)
    }

    /// this^exponent mod modulus.
    ///
    /// Panics on a negative basis, a negative exponent, or a
    /// non-positive modulus.
    pub fn mod_pow(&self, exponent: &LargeInt, modulus: &LargeInt) -> LargeInt {
        if self.inner.sign < 0 {
            panic!("negative basis");
        }
        if exponent.inner.sign < 0 {
            panic!("negative exponent");
        }
        if modulus.inner.sign <= 0 {
            panic!("non-positive modulus");
        }

        // x^e mod 1 = 0 for every e >= 0.
        if modulus.is_one() {
            return LargeInt::zero();
        }

        // b^0 mod m = 1 for m > 1.
        if exponent.inner.sign == 0 {
            return LargeInt::one();
        }

        let mlen = modulus.limb_len();

        // Reduce or pad the basis to the limb length of the modulus.
        let mut g = if self.limb_len() > mlen {
            self.modulo(modulus).inner.limbs
        } else {
            self.inner.limbs.clone()
        };
        g.resize(mlen, 0);

        let d = PreparedDivisor::new(&modulus.inner.limbs);
        let mut w = vec![0; mlen];
        limb::modpow(&mut w, &g, &exponent.inner.limbs, &d);

        if limb::is_zero(&w) {
            LargeInt::zero()
        } else {
            LargeInt::from_signed(SignedInt::new(1, w))
        }
    }

    /// Returns (a, b, v) such that a * this + b * other = v, where v is
    /// the greatest common divisor of this and other.
    pub fn egcd(&self, other: &LargeInt) -> (LargeInt, LargeInt, LargeInt) {
        let len = self.limb_len().max(other.limb_len()) + 1;

        let mut a = SignedInt::with_len(len);
        let mut b = SignedInt::with_len(len);
        let mut v = SignedInt::with_len(len);

        signed::egcd(&mut a, &mut b, &mut v, &self.inner, &other.inner);

        (LargeInt::from_signed(a), LargeInt::from_signed(b), LargeInt::from_signed(v))
    }

    /// Returns x in [0, prime - 1] such that x * this = 1 mod prime for
    /// an odd prime.
    pub fn mod_inv(&self, prime: &LargeInt) -> LargeInt {
        // A stripped extended gcd would save a few operations but not
        // change the asymptotics.
        let a = self.egcd(prime).0;
        if a.inner.sign < 0 {
            prime.add(&a)
        } else {
            a
        }
    }

    /// Legendre symbol of this integer modulo an odd prime.
    pub fn legendre(&self, prime: &LargeInt) -> i32 {
        signed::legendre(&self.modulo(prime).inner, &prime.inner)
    }

    /// Square root of this integer modulo an odd prime, assuming this
    /// integer is a quadratic residue.
    pub fn mod_sqrt(&self, prime: &LargeInt) -> LargeInt {
        let mut res = SignedInt::with_len(prime.limb_len());
        signed::modsqrt(&mut res, &self.inner, &prime.inner);
        LargeInt::from_signed(res)
    }

    /// Returns the bits of the magnitude from the inclusive start index
    /// to the exclusive end index as an integer with the sign of this
    /// integer.
    pub fn slice_bits(&self, start: usize, end: usize) -> LargeInt {
        let limbs = limb::slice_bits(&self.inner.limbs, start, end);
        let sign = if limb::is_zero(&limbs) { 0 } else { self.inner.sign };
        LargeInt::from_signed(SignedInt::new(sign, limbs))
    }

    /// This integer shifted to the left.
    pub fn shift_left(&self, offset: usize) -> LargeInt {
        let len = self.limb_len() + (offset + limb::WORDSIZE - 1) / limb::WORDSIZE;
        let mut limbs = self.inner.limbs.clone();
        limb::resize(&mut limbs, len);
        limb::shift_left(&mut limbs, offset);
        LargeInt::new(self.inner.sign, limbs)
    }

    /// This integer shifted to the right, with bits shifted out lost.
    pub fn shift_right(&self, offset: usize) -> LargeInt {
        let mut limbs = self.inner.limbs.clone();
        limb::shift_right(&mut limbs, offset);
        LargeInt::new(self.inner.sign, limbs)
    }

    /// Big-endian byte representation of the absolute value. Without a
    /// byte size the shortest representation with a leading zero bit is
    /// used; with one, the representation is truncated or zero-padded to
    /// exactly that many bytes.
    pub fn to_bytes_be(&self, byte_size: Option<usize>) -> Vec<u8> {
        let mut le = limb::to_bytes_le(&self.inner.limbs);
        match byte_size {
            None => {
                let mut l = le.len() - 1;
                while l > 0 && le[l] == 0 {
                    l -= 1;
                }
                if le[l] & 0x80 != 0 {
                    l += 1;
                }
                le.truncate(l + 1);
            }
            Some(size) => {
                le.resize(size, 0);
            }
        }
        le.reverse();
        le
    }

    /// Raw hexadecimal representation with a leading "-" for negative
    /// values.
    pub fn to_hex(&self) -> String {
        signed::to_hex(&self.inner)
    }

    fn limb_len(&self) -> usize {
        self.inner.limbs.len()
    }
}

impl PartialEq for LargeInt {
    fn eq(&self, other: &LargeInt) -> bool {
        signed::cmp(&self.inner, &other.inner) == Ordering::Equal
    }
}

impl Eq for LargeInt {}

impl PartialOrd for LargeInt {
    fn partial_cmp(&self, other: &LargeInt) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LargeInt {
    fn cmp(&self, other: &LargeInt) -> Ordering {
        signed::cmp(&self.inner, &other.inner)
    }
}

impl fmt::Display for LargeInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
