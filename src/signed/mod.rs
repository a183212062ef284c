//! Mutable signed integers over the limb kernel.
//!
//! A [`SignedInt`] pairs a sign with a limb array whose space is managed
//! by the caller, so the routines here never allocate on the hot path.
//! All operations write into pre-existing instances and it is the
//! responsibility of the caller that results fit in the allocated space.
//!
//! Division rounds toward negative infinity, so the remainder always
//! takes the sign of the divisor. On top of division sit the binary
//! extended greatest common divisor (HAC 14.61), Legendre symbols
//! (HAC 2.149), and Tonelli-Shanks modular square roots.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::limb::{self, Limb, PreparedDivisor, MASK_ALL};

/// Signed mutable integer with caller-managed space.
///
/// The sign is -1, 0, or 1, and is 0 exactly when the limbs are all
/// zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedInt {
    /// Sign of the value.
    pub sign: i32,
    /// Magnitude as little-endian limbs.
    pub limbs: Vec<Limb>,
}

impl SignedInt {
    /// Returns a zero-valued instance with the given number of limbs.
    pub fn with_len(len: usize) -> SignedInt {
        SignedInt { sign: 0, limbs: vec![0; len] }
    }

    /// Returns an instance with the given sign and magnitude, fixing the
    /// sign to 0 for a zero magnitude.
    pub fn new(sign: i32, limbs: Vec<Limb>) -> SignedInt {
        debug_assert!((-1..=1).contains(&sign));
        let sign = if limb::is_zero(&limbs) { 0 } else { sign };
        SignedInt { sign, limbs }
    }
}

/// Returns the sign of a word as -1, 0, or 1.
fn sign_of(n: i64) -> i32 {
    match n.cmp(&0) {
        Ordering::Greater => 1,
        Ordering::Equal => 0,
        Ordering::Less => -1,
    }
}

/// Truncates the limbs of a to the shortest array representing the same
/// magnitude in two's complement.
pub fn normalize(a: &mut SignedInt) {
    limb::normalize(&mut a.limbs);
}

/// Resizes the limbs of a to the given length.
pub fn resize(a: &mut SignedInt, len: usize) {
    limb::resize(&mut a.limbs, len);
    if limb::is_zero(&a.limbs) {
        a.sign = 0;
    }
}

/// Sets a = b, truncating or zero-padding to the length of a.
pub fn set(a: &mut SignedInt, b: &SignedInt) {
    a.sign = b.sign;
    limb::set(&mut a.limbs, &b.limbs);
}

/// Sets a to a word value with |b| < 2^WORDSIZE.
pub fn set_word(a: &mut SignedInt, b: i64) {
    debug_assert!(b.unsigned_abs() <= MASK_ALL as u64);
    a.sign = sign_of(b);
    limb::set_zero(&mut a.limbs);
    a.limbs[0] = b.unsigned_abs() as Limb;
}

/// Compares a and b as signed integers.
pub fn cmp(a: &SignedInt, b: &SignedInt) -> Ordering {
    match a.sign.cmp(&b.sign) {
        Ordering::Equal => {}
        ord => return ord,
    }
    if a.sign == 0 {
        return Ordering::Equal;
    }
    let mag = limb::cmp(&a.limbs, &b.limbs);
    if a.sign > 0 {
        mag
    } else {
        mag.reverse()
    }
}

/// Checks whether a and b represent the same integer.
pub fn equals(a: &SignedInt, b: &SignedInt) -> bool {
    a.sign == b.sign && limb::cmp(&a.limbs, &b.limbs) == Ordering::Equal
}

/// Checks whether a is zero.
pub fn is_zero(a: &SignedInt) -> bool {
    a.sign == 0
}

/// Checks whether a is one.
pub fn is_one(a: &SignedInt) -> bool {
    a.sign == 1 && a.limbs[0] == 1 && limb::msword(&a.limbs) == 0
}

/// Shifts a left within its allocated limbs.
pub fn shift_left(a: &mut SignedInt, offset: usize) {
    limb::shift_left(&mut a.limbs, offset);
    if limb::is_zero(&a.limbs) {
        a.sign = 0;
    }
}

/// Shifts a right within its allocated limbs.
pub fn shift_right(a: &mut SignedInt, offset: usize) {
    limb::shift_right(&mut a.limbs, offset);
    if limb::is_zero(&a.limbs) {
        a.sign = 0;
    }
}

/// Sets a = b + c. The limbs of a must hold the magnitude of the
/// result, including a carry limb when the signs of b and c are equal.
pub fn add(a: &mut SignedInt, b: &SignedInt, c: &SignedInt) {
    if b.sign == c.sign {
        limb::add(&mut a.limbs, &b.limbs, &c.limbs);
        a.sign = b.sign;
    } else if limb::cmp(&b.limbs, &c.limbs) != Ordering::Less {
        limb::sub(&mut a.limbs, &b.limbs, &c.limbs);
        a.sign = b.sign;
    } else {
        limb::sub(&mut a.limbs, &c.limbs, &b.limbs);
        a.sign = c.sign;
    }
    if limb::is_zero(&a.limbs) {
        a.sign = 0;
    }
}

/// Sets a = b - c with the same space requirements as [`add`].
pub fn sub(a: &mut SignedInt, b: &SignedInt, c: &SignedInt) {
    if b.sign == c.sign {
        if limb::cmp(&b.limbs, &c.limbs) != Ordering::Less {
            limb::sub(&mut a.limbs, &b.limbs, &c.limbs);
            a.sign = b.sign;
        } else {
            limb::sub(&mut a.limbs, &c.limbs, &b.limbs);
            a.sign = -b.sign;
        }
    } else {
        limb::add(&mut a.limbs, &b.limbs, &c.limbs);
        a.sign = if b.sign == 0 { -c.sign } else { b.sign };
    }
    if limb::is_zero(&a.limbs) {
        a.sign = 0;
    }
}

/// Sets a = a + c in place, where the limbs of a must hold the result
/// and at least as many limbs as c.
pub fn add_assign(a: &mut SignedInt, c: &SignedInt) {
    if a.sign == c.sign {
        limb::add_assign(&mut a.limbs, &c.limbs);
    } else if limb::cmp(&a.limbs, &c.limbs) != Ordering::Less {
        limb::sub_assign(&mut a.limbs, &c.limbs);
    } else {
        limb::rsub_assign(&mut a.limbs, &c.limbs);
        a.sign = c.sign;
    }
    if limb::is_zero(&a.limbs) {
        a.sign = 0;
    }
}

/// Sets a = a - c in place with the same space requirements as
/// [`add_assign`].
pub fn sub_assign(a: &mut SignedInt, c: &SignedInt) {
    if a.sign == -c.sign {
        limb::add_assign(&mut a.limbs, &c.limbs);
        if a.sign == 0 {
            a.sign = -c.sign;
        }
    } else if limb::cmp(&a.limbs, &c.limbs) != Ordering::Less {
        limb::sub_assign(&mut a.limbs, &c.limbs);
    } else {
        limb::rsub_assign(&mut a.limbs, &c.limbs);
        a.sign = -c.sign;
    }
    if limb::is_zero(&a.limbs) {
        a.sign = 0;
    }
}

/// Sets a = b * c, where a is distinct from both factors and its limbs
/// hold the full product.
pub fn mul(a: &mut SignedInt, b: &SignedInt, c: &SignedInt) {
    limb::mul(&mut a.limbs, &b.limbs, &c.limbs);
    a.sign = b.sign * c.sign;
}

/// Sets a = a * c in place for a word c with |c| < 2^WORDSIZE. The top
/// limb of a must have room for the scaled value.
pub fn mul_word_assign(a: &mut SignedInt, c: i64) {
    debug_assert!(c.unsigned_abs() <= MASK_ALL as u64);
    let cv = c.unsigned_abs();
    let mut carry: u64 = 0;
    for limb in a.limbs.iter_mut() {
        let tmp = *limb as u64 * cv + carry;
        *limb = (tmp & MASK_ALL as u64) as Limb;
        carry = tmp >> limb::WORDSIZE;
    }
    debug_assert!(carry == 0);
    a.sign *= sign_of(c);
    if limb::is_zero(&a.limbs) {
        a.sign = 0;
    }
}

/// Sets a = b^2, where a is distinct from b and its limbs hold the full
/// square.
pub fn square(a: &mut SignedInt, b: &SignedInt) {
    limb::square(&mut a.limbs, &b.limbs);
    a.sign = b.sign * b.sign;
}

/// Computes q and r such that b = q * d + r rounded toward negative
/// infinity, so 0 <= r < d for a positive divisor d, and sets a = r in
/// place of the dividend. The divisor is given in prepared form together
/// with its sign.
///
/// The limbs of a must have two zero words above the dividend and at
/// least one limb more than the divisor; q must hold the quotient and a
/// carry limb.
pub fn div_qr_prepared(q: &mut SignedInt, a: &mut SignedInt, d: &PreparedDivisor, dsign: i32) {
    debug_assert!(dsign != 0);

    let asign = a.sign;
    limb::div_qr(&mut q.limbs, &mut a.limbs, d);

    if limb::is_zero(&a.limbs) {
        q.sign = asign * dsign;
        a.sign = 0;
    } else if asign * dsign == 1 {
        q.sign = 1;
        a.sign = asign;
    } else {
        // Round the quotient down and flip the remainder so that it
        // takes the sign of the divisor. The remainder is smaller than
        // the divisor and a has a limb to spare, so this is safe.
        debug_assert!(a.limbs.len() > d.divisor().len());
        limb::rsub_assign(&mut a.limbs, d.divisor());
        limb::add_assign(&mut q.limbs, &[1]);
        q.sign = asign * dsign;
        a.sign = dsign;
    }
    if limb::is_zero(&q.limbs) {
        q.sign = 0;
    }
}

/// Computes q and r as in [`div_qr_prepared`] for a plain divisor.
pub fn div_qr(q: &mut SignedInt, a: &mut SignedInt, b: &SignedInt) {
    let d = PreparedDivisor::new(&b.limbs);
    div_qr_prepared(q, a, &d, b.sign);
}

/// Sets a = b mod c with 0 <= a < c for a positive modulus c.
pub fn rem(a: &mut SignedInt, b: &SignedInt, c: &SignedInt) {
    let rlen = b.limbs.len().max(c.limbs.len()) + 2;
    let mut r = SignedInt::with_len(rlen);
    set(&mut r, b);
    let mut q = SignedInt::with_len(rlen + 1);
    div_qr(&mut q, &mut r, c);
    set(a, &r);
}

/// Sets a = a mod c in place with 0 <= a < c for a positive modulus c.
pub fn rem_assign(a: &mut SignedInt, c: &SignedInt) {
    let b = a.clone();
    rem(a, &b, c);
}

/// Sets w = b^e mod m for b >= 0, e >= 0, and m >= 1. The limbs of w
/// must hold a reduced value, i.e. as many limbs as m.
pub fn modpow(w: &mut SignedInt, b: &SignedInt, e: &SignedInt, m: &SignedInt) {
    debug_assert!(b.sign >= 0 && e.sign >= 0 && m.sign == 1);

    let mlen = m.limbs.len();
    let d = PreparedDivisor::new(&m.limbs);

    // Reduce the basis so the kernel sees operands of the length of the
    // modulus regardless of how the caller sized its buffers.
    let mut base = b.limbs.clone();
    base.resize(base.len().max(mlen) + 2, 0);
    let mut q = vec![0; base.len() + 1];
    limb::div_qr(&mut q, &mut base, &d);
    base.resize(mlen, 0);

    let mut out = vec![0; mlen];
    limb::modpow(&mut out, &base, &e.limbs, &d);

    limb::set(&mut w.limbs, &out);
    w.sign = if limb::is_zero(&w.limbs) { 0 } else { 1 };
}

// Inner halving step of the binary extended gcd (HAC 14.61). Divides u
// by two until it is odd, updating the coefficients A and B so that
// A * x + B * y = u is preserved.
fn egcd_binary_reduce(u: &mut SignedInt, a: &mut SignedInt, b: &mut SignedInt, x: &SignedInt, y: &SignedInt) {
    while u.limbs[0] & 1 == 0 {
        shift_right(u, 1);

        if a.limbs[0] & 1 == 0 && b.limbs[0] & 1 == 0 {
            shift_right(a, 1);
            shift_right(b, 1);
        } else {
            add_assign(a, y);
            shift_right(a, 1);

            sub_assign(b, x);
            shift_right(b, 1);
        }
    }
}

/// Sets a, b, and v such that a * x + b * y = v, where v is the greatest
/// common divisor of x and y, using the binary method (HAC 14.61, 5th
/// printing with errata). Sets all three to zero when either input is
/// zero.
pub fn egcd(a: &mut SignedInt, b: &mut SignedInt, v: &mut SignedInt, x: &SignedInt, y: &SignedInt) {
    if is_zero(x) || is_zero(y) {
        set_word(a, 0);
        set_word(b, 0);
        set_word(v, 0);
        return;
    }

    let len = x.limbs.len().max(y.limbs.len()) + 1;

    let mut xs = SignedInt::with_len(len);
    let mut ys = SignedInt::with_len(len);
    let mut ca = SignedInt::with_len(len);
    let mut cb = SignedInt::with_len(len);
    let mut cc = SignedInt::with_len(len);
    let mut cd = SignedInt::with_len(len);
    let mut u = SignedInt::with_len(len);

    set(&mut xs, x);
    set(&mut ys, y);

    set_word(&mut ca, 1);
    set_word(&mut cb, 0);
    set_word(&mut cc, 0);
    set_word(&mut cd, 1);

    // Extract all common factors of two.
    let common_twos = limb::lsbit(&xs.limbs).min(limb::lsbit(&ys.limbs));
    shift_right(&mut xs, common_twos);
    shift_right(&mut ys, common_twos);

    set(&mut u, &xs);
    set(v, &ys);

    while !is_zero(&u) {
        egcd_binary_reduce(&mut u, &mut ca, &mut cb, &xs, &ys);
        egcd_binary_reduce(v, &mut cc, &mut cd, &xs, &ys);

        if cmp(&u, v) != Ordering::Less {
            sub_assign(&mut u, v);
            sub_assign(&mut ca, &cc);
            sub_assign(&mut cb, &cd);
        } else {
            sub_assign(v, &u);
            sub_assign(&mut cc, &ca);
            sub_assign(&mut cd, &cb);
        }
    }

    set(a, &cc);
    set(b, &cd);

    shift_left(v, common_twos);
}

/// Sets w such that w * x = 1 mod p for an odd prime p.
pub fn modinv(w: &mut SignedInt, x: &SignedInt, p: &SignedInt) {
    let len = p.limbs.len().max(x.limbs.len());

    let mut a = SignedInt::with_len(len);
    let mut b = SignedInt::with_len(len);
    let mut v = SignedInt::with_len(len);

    egcd(&mut a, &mut b, &mut v, x, p);

    if a.sign < 0 {
        add(w, p, &a);
    } else {
        set(w, &a);
    }
}

/// Returns the Legendre symbol of a modulo an odd prime b. This is
/// essentially a gcd computation that keeps track of the symbol
/// (HAC 2.149).
pub fn legendre(a: &SignedInt, b: &SignedInt) -> i32 {
    let len = a.limbs.len().max(b.limbs.len()) + 1;
    let mut a = SignedInt { sign: a.sign, limbs: { let mut l = a.limbs.clone(); l.resize(len, 0); l } };
    let mut b = SignedInt { sign: b.sign, limbs: { let mut l = b.limbs.clone(); l.resize(len, 0); l } };

    let mut s = 1;
    loop {
        if is_zero(&a) {
            return 0;
        } else if is_one(&a) {
            return s;
        }

        // a = 2^e * a'
        let e = limb::lsbit(&a.limbs);
        shift_right(&mut a, e);

        let aw = a.limbs[0];
        let bw = b.limbs[0];

        // Flip the symbol for odd powers of two when b = 3, 5 mod 8 and
        // by reciprocity when a = b = 3 mod 4.
        if e % 2 == 1 && (bw % 8 == 3 || bw % 8 == 5) {
            s = -s;
        }
        if bw % 4 == 3 && aw % 4 == 3 {
            s = -s;
        }

        if is_one(&a) {
            return s;
        }

        rem_assign(&mut b, &a);
        std::mem::swap(&mut a, &mut b);
    }
}

/// Sets w to a square root of x modulo a positive odd prime p by the
/// Tonelli-Shanks algorithm, assuming that x is a quadratic residue.
pub fn modsqrt(w: &mut SignedInt, x: &SignedInt, p: &SignedInt) {
    let len = (2 * (limb::msword(&p.limbs) + 1)).max(p.limbs.len() + 1);

    let mut one = SignedInt::with_len(1);
    set_word(&mut one, 1);
    let mut two = SignedInt::with_len(1);
    set_word(&mut two, 2);

    let mut a = SignedInt::with_len(len);
    let mut n = SignedInt::with_len(len);
    let mut v = SignedInt::with_len(len);
    let mut k = SignedInt::with_len(len);
    let mut r = SignedInt::with_len(len);
    let mut z = SignedInt::with_len(len);
    let mut c = SignedInt::with_len(len);
    let mut tmp = SignedInt::with_len(len);

    rem(&mut a, x, p);

    if is_zero(&a) {
        set_word(w, 0);
        return;
    }

    if equals(p, &two) {
        set(w, &a);
        return;
    }

    // For p = 3 mod 4 a square root is a^((p + 1) / 4) mod p.
    if p.limbs[0] & 0x3 == 0x3 {
        add(&mut v, p, &one);
        shift_right(&mut v, 2);
        modpow(w, &a, &v, p);
        return;
    }

    // Write p = 2^s * (2k + 1) + 1.
    sub(&mut k, p, &one);
    let mut s = limb::lsbit(&k.limbs);
    shift_right(&mut k, s);
    sub_assign(&mut k, &one);
    shift_right(&mut k, 1);

    // r = a^k mod p, n = r^2 * a mod p, r = r * a mod p.
    modpow(&mut r, &a, &k, p);

    mul(&mut tmp, &r, &r);
    rem(&mut n, &tmp, p);

    mul(&mut tmp, &n, &a);
    rem(&mut n, &tmp, p);

    mul(&mut tmp, &r, &a);
    rem(&mut r, &tmp, p);

    if is_one(&n) {
        set(w, &r);
        return;
    }

    // Find a quadratic non-residue z.
    set_word(&mut z, 2);
    while legendre(&z, p) == 1 {
        add_assign(&mut z, &one);
    }

    // c = z^(2k + 1) mod p.
    set(&mut v, &k);
    shift_left(&mut v, 1);
    add_assign(&mut v, &one);
    modpow(&mut c, &z, &v, p);

    while cmp(&n, &one) == Ordering::Greater {
        // Order of n is 2^s with s below the previous order exponent t.
        set(&mut k, &n);
        let t = s;
        s = 0;
        while !is_one(&k) {
            mul(&mut tmp, &k, &k);
            rem(&mut k, &tmp, p);
            s += 1;
        }

        // c = c^(2^(t - s - 1)) mod p.
        set(&mut v, &one);
        shift_left(&mut v, t - s - 1);
        modpow(&mut tmp, &c, &v, p);
        set(&mut c, &tmp);

        mul(&mut tmp, &r, &c);
        rem(&mut r, &tmp, p);

        mul(&mut tmp, &c, &c);
        rem(&mut c, &tmp, p);

        mul(&mut tmp, &n, &c);
        rem(&mut n, &tmp, p);
    }
    set(w, &r);
}

/// Returns a raw hexadecimal representation of a with a leading "-" for
/// negative values and unused bits of each limb dropped.
pub fn to_hex(a: &SignedInt) -> String {
    let mut bytes = limb::to_bytes_le(&a.limbs);
    while bytes.len() > 1 && bytes[bytes.len() - 1] == 0 {
        bytes.pop();
    }
    let mut s = String::with_capacity(2 * bytes.len() + 1);
    if a.sign < 0 {
        s.push('-');
    }
    for b in bytes.iter().rev() {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_i64(v: i64, len: usize) -> SignedInt {
        let mut a = SignedInt::with_len(len);
        let sign = if v > 0 {
            1
        } else if v < 0 {
            -1
        } else {
            0
        };
        let mut mag = v.unsigned_abs();
        let mut i = 0;
        while mag > 0 {
            a.limbs[i] = (mag & MASK_ALL as u64) as Limb;
            mag >>= limb::WORDSIZE;
            i += 1;
        }
        a.sign = sign;
        a
    }

    fn to_i64(a: &SignedInt) -> i64 {
        // Accumulate in i128 so instances of four or more limbs do not
        // overflow the shift.
        let mut v: i128 = 0;
        for (i, &limb) in a.limbs.iter().enumerate() {
            v += (limb as i128) << (i * limb::WORDSIZE);
        }
        (v * a.sign as i128) as i64
    }

    #[test]
    fn test_add_sign_grid() {
        for x in [-9i64, -3, 0, 3, 9] {
            for y in [-7i64, -2, 0, 2, 7] {
                let b = from_i64(x, 3);
                let c = from_i64(y, 3);
                let mut a = SignedInt::with_len(4);
                add(&mut a, &b, &c);
                assert_eq!(to_i64(&a), x + y, "{} + {}", x, y);

                let mut d = SignedInt::with_len(4);
                sub(&mut d, &b, &c);
                assert_eq!(to_i64(&d), x - y, "{} - {}", x, y);

                let mut e = from_i64(x, 4);
                add_assign(&mut e, &c);
                assert_eq!(to_i64(&e), x + y, "{} += {}", x, y);

                let mut f = from_i64(x, 4);
                sub_assign(&mut f, &c);
                assert_eq!(to_i64(&f), x - y, "{} -= {}", x, y);
            }
        }
    }

    #[test]
    fn test_mul_signs() {
        for x in [-5i64, 0, 5] {
            for y in [-4i64, 0, 4] {
                let b = from_i64(x, 2);
                let c = from_i64(y, 2);
                let mut a = SignedInt::with_len(4);
                mul(&mut a, &b, &c);
                assert_eq!(to_i64(&a), x * y, "{} * {}", x, y);
            }
        }
    }

    #[test]
    fn test_mul_word_assign() {
        let mut a = from_i64(1000, 3);
        mul_word_assign(&mut a, -3);
        assert_eq!(to_i64(&a), -3000);
        mul_word_assign(&mut a, 0);
        assert_eq!(a.sign, 0);
        assert!(limb::is_zero(&a.limbs));
    }

    #[test]
    fn test_floor_division() {
        // Quotients round toward negative infinity and remainders take
        // the sign of the divisor.
        let cases = [
            (7i64, 3i64, 2i64, 1i64),
            (-7, 3, -3, 2),
            (7, -3, -3, -2),
            (-7, -3, 2, -1),
            (6, 3, 2, 0),
            (-6, 3, -2, 0),
            (-1000000007, -97, 10309278, -41),
        ];
        for (x, y, expect_q, expect_r) in cases {
            let mut a = from_i64(x, 4);
            let b = from_i64(y, 1);
            let mut q = SignedInt::with_len(5);
            div_qr(&mut q, &mut a, &b);
            assert_eq!(to_i64(&q), expect_q, "{} / {}", x, y);
            assert_eq!(to_i64(&a), expect_r, "{} mod {}", x, y);
        }
    }

    #[test]
    fn test_egcd_bezout() {
        let cases = [(240i64, 46i64), (17, 31), (12, 18), (1, 977), (1000, 1)];
        for (xv, yv) in cases {
            let x = from_i64(xv, 3);
            let y = from_i64(yv, 3);
            let mut a = SignedInt::with_len(5);
            let mut b = SignedInt::with_len(5);
            let mut v = SignedInt::with_len(5);
            egcd(&mut a, &mut b, &mut v, &x, &y);
            let g = to_i64(&v);
            assert!(g > 0);
            assert_eq!(xv % g, 0);
            assert_eq!(yv % g, 0);
            assert_eq!(to_i64(&a) * xv + to_i64(&b) * yv, g, "egcd({}, {})", xv, yv);
        }
    }

    #[test]
    fn test_egcd_zero_inputs() {
        let x = from_i64(0, 2);
        let y = from_i64(5, 2);
        let mut a = SignedInt::with_len(3);
        let mut b = SignedInt::with_len(3);
        let mut v = SignedInt::with_len(3);
        egcd(&mut a, &mut b, &mut v, &x, &y);
        assert!(is_zero(&a) && is_zero(&b) && is_zero(&v));
    }

    #[test]
    fn test_modinv() {
        let p = from_i64(977, 2);
        for xv in [1i64, 2, 3, 50, 976] {
            let x = from_i64(xv, 2);
            let mut w = SignedInt::with_len(4);
            modinv(&mut w, &x, &p);
            assert_eq!(to_i64(&w) * xv % 977, 1, "inverse of {}", xv);
        }
    }

    #[test]
    fn test_modpow_small() {
        let m = from_i64(1000003, 2);
        let b = from_i64(2, 2);
        let e = from_i64(20, 2);
        let mut w = SignedInt::with_len(2);
        modpow(&mut w, &b, &e, &m);
        assert_eq!(to_i64(&w), (1 << 20) % 1000003);
    }

    #[test]
    fn test_legendre_p23() {
        // Quadratic residues modulo 23: 1, 2, 3, 4, 6, 8, 9, 12, 13, 16, 18.
        let p = from_i64(23, 1);
        let residues = [1i64, 2, 3, 4, 6, 8, 9, 12, 13, 16, 18];
        for a in 1i64..23 {
            let expect = if residues.contains(&a) { 1 } else { -1 };
            assert_eq!(legendre(&from_i64(a, 1), &p), expect, "({} | 23)", a);
        }
        assert_eq!(legendre(&from_i64(0, 1), &p), 0);
    }

    #[test]
    fn test_modsqrt_three_mod_four() {
        // 23 = 3 mod 4.
        let p = from_i64(23, 1);
        for a in [1i64, 2, 3, 4, 6, 8, 9, 12, 13, 16, 18] {
            let mut w = SignedInt::with_len(4);
            modsqrt(&mut w, &from_i64(a, 1), &p);
            let r = to_i64(&w);
            assert_eq!(r * r % 23, a, "sqrt of {} mod 23", a);
        }
    }

    #[test]
    fn test_modsqrt_one_mod_four() {
        // 29 = 1 mod 4 exercises the general Tonelli-Shanks loop.
        let p = from_i64(29, 1);
        for a in 1i64..29 {
            let sq = a * a % 29;
            let mut w = SignedInt::with_len(4);
            modsqrt(&mut w, &from_i64(sq, 1), &p);
            let r = to_i64(&w);
            assert_eq!(r * r % 29, sq, "sqrt of {} mod 29", sq);
        }
    }

    #[test]
    fn test_modsqrt_of_zero() {
        let p = from_i64(29, 1);
        let mut w = SignedInt::with_len(4);
        modsqrt(&mut w, &from_i64(0, 1), &p);
        assert!(is_zero(&w));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&from_i64(0, 2)), "00");
        assert_eq!(to_hex(&from_i64(255, 2)), "ff");
        assert_eq!(to_hex(&from_i64(-4096, 2)), "-1000");
    }
}
