//! Elliptic curves over prime fields in Jacobian coordinates.
//!
//! A point (X, Y, Z) with Z nonzero represents the affine point
//! (X / Z^2, Y / Z^3), so additions and doublings need no field
//! inversions. The point at infinity is (0, 1, 0). A [`Curve`] owns the
//! prepared divisor for its modulus and the scratch space of the
//! formulas, so group operations take the curve mutably and do not
//! allocate. Doubling uses the formulas of Bernstein (2001) when
//! a = -3 mod p and those of Cohen, Miyaji, and Ono (1998) otherwise,
//! and addition the latter.

use serde::{Deserialize, Serialize};
use std::mem;

use crate::error::ArithError;
use crate::integer::LargeInt;
use crate::limb::{self, PreparedDivisor};
use crate::signed::{self, SignedInt};

/// Point on a [`Curve`] in Jacobian coordinates.
///
/// A point carries no reference to its curve. It is the responsibility
/// of the caller to pass points only to the curve they belong to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Point {
    x: SignedInt,
    y: SignedInt,
    z: SignedInt,
}

impl Point {
    /// Checks whether this is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.z.sign == 0
    }
}

/// Curve parameters in reduced form.
struct CurveParams {
    modulus: LargeInt,
    a: LargeInt,
    b: LargeInt,
    d: PreparedDivisor,
    /// Limb length of point coordinates and scratch, with room for an
    /// unreduced product of two reduced values and division guards.
    len: usize,
    a_eq_neg3: bool,
}

/// Scratch space of the point formulas, sized to [`CurveParams::len`].
struct Workspace {
    t1: SignedInt,
    t2: SignedInt,
    t3: SignedInt,
    u1: SignedInt,
    u2: SignedInt,
    s1: SignedInt,
    s2: SignedInt,
    h: SignedInt,
    r: SignedInt,
    rx: SignedInt,
    ry: SignedInt,
    rz: SignedInt,
    q: SignedInt,
}

impl Workspace {
    fn new(len: usize) -> Workspace {
        Workspace {
            t1: SignedInt::with_len(len),
            t2: SignedInt::with_len(len),
            t3: SignedInt::with_len(len),
            u1: SignedInt::with_len(len),
            u2: SignedInt::with_len(len),
            s1: SignedInt::with_len(len),
            s2: SignedInt::with_len(len),
            h: SignedInt::with_len(len),
            r: SignedInt::with_len(len),
            rx: SignedInt::with_len(len),
            ry: SignedInt::with_len(len),
            rz: SignedInt::with_len(len),
            q: SignedInt::with_len(len + 2),
        }
    }
}

/// Elliptic curve y^2 = x^3 + a * x + b over the prime field of the
/// modulus.
pub struct Curve {
    params: CurveParams,
    ws: Workspace,
}

/// Reduces a into [0, m) in place. The limbs of a must have two zero
/// words above the value.
fn reduce(a: &mut SignedInt, d: &PreparedDivisor, q: &mut SignedInt) {
    signed::div_qr_prepared(q, a, d, 1);
}

/// Sets w = x * y mod m, where w is distinct from both factors.
fn mulmod(w: &mut SignedInt, x: &SignedInt, y: &SignedInt, d: &PreparedDivisor, q: &mut SignedInt) {
    signed::mul(w, x, y);
    reduce(w, d, q);
}

fn infinity_point(len: usize) -> Point {
    let mut y = SignedInt::with_len(len);
    signed::set_word(&mut y, 1);
    Point { x: SignedInt::with_len(len), y, z: SignedInt::with_len(len) }
}

fn set_infinity(a: &mut Point) {
    signed::set_word(&mut a.x, 0);
    signed::set_word(&mut a.y, 1);
    signed::set_word(&mut a.z, 0);
}

fn set_point(a: &mut Point, b: &Point) {
    signed::set(&mut a.x, &b.x);
    signed::set(&mut a.y, &b.y);
    signed::set(&mut a.z, &b.z);
}

// Sets a = b + c (add-1998-cmo-2). The result point must be distinct
// from both inputs; the inputs may be equal.
fn jadd(p: &CurveParams, ws: &mut Workspace, a: &mut Point, b: &Point, c: &Point) {
    if b.is_infinity() {
        set_point(a, c);
        return;
    }
    if c.is_infinity() {
        set_point(a, b);
        return;
    }

    // U1 = Bx * Cz^2, U2 = Cx * Bz^2, S1 = By * Cz^3, S2 = Cy * Bz^3.
    mulmod(&mut ws.t1, &c.z, &c.z, &p.d, &mut ws.q);
    mulmod(&mut ws.s2, &ws.t1, &c.z, &p.d, &mut ws.q);
    mulmod(&mut ws.t2, &b.z, &b.z, &p.d, &mut ws.q);
    mulmod(&mut ws.t3, &ws.t2, &b.z, &p.d, &mut ws.q);

    mulmod(&mut ws.u1, &b.x, &ws.t1, &p.d, &mut ws.q);
    signed::mul(&mut ws.u2, &c.x, &ws.t2);
    mulmod(&mut ws.s1, &b.y, &ws.s2, &p.d, &mut ws.q);
    signed::mul(&mut ws.s2, &c.y, &ws.t3);

    // H = U2 - U1 and r = S2 - S1.
    signed::sub(&mut ws.h, &ws.u2, &ws.u1);
    reduce(&mut ws.h, &p.d, &mut ws.q);
    signed::sub(&mut ws.r, &ws.s2, &ws.s1);
    reduce(&mut ws.r, &p.d, &mut ws.q);

    // Equal x coordinates mean the points are equal or inverses.
    if signed::is_zero(&ws.h) {
        if signed::is_zero(&ws.r) {
            jdbl(p, ws, a, b);
        } else {
            set_infinity(a);
        }
        return;
    }

    // x = r^2 - H^3 - 2 * U1 * H^2.
    signed::mul(&mut ws.t1, &ws.r, &ws.r);
    mulmod(&mut ws.t2, &ws.h, &ws.h, &p.d, &mut ws.q);
    mulmod(&mut ws.t3, &ws.t2, &ws.h, &p.d, &mut ws.q);
    signed::sub(&mut ws.rx, &ws.t1, &ws.t3);
    signed::mul(&mut ws.t1, &ws.u1, &ws.t2);
    signed::shift_left(&mut ws.t1, 1);
    signed::sub_assign(&mut ws.rx, &ws.t1);
    reduce(&mut ws.rx, &p.d, &mut ws.q);

    // y = r * (U1 * H^2 - x) - S1 * H^3.
    mulmod(&mut ws.t1, &ws.u1, &ws.t2, &p.d, &mut ws.q);
    signed::sub_assign(&mut ws.t1, &ws.rx);
    mulmod(&mut ws.u2, &ws.r, &ws.t1, &p.d, &mut ws.q);
    mulmod(&mut ws.t2, &ws.s1, &ws.t3, &p.d, &mut ws.q);
    signed::sub(&mut ws.ry, &ws.u2, &ws.t2);
    reduce(&mut ws.ry, &p.d, &mut ws.q);

    // z = Bz * Cz * H.
    mulmod(&mut ws.rz, &b.z, &c.z, &p.d, &mut ws.q);
    mulmod(&mut ws.t1, &ws.rz, &ws.h, &p.d, &mut ws.q);
    signed::set(&mut ws.rz, &ws.t1);

    signed::set(&mut a.x, &ws.rx);
    signed::set(&mut a.y, &ws.ry);
    signed::set(&mut a.z, &ws.rz);
}

// Sets a = 2 * b for a distinct from b.
fn jdbl(p: &CurveParams, ws: &mut Workspace, a: &mut Point, b: &Point) {
    // A point of order two doubles to infinity.
    if b.is_infinity() || signed::is_zero(&b.y) {
        set_infinity(a);
        return;
    }
    if p.a_eq_neg3 {
        jdbl_a_eq_neg3(p, ws, a, b);
    } else {
        jdbl_generic(p, ws, a, b);
    }
}

// Doubling for arbitrary a (dbl-1998-cmo-2).
fn jdbl_generic(p: &CurveParams, ws: &mut Workspace, a: &mut Point, b: &Point) {
    // S = 4 * Bx * By^2.
    mulmod(&mut ws.t1, &b.y, &b.y, &p.d, &mut ws.q);
    signed::mul(&mut ws.u1, &ws.t1, &b.x);
    signed::shift_left(&mut ws.u1, 2);
    reduce(&mut ws.u1, &p.d, &mut ws.q);

    // M = 3 * Bx^2 + a * Bz^4.
    mulmod(&mut ws.t2, &b.z, &b.z, &p.d, &mut ws.q);
    mulmod(&mut ws.t1, &b.x, &b.x, &p.d, &mut ws.q);
    signed::mul_word_assign(&mut ws.t1, 3);
    reduce(&mut ws.t1, &p.d, &mut ws.q);
    mulmod(&mut ws.t3, &ws.t2, &ws.t2, &p.d, &mut ws.q);
    signed::mul(&mut ws.u2, &ws.t3, &p.a.inner);
    reduce(&mut ws.u2, &p.d, &mut ws.q);
    signed::add_assign(&mut ws.u2, &ws.t1);
    reduce(&mut ws.u2, &p.d, &mut ws.q);

    // x = T = M^2 - 2 * S.
    signed::mul(&mut ws.s1, &ws.u2, &ws.u2);
    signed::set(&mut ws.t2, &ws.u1);
    signed::shift_left(&mut ws.t2, 1);
    signed::sub_assign(&mut ws.s1, &ws.t2);
    reduce(&mut ws.s1, &p.d, &mut ws.q);
    signed::set(&mut ws.rx, &ws.s1);

    // y = M * (S - T) - 8 * By^4.
    signed::sub(&mut ws.t1, &ws.u1, &ws.s1);
    mulmod(&mut ws.t3, &ws.t1, &ws.u2, &p.d, &mut ws.q);
    mulmod(&mut ws.t1, &b.y, &b.y, &p.d, &mut ws.q);
    signed::mul(&mut ws.t2, &ws.t1, &ws.t1);
    signed::shift_left(&mut ws.t2, 3);
    reduce(&mut ws.t2, &p.d, &mut ws.q);
    signed::sub(&mut ws.ry, &ws.t3, &ws.t2);
    reduce(&mut ws.ry, &p.d, &mut ws.q);

    // z = 2 * By * Bz.
    signed::mul(&mut ws.rz, &b.y, &b.z);
    signed::shift_left(&mut ws.rz, 1);
    reduce(&mut ws.rz, &p.d, &mut ws.q);

    signed::set(&mut a.x, &ws.rx);
    signed::set(&mut a.y, &ws.ry);
    signed::set(&mut a.z, &ws.rz);
}

// Doubling for a = -3 mod p (dbl-2001-b).
fn jdbl_a_eq_neg3(p: &CurveParams, ws: &mut Workspace, a: &mut Point, b: &Point) {
    // delta = Bz^2, gamma = By^2, beta = Bx * gamma.
    mulmod(&mut ws.u1, &b.z, &b.z, &p.d, &mut ws.q);
    mulmod(&mut ws.u2, &b.y, &b.y, &p.d, &mut ws.q);
    mulmod(&mut ws.s1, &b.x, &ws.u2, &p.d, &mut ws.q);

    // alpha = 3 * (Bx - delta) * (Bx + delta).
    signed::sub(&mut ws.t1, &b.x, &ws.u1);
    signed::set(&mut ws.t2, &b.x);
    signed::add_assign(&mut ws.t2, &ws.u1);
    signed::mul_word_assign(&mut ws.t1, 3);
    mulmod(&mut ws.s2, &ws.t1, &ws.t2, &p.d, &mut ws.q);

    // x = alpha^2 - 8 * beta.
    signed::mul(&mut ws.t1, &ws.s2, &ws.s2);
    signed::set(&mut ws.t2, &ws.s1);
    signed::shift_left(&mut ws.t2, 3);
    signed::sub(&mut ws.rx, &ws.t1, &ws.t2);
    reduce(&mut ws.rx, &p.d, &mut ws.q);

    // z = (By + Bz)^2 - gamma - delta.
    signed::set(&mut ws.t1, &b.y);
    signed::add_assign(&mut ws.t1, &b.z);
    signed::mul(&mut ws.t2, &ws.t1, &ws.t1);
    signed::sub_assign(&mut ws.t2, &ws.u2);
    signed::sub_assign(&mut ws.t2, &ws.u1);
    signed::set(&mut ws.rz, &ws.t2);
    reduce(&mut ws.rz, &p.d, &mut ws.q);

    // y = alpha * (4 * beta - x) - 8 * gamma^2.
    signed::set(&mut ws.t1, &ws.s1);
    signed::shift_left(&mut ws.t1, 2);
    signed::sub_assign(&mut ws.t1, &ws.rx);
    mulmod(&mut ws.t2, &ws.t1, &ws.s2, &p.d, &mut ws.q);
    signed::mul(&mut ws.t3, &ws.u2, &ws.u2);
    signed::shift_left(&mut ws.t3, 3);
    signed::sub(&mut ws.ry, &ws.t2, &ws.t3);
    reduce(&mut ws.ry, &p.d, &mut ws.q);

    signed::set(&mut a.x, &ws.rx);
    signed::set(&mut a.y, &ws.ry);
    signed::set(&mut a.z, &ws.rz);
}

// Returns e * b by binary double and add from the most significant bit.
fn jmul(p: &CurveParams, ws: &mut Workspace, b: &Point, e: &SignedInt) -> Point {
    let mut res = infinity_point(p.len);
    if e.sign == 0 {
        return res;
    }

    let mut tmp = infinity_point(p.len);
    let n = limb::msbit(&e.limbs);
    for i in (0..=n).rev() {
        jdbl(p, ws, &mut tmp, &res);
        mem::swap(&mut res, &mut tmp);

        if limb::getbit(&e.limbs, i) == 1 {
            jadd(p, ws, &mut tmp, &res, b);
            mem::swap(&mut res, &mut tmp);
        }
    }
    res
}

// Scales a to z = 1 in place, leaving infinity untouched.
fn affine(p: &CurveParams, ws: &mut Workspace, a: &mut Point) {
    if a.is_infinity() {
        return;
    }

    // x / z^2 and y / z^3 through a single inversion.
    signed::modinv(&mut ws.t1, &a.z, &p.modulus.inner);
    mulmod(&mut ws.t2, &ws.t1, &ws.t1, &p.d, &mut ws.q);
    mulmod(&mut ws.t3, &ws.t2, &ws.t1, &p.d, &mut ws.q);

    mulmod(&mut ws.u1, &a.x, &ws.t2, &p.d, &mut ws.q);
    signed::set(&mut a.x, &ws.u1);
    mulmod(&mut ws.u1, &a.y, &ws.t3, &p.d, &mut ws.q);
    signed::set(&mut a.y, &ws.u1);
    signed::set_word(&mut a.z, 1);
}

impl Curve {
    /// Returns the curve y^2 = x^3 + a * x + b over the prime field of
    /// the modulus.
    ///
    /// Panics on a modulus that is not a positive odd integer or on
    /// coefficients outside [0, modulus).
    pub fn new(modulus: &LargeInt, a: &LargeInt, b: &LargeInt) -> Curve {
        if modulus.sign() != 1 || modulus.get_bit(0) != 1 {
            panic!("modulus is not positive and odd");
        }
        if a.sign() < 0 || a >= modulus || b.sign() < 0 || b >= modulus {
            panic!("coefficient out of range");
        }

        let len = 2 * modulus.inner.limbs.len() + 4;
        let a_eq_neg3 = &a.add(&LargeInt::from_u64(3)) == modulus;
        let d = PreparedDivisor::new(&modulus.inner.limbs);

        Curve {
            params: CurveParams {
                modulus: modulus.clone(),
                a: a.clone(),
                b: b.clone(),
                d,
                len,
                a_eq_neg3,
            },
            ws: Workspace::new(len),
        }
    }

    /// Modulus of the underlying field.
    pub fn modulus(&self) -> &LargeInt {
        &self.params.modulus
    }

    /// Returns the point at infinity.
    pub fn infinity(&self) -> Point {
        infinity_point(self.params.len)
    }

    /// Returns the point with the given affine coordinates after
    /// checking that they are reduced and satisfy the curve equation.
    pub fn point(&self, x: &LargeInt, y: &LargeInt) -> Result<Point, ArithError> {
        let m = &self.params.modulus;
        if x.sign() < 0 || x >= m || y.sign() < 0 || y >= m {
            return Err(ArithError::CoordinateOutOfRange);
        }

        let lhs = y.square().modulo(m);
        let rhs = x.square().mul(x).add(&self.params.a.mul(x)).add(&self.params.b).modulo(m);
        if lhs != rhs {
            return Err(ArithError::PointNotOnCurve);
        }

        let len = self.params.len;
        let mut p = infinity_point(len);
        signed::set(&mut p.x, &x.inner);
        signed::set(&mut p.y, &y.inner);
        signed::set_word(&mut p.z, 1);
        Ok(p)
    }

    /// Sum of the two points.
    pub fn add(&mut self, b: &Point, c: &Point) -> Point {
        let mut res = infinity_point(self.params.len);
        jadd(&self.params, &mut self.ws, &mut res, b, c);
        res
    }

    /// Twice the point.
    pub fn double(&mut self, b: &Point) -> Point {
        let mut res = infinity_point(self.params.len);
        jdbl(&self.params, &mut self.ws, &mut res, b);
        res
    }

    /// Negation of the point.
    pub fn neg(&self, b: &Point) -> Point {
        let mut res = b.clone();
        if !res.is_infinity() && !signed::is_zero(&res.y) {
            let mut y = SignedInt::with_len(self.params.len);
            signed::sub(&mut y, &self.params.modulus.inner, &b.y);
            res.y = y;
        }
        res
    }

    /// Product of the point and a non-negative scalar.
    ///
    /// Panics on a negative scalar.
    pub fn mul(&mut self, b: &Point, scalar: &LargeInt) -> Point {
        if scalar.sign() < 0 {
            panic!("negative scalar");
        }
        jmul(&self.params, &mut self.ws, b, &scalar.inner)
    }

    /// Checks whether the two points are equal as group elements,
    /// regardless of their projective representations.
    pub fn equals(&mut self, b: &Point, c: &Point) -> bool {
        if b.is_infinity() || c.is_infinity() {
            return b.is_infinity() == c.is_infinity();
        }

        let mut bn = b.clone();
        let mut cn = c.clone();
        affine(&self.params, &mut self.ws, &mut bn);
        affine(&self.params, &mut self.ws, &mut cn);
        signed::equals(&bn.x, &cn.x) && signed::equals(&bn.y, &cn.y)
    }

    /// Affine coordinates of the point, or None for the point at
    /// infinity.
    pub fn affine_coordinates(&mut self, b: &Point) -> Option<(LargeInt, LargeInt)> {
        let mut a = b.clone();
        affine(&self.params, &mut self.ws, &mut a);
        if a.is_infinity() {
            return None;
        }
        let x = LargeInt::new(1, a.x.limbs.clone());
        let y = LargeInt::new(1, a.y.limbs.clone());
        Some((x, y))
    }
}
