//! Schoolbook and Karatsuba multiplication and squaring.
//!
//! Inputs above a threshold number of words take one level of Karatsuba
//! splitting with the halves multiplied naively. Scratch space lives in
//! thread-local buffers indexed by recursion depth, so repeated
//! multiplications of same-sized operands allocate nothing.

use std::cell::RefCell;

use super::{add, msword, set_zero, sub, Limb, MASK_ALL, TWO_POW_WORDSIZE, WORDSIZE};

/// Minimal number of words in the left factor before Karatsuba is used.
const KARATSUBA_MUL_THRESHOLD: usize = 24;

/// Minimal number of words before Karatsuba squaring is used.
const KARATSUBA_SQR_THRESHOLD: usize = 35;

/// Smallest allowed ratio of the word lengths of the factors for
/// Karatsuba to be worthwhile.
const KARATSUBA_RELATIVE: f64 = 0.8;

/// Maximal Karatsuba recursion depth for which scratch space exists.
const KARATSUBA_MAX_DEPTH: usize = 3;

/// Returns x * y as a double word.
pub fn word_mul(x: Limb, y: Limb) -> u64 {
    x as u64 * y as u64
}

/// Sets w[i + j] for j in start..end as part of the running computation
/// w = w + x * y * 2^(WORDSIZE * i), where y is a scalar below
/// 2^(WORDSIZE + 1). Returns the output carry, which is below
/// 2^(WORDSIZE + 1) whenever the input carry is.
pub fn muladd_loop(w: &mut [Limb], x: &[Limb], start: usize, end: usize, y: u64, i: usize, c: u64) -> u64 {
    debug_assert!(y < 2 * TWO_POW_WORDSIZE);
    debug_assert!(c < 2 * TWO_POW_WORDSIZE);

    let mut c = c;
    for j in start..end {
        let tmp = x[j] as u64 * y + w[j + i] as u64 + c;
        w[j + i] = (tmp & MASK_ALL as u64) as Limb;
        c = tmp >> WORDSIZE;
    }
    c
}

/// Sets w = x * y by the schoolbook method (HAC 14.12). The destination
/// must hold at least msword(x) + msword(y) + 2 limbs.
pub fn mul_naive(w: &mut [Limb], x: &[Limb], y: &[Limb]) {
    let n = msword(x) + 1;
    let t = msword(y) + 1;
    debug_assert!(w.len() >= n + t);

    set_zero(w);
    for i in 0..t {
        w[i + n] = muladd_loop(w, x, 0, n, y[i] as u64, i, 0) as Limb;
    }
}

/// Sets w = x * x by the schoolbook method (HAC 14.16), doubling the
/// cross products. The destination must hold at least 2 * (msword(x) + 1)
/// limbs.
pub fn square_naive(w: &mut [Limb], x: &[Limb]) {
    let n = msword(x) + 1;
    debug_assert!(w.len() >= 2 * n);

    set_zero(w);

    // The carry out of each muladd_loop is accumulated separately, since
    // letting w[i + n] intermittently hold a (WORDSIZE + 1)-bit value
    // would break the carry bound of the loop.
    let mut sc: u64 = 0;
    for i in 0..n {
        let tmp = w[2 * i] as u64 + x[i] as u64 * x[i] as u64;
        w[2 * i] = (tmp & MASK_ALL as u64) as Limb;
        let c = tmp >> WORDSIZE;

        sc += muladd_loop(w, x, i + 1, n, (x[i] as u64) << 1, i, c);
        w[i + n] = (sc & MASK_ALL as u64) as Limb;
        sc >>= WORDSIZE;
    }
}

/// Splits x into a lower part l and an upper part h of predetermined
/// equal lengths, zero-padding both.
fn karatsuba_split(l: &mut [Limb], h: &mut [Limb], x: &[Limb]) {
    let m = l.len().min(x.len());
    l[..m].copy_from_slice(&x[..m]);
    for limb in l[m..].iter_mut() {
        *limb = 0;
    }

    let top = x.len().min(l.len() + h.len());
    let n = top.saturating_sub(l.len());
    h[..n].copy_from_slice(&x[l.len()..top]);
    for limb in h[n..].iter_mut() {
        *limb = 0;
    }
}

#[derive(Default)]
struct MulScratch {
    hx: Vec<Limb>,
    lx: Vec<Limb>,
    hy: Vec<Limb>,
    ly: Vec<Limb>,
    z2: Vec<Limb>,
    z1: Vec<Limb>,
    z0: Vec<Limb>,
    xsum: Vec<Limb>,
    ysum: Vec<Limb>,
    tmp1: Vec<Limb>,
    tmp2: Vec<Limb>,
}

#[derive(Default)]
struct SqrScratch {
    h: Vec<Limb>,
    l: Vec<Limb>,
    z2: Vec<Limb>,
    z1: Vec<Limb>,
    z0: Vec<Limb>,
    xdif: Vec<Limb>,
}

thread_local! {
    // One scratch set per depth. The recursion is depth first, so the
    // borrow at each depth is released before the same depth is entered
    // again and no overwriting can take place.
    static MUL_SCRATCH: [RefCell<MulScratch>; 3] = Default::default();
    static SQR_SCRATCH: [RefCell<SqrScratch>; 3] = Default::default();
}

fn put(w: &mut [Limb], i: usize, v: Limb) {
    if i < w.len() {
        w[i] = v;
    }
}

fn get(x: &[Limb], i: usize) -> u64 {
    if i < x.len() {
        x[i] as u64
    } else {
        0
    }
}

/// Sets w = x * y with one split into halves of half_len limbs each,
/// where len is the even upper bound on the operand lengths
/// (HAC 14.2). The depth selects the scratch set and must be below
/// [`KARATSUBA_MAX_DEPTH`].
fn mul_karatsuba(w: &mut [Limb], x: &[Limb], y: &[Limb], depth: usize, len: usize) {
    debug_assert!(depth < KARATSUBA_MAX_DEPTH);
    MUL_SCRATCH.with(|scratch| {
        let mut s = scratch[depth].borrow_mut();
        let s = &mut *s;

        set_zero(w);

        let len = len + len % 2;
        let half_len = len / 2;

        if s.hx.len() != half_len {
            s.hx.resize(half_len, 0);
            s.lx.resize(half_len, 0);
            s.hy.resize(half_len, 0);
            s.ly.resize(half_len, 0);

            s.z2.resize(len, 0);
            s.z1.resize(len + 2, 0);
            s.z0.resize(len, 0);

            s.xsum.resize(half_len + 1, 0);
            s.ysum.resize(half_len + 1, 0);

            s.tmp1.resize(len + 2, 0);
            s.tmp2.resize(len + 2, 0);
        }

        karatsuba_split(&mut s.lx, &mut s.hx, x);
        karatsuba_split(&mut s.ly, &mut s.hy, y);

        if depth < 1 {
            mul_naive(&mut s.z2, &s.hx, &s.hy);
            mul_naive(&mut s.z0, &s.lx, &s.ly);
        } else {
            mul_karatsuba(&mut s.z2, &s.hx, &s.hy, depth - 1, half_len);
            mul_karatsuba(&mut s.z0, &s.lx, &s.ly, depth - 1, half_len);
        }

        add(&mut s.xsum, &s.hx, &s.lx);
        add(&mut s.ysum, &s.hy, &s.ly);

        if depth < 1 {
            mul_naive(&mut s.tmp1, &s.xsum, &s.ysum);
        } else {
            mul_karatsuba(&mut s.tmp1, &s.xsum, &s.ysum, depth - 1, half_len + 1);
        }

        // z1 = tmp1 - z2 - z0 is non-negative, so the borrows cancel.
        sub(&mut s.tmp2, &s.tmp1, &s.z2);
        sub(&mut s.z1, &s.tmp2, &s.z0);

        // Combine w = b^2 * z2 + b * z1 + z0 with b = 2^(half_len * WORDSIZE).
        let mut c: u64 = 0;
        for i in 0..half_len {
            put(w, i, s.z0[i]);
        }
        for i in half_len..len {
            let tmp = s.z0[i] as u64 + s.z1[i - half_len] as u64 + c;
            put(w, i, (tmp & MASK_ALL as u64) as Limb);
            c = tmp >> WORDSIZE;
        }
        for i in len..len + half_len + 2 {
            let tmp = s.z1[i - half_len] as u64 + get(&s.z2, i - len) + c;
            put(w, i, (tmp & MASK_ALL as u64) as Limb);
            c = tmp >> WORDSIZE;
        }
        for i in len + half_len + 2..2 * len {
            let tmp = get(&s.z2, i - len) + c;
            put(w, i, (tmp & MASK_ALL as u64) as Limb);
            c = tmp >> WORDSIZE;
        }
        for i in 2 * len..w.len() {
            w[i] = 0;
        }
    });
}

/// Sets w = x * x with one split into halves of half_len limbs each
/// (HAC 14.2). The depth selects the scratch set and must be below
/// [`KARATSUBA_MAX_DEPTH`].
fn square_karatsuba(w: &mut [Limb], x: &[Limb], depth: usize, len: usize) {
    debug_assert!(depth < KARATSUBA_MAX_DEPTH);
    SQR_SCRATCH.with(|scratch| {
        let mut s = scratch[depth].borrow_mut();
        let s = &mut *s;

        let len = len + len % 2;
        let half_len = len / 2;

        if s.h.len() != half_len {
            s.h.resize(half_len, 0);
            s.l.resize(half_len, 0);

            s.z2.resize(len, 0);
            s.z1.resize(len, 0);
            s.z0.resize(len, 0);

            s.xdif.resize(half_len, 0);
        }

        karatsuba_split(&mut s.l, &mut s.h, x);

        if depth < 1 {
            square_naive(&mut s.z2, &s.h);
            square_naive(&mut s.z0, &s.l);
        } else {
            square_karatsuba(&mut s.z2, &s.h, depth - 1, half_len);
            square_karatsuba(&mut s.z0, &s.l, depth - 1, half_len);
        }

        // We guess which half is bigger and correct if needed; only the
        // absolute difference matters since it is squared.
        if sub(&mut s.xdif, &s.h, &s.l) < 0 {
            sub(&mut s.xdif, &s.l, &s.h);
        }

        if depth < 1 {
            square_naive(&mut s.z1, &s.xdif);
        } else {
            square_karatsuba(&mut s.z1, &s.xdif, depth - 1, half_len);
        }

        // Combine in two passes with b = 2^(half_len * WORDSIZE):
        // w = b^2 * z2 + b * (z0 + z2) + z0, then w = w - b * z1.
        let mut c: u64 = 0;
        for i in 0..half_len {
            put(w, i, s.z0[i]);
        }
        for i in half_len..len {
            let tmp = s.z0[i] as u64 + s.z0[i - half_len] as u64 + s.z2[i - half_len] as u64 + c;
            put(w, i, (tmp & MASK_ALL as u64) as Limb);
            c = tmp >> WORDSIZE;
        }
        for i in len..len + half_len {
            let tmp = s.z0[i - half_len] as u64 + s.z2[i - half_len] as u64 + s.z2[i - len] as u64 + c;
            put(w, i, (tmp & MASK_ALL as u64) as Limb);
            c = tmp >> WORDSIZE;
        }
        for i in len + half_len..2 * len {
            let tmp = s.z2[i - len] as u64 + c;
            put(w, i, (tmp & MASK_ALL as u64) as Limb);
            c = tmp >> WORDSIZE;
        }

        // The final result fits in 2 * len words, so the positive carry
        // and the borrow out of the subtraction both vanish.
        let mut b: i64 = 0;
        for i in half_len..len + half_len {
            let tmp = get(w, i) as i64 - s.z1[i - half_len] as i64 + b;
            put(w, i, (tmp & MASK_ALL as i64) as Limb);
            b = tmp >> WORDSIZE;
        }
        for i in len + half_len..2 * len {
            let tmp = get(w, i) as i64 + b;
            put(w, i, (tmp & MASK_ALL as i64) as Limb);
            b = tmp >> WORDSIZE;
        }
        for i in 2 * len..w.len() {
            w[i] = 0;
        }
    });
}

/// Sets w = x * y, choosing between the schoolbook method and Karatsuba
/// based on the word lengths of the factors. The destination must hold
/// at least x.len() + y.len() limbs.
pub fn mul(w: &mut [Limb], x: &[Limb], y: &[Limb]) {
    if std::ptr::eq(x.as_ptr(), y.as_ptr()) && x.len() == y.len() {
        square(w, x);
        return;
    }

    // Karatsuba only pays off for large and relatively balanced factors.
    let xlen = msword(x) + 1;
    let ylen = msword(y) + 1;
    let balance = (xlen as f64 / ylen as f64).min(ylen as f64 / xlen as f64);
    if xlen > KARATSUBA_MUL_THRESHOLD && balance > KARATSUBA_RELATIVE {
        mul_karatsuba(w, x, y, 0, x.len().max(y.len()));
    } else {
        mul_naive(w, x, y);
    }
}

/// Sets w = x * x. The destination must hold at least 2 * x.len() limbs.
pub fn square(w: &mut [Limb], x: &[Limb]) {
    let xlen = msword(x) + 1;
    if xlen > KARATSUBA_SQR_THRESHOLD {
        square_karatsuba(w, x, 0, x.len());
    } else {
        square_naive(w, x);
    }
}
