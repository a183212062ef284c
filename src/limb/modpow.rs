//! Modular exponentiation and simultaneous products.
//!
//! The windowed method (HAC 14.83) keeps a table of odd powers of the
//! basis, so even windows are handled by hoisting their factors of two
//! into extra squarings. [`modpowprodtab`] and [`modpowprod`] implement
//! simultaneous exponentiation over a table of all subset products of a
//! small list of bases.

use super::{
    div_qr, getbit, msbit, mul, set, set_one, square, Limb, PreparedDivisor, MASK_ALL, WORDSIZE,
};

/// Sets w = b^e mod m by square and multiply (HAC 14.82), where b, m,
/// and w have L limbs, b >= 0, e >= 1, and m > 1.
pub fn modpow_naive(w: &mut [Limb], b: &[Limb], e: &[Limb], m: &PreparedDivisor) {
    let mlen = m.divisor().len();

    // p holds squares, products, and their remainders, q quotients
    // during reduction, and a the running result.
    let mut p = vec![0; 2 * mlen + 2];
    let mut q = vec![0; 2 * mlen + 2];
    let mut a = vec![0; mlen];

    let n = msbit(e);

    // The most significant bit costs no squaring.
    if getbit(e, n) == 1 {
        set(&mut p, b);
        div_qr(&mut q, &mut p, m);
        set(&mut a, &p);
    }

    for i in (0..n).rev() {
        square(&mut p, &a);
        div_qr(&mut q, &mut p, m);
        set(&mut a, &p);

        if getbit(e, i) == 1 {
            mul(&mut p, &a, b);
            div_qr(&mut q, &mut p, m);
            set(&mut a, &p);
        }
    }
    set(w, &a);
}

/// Extracts the ith block of wordsize bits from x, zero-padded from the
/// left, and returns (u, h) such that the block equals u * 2^h with u
/// odd, or (0, 0) for a zero block.
pub fn getuh(x: &[Limb], i: usize, wordsize: usize) -> (Limb, usize) {
    let bit_index = i * wordsize;

    let mut u: Limb = 0;
    for j in 0..wordsize {
        u |= getbit(x, bit_index + j) << j;
    }

    let mut h = 0;
    if u != 0 {
        while u & 1 == 0 {
            u >>= 1;
            h += 1;
        }
    }
    (u, h)
}

/// Sets w = b^e mod m by the windowed method (HAC 14.83), where b, m,
/// and w have L limbs, b >= 0, e >= 1, and m > 1.
pub fn modpow(w: &mut [Limb], b: &[Limb], e: &[Limb], m: &PreparedDivisor) {
    let mlen = m.divisor().len();
    let msb = msbit(m.divisor()) + 1;

    // Window width by modulus size. The break points are somewhat
    // arbitrary and tuned for typical cryptographic sizes.
    let mut k: usize = 2;
    for threshold in [512, 640, 768, 896, 1280, 2688, 3840] {
        if msb > threshold {
            k += 1;
        }
    }

    let mut p = vec![0; 2 * mlen + 2];
    let mut q = vec![0; 2 * mlen + 2];
    let mut a = vec![0; mlen];

    // Table of odd powers b, b^3, b^5, ..., with b^u at index (u - 1) / 2.
    // Each entry is formed by multiplying the previous by b^2 mod m.
    let mut bsq = vec![0; mlen];
    square(&mut p, b);
    div_qr(&mut q, &mut p, m);
    set(&mut bsq, &p);

    let mut table: Vec<Vec<Limb>> = vec![vec![0; mlen]; 1 << (k - 1)];
    set(&mut table[0], b);
    for i in 1..1 << (k - 1) {
        mul(&mut p, &table[i - 1], &bsq);
        div_qr(&mut q, &mut p, m);
        set(&mut table[i], &p);
    }

    set_one(&mut a);

    // Iterate through the bits of e starting from the most significant
    // block.
    let n = (msbit(e) + k - 1) / k;
    for i in (0..=n).rev() {
        let (u, h) = getuh(e, i, k);

        // a = a^E mod m, where E = 2^(k - h).
        for _ in 0..k - h {
            square(&mut p, &a);
            div_qr(&mut q, &mut p, m);
            set(&mut a, &p);
        }

        // a = a * b^u mod m.
        if u != 0 {
            mul(&mut p, &a, &table[(u as usize - 1) / 2]);
            div_qr(&mut q, &mut p, m);
            set(&mut a, &p);
        }

        // a = a^E mod m, where E = 2^h.
        for _ in 0..h {
            square(&mut p, &a);
            div_qr(&mut q, &mut p, m);
            set(&mut a, &p);
        }
    }
    set(w, &a);
}

/// Returns the table of all subset products of the given bases modulo m,
/// i.e. entry x holds b[0]^x0 * ... * b[k-1]^x(k-1) mod m, where xj is
/// the jth bit of x. The bases and m have L limbs each and the table has
/// 2^k entries.
pub fn modpowprodtab(b: &[&[Limb]], m: &PreparedDivisor) -> Vec<Vec<Limb>> {
    let mlen = m.divisor().len();
    let mut p = vec![0; 2 * mlen + 2];
    let mut q = vec![0; 2 * mlen + 2];

    let mut t: Vec<Vec<Limb>> = vec![vec![0; mlen]; 1 << b.len()];
    for entry in t.iter_mut() {
        entry[0] = 1;
    }
    for (j, base) in b.iter().enumerate() {
        set(&mut t[1 << j], base);
    }

    // Each product extends an already computed entry by one base. For
    // masks with a single bit set this reduces the base itself.
    for mask in 1..t.len() {
        let onemask = mask & mask.wrapping_neg();
        mul(&mut p, &t[mask ^ onemask], &t[onemask]);
        div_qr(&mut q, &mut p, m);
        set(&mut t[mask], &p);
    }
    t
}

/// Sets w = b[0]^e[0] * ... * b[k-1]^e[k-1] mod m for the subset-product
/// table t computed by [`modpowprodtab`] from the same bases and modulus.
pub fn modpowprod(w: &mut [Limb], t: &[Vec<Limb>], e: &[&[Limb]], m: &PreparedDivisor) {
    let mlen = m.divisor().len();
    let mut p = vec![0; 2 * mlen + 2];
    let mut q = vec![0; 2 * mlen + 2];
    let mut a = vec![0; mlen];

    let l = e.iter().map(|ei| msbit(ei)).max().unwrap_or(0);

    set_one(&mut a);

    for i in (0..=l).rev() {
        square(&mut p, &a);
        div_qr(&mut q, &mut p, m);
        set(&mut a, &p);

        // Form a lookup index from the bits of all exponents at this
        // position.
        let mut x = 0usize;
        for (j, ej) in e.iter().enumerate() {
            if getbit(ej, i) == 1 {
                x |= 1 << j;
            }
        }

        if x != 0 {
            mul(&mut p, &a, &t[x]);
            div_qr(&mut q, &mut p, m);
            set(&mut a, &p);
        }
    }
    set(w, &a);
}

/// Returns the bits of x from the inclusive start index to the exclusive
/// end index as an integer, where the end index is clamped to just above
/// the most significant bit.
pub fn slice_bits(x: &[Limb], s: usize, e: usize) -> Vec<Limb> {
    let m = msbit(x);
    let e = e.min(m + 1);

    // An empty range is the zero integer.
    let bitlen = e.saturating_sub(s);
    if bitlen == 0 {
        return vec![0];
    }

    let mut w = x.to_vec();
    super::shift_right(&mut w, s);

    let len = (bitlen + WORDSIZE - 1) / WORDSIZE;
    w.truncate(len);

    let topbits = bitlen % WORDSIZE;
    if topbits > 0 {
        let last = w.len() - 1;
        w[last] &= MASK_ALL >> (WORDSIZE - topbits);
    }
    w
}
