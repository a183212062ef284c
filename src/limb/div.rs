//! Division with remainder.
//!
//! Long division (HAC 14.20) with quotient-word estimation by the
//! reciprocal method of "Improved division by invariant integers" by
//! Moller and Granlund. The divisor is normalized once and its
//! reciprocal, negation, and top words are kept in a [`PreparedDivisor`],
//! so repeated reductions modulo the same value pay the setup cost once.

use super::{
    cmp, msbit, msword, muladd_loop, neg, set, set_zero, shift_left, shift_right, Limb, MASK_ALL,
    TWO_POW_WORDSIZE, WORDSIZE,
};

/// Mask over a double word.
const MASK_ALL_2: u64 = TWO_POW_WORDSIZE * TWO_POW_WORDSIZE - 1;

/// Computes the 2-by-1 reciprocal floor((2^(2 * WORDSIZE) - 1) / d) -
/// 2^WORDSIZE of a word d with its most significant bit set
/// (RECIPROCAL_WORD in MG).
pub fn reciprocal_word(d: Limb) -> Limb {
    debug_assert!(d & super::MASK_MSB != 0);
    ((MASK_ALL_2 / d as u64) - TWO_POW_WORDSIZE) as Limb
}

/// Computes the 3-by-2 reciprocal of a normalized two-word divisor d =
/// (d[1], d[0]) with the most significant bit of d[1] set
/// (RECIPROCAL_WORD_3BY2 in MG).
pub fn reciprocal_word_3by2(d: &[Limb; 2]) -> Limb {
    let mut v = reciprocal_word(d[1]);

    // p = d1 * v + d0 mod 2^WORDSIZE
    let t = word_low_high(d[1] as u64 * v as u64);
    let mut p = (t.0 + d[0]) & MASK_ALL;

    if p < d[0] {
        v -= 1;
        if p >= d[1] {
            v -= 1;
            p -= d[1];
        }
        p = (p + TWO_POW_WORDSIZE as Limb - d[1]) & MASK_ALL;
    }

    // t = v * d0
    let t = word_low_high(v as u64 * d[0] as u64);

    p = (p + t.1) & MASK_ALL;
    if p < t.1 {
        v -= 1;
        if p > d[1] || (p == d[1] && t.0 >= d[0]) {
            v -= 1;
        }
    }
    v
}

fn word_low_high(x: u64) -> (Limb, Limb) {
    ((x & MASK_ALL as u64) as Limb, (x >> WORDSIZE) as Limb)
}

/// Adds the two-word value (yh, yl) into the two-word value r modulo
/// 2^(2 * WORDSIZE).
fn long_add2(r: &mut [Limb; 2], yh: Limb, yl: Limb) {
    let s = (((r[1] as u64) << WORDSIZE) | r[0] as u64)
        .wrapping_add(((yh as u64) << WORDSIZE) | yl as u64)
        & MASK_ALL_2;
    r[1] = (s >> WORDSIZE) as Limb;
    r[0] = (s & MASK_ALL as u64) as Limb;
}

/// Computes q and r such that u = q * d + r with 0 <= r < d, where u has
/// three words, d is a normalized two-word divisor, neg_d its two-word
/// two's complement, and v its 3-by-2 reciprocal (DIV3BY2 in MG). The
/// remainder is written into r and the quotient word is returned.
pub fn div3by2(r: &mut [Limb; 2], u: &[Limb; 3], d: &[Limb; 2], neg_d: &[Limb; 2], v: Limb) -> Limb {
    // (q[1], q[0]) = v * u2 + (u2, u1)
    let (q0, q1) = word_low_high(v as u64 * u[2] as u64);
    let mut q = [q0, q1];
    long_add2(&mut q, u[2], u[1]);

    // r1 = u1 - q1 * d1 mod 2^WORDSIZE
    let t = word_low_high(q[1] as u64 * d[1] as u64);
    r[1] = (u[1] + TWO_POW_WORDSIZE as Limb - t.0) & MASK_ALL;

    // neg_t = -(d0 * q1) mod 2^(2 * WORDSIZE)
    let neg_t = (d[0] as u64 * q[1] as u64).wrapping_neg() & MASK_ALL_2;
    let (neg_t0, neg_t1) = word_low_high(neg_t);

    // r = (r1, u0) - d0 * q1 - d mod 2^(2 * WORDSIZE)
    r[0] = u[0];
    long_add2(r, neg_t1, neg_t0);
    long_add2(r, neg_d[1], neg_d[0]);

    let mut qw = (q[1] + 1) & MASK_ALL;

    if r[1] >= q[0] {
        qw = (qw + MASK_ALL) & MASK_ALL;
        long_add2(r, d[1], d[0]);
    }

    if r[1] > d[1] || (r[1] == d[1] && r[0] >= d[0]) {
        qw += 1;
        long_add2(r, neg_d[1], neg_d[0]);
    }

    qw
}

/// Divisor with its normalization and reciprocals precomputed for
/// repeated use in [`div_qr`].
pub struct PreparedDivisor {
    /// Original divisor, used for the trivial x < y case.
    divisor: Vec<Limb>,
    /// Divisor shifted left so its most significant bit is set.
    ny: Vec<Limb>,
    /// Two's complement negation of ny, one limb longer.
    neg_ny: Vec<Limb>,
    /// Bits shifted to normalize.
    normdist: usize,
    /// Index of the most significant word of ny.
    t: usize,
    /// Top two words of ny.
    d: [Limb; 2],
    /// Two's complement negation of d.
    neg_d: [Limb; 2],
    /// 3-by-2 reciprocal of d.
    v: Limb,
}

impl PreparedDivisor {
    /// Prepares a positive divisor.
    pub fn new(y: &[Limb]) -> PreparedDivisor {
        debug_assert!(!super::is_zero(y));

        let mut ny = vec![0; y.len()];
        set(&mut ny, y);

        let normdist = (WORDSIZE - (msbit(&ny) + 1) % WORDSIZE) % WORDSIZE;
        shift_left(&mut ny, normdist);

        // The dropped carry of the negation equals -1 and is never used.
        let mut neg_ny = vec![0; y.len() + 1];
        neg(&mut neg_ny, &ny);

        let t = msword(&ny);

        let mut d = [0, 0];
        d[1] = ny[t];
        d[0] = if t > 0 { ny[t - 1] } else { 0 };
        let mut neg_d = [0, 0];
        neg(&mut neg_d, &d);

        let v = reciprocal_word_3by2(&d);

        PreparedDivisor { divisor: y.to_vec(), ny, neg_ny, normdist, t, d, neg_d, v }
    }

    /// The divisor this was prepared from.
    pub fn divisor(&self) -> &[Limb] {
        &self.divisor
    }
}

// Checks x >= y * 2^((n - t) * WORDSIZE), where n and t are the indices
// of the most significant words of x and y.
fn shiftleft_ge(x: &[Limb], n: usize, y: &[Limb], t: usize) -> bool {
    let mut i = n;
    let mut j = t;
    loop {
        if x[i] > y[j] {
            return true;
        } else if x[i] < y[j] {
            return false;
        }
        if j == 0 {
            // The remaining low words of the shifted divisor are zero.
            return true;
        }
        i -= 1;
        j -= 1;
    }
}

/// Sets w and x such that the original x equals w * y + x with
/// 0 <= x < y, i.e. the remainder is computed in place of the dividend.
///
/// The dividend must have at least two zero limbs above its most
/// significant word to make room for normalization, and w must have at
/// least max(L - L', 0) + 1 limbs, where L and L' are the word lengths
/// of x and y.
pub fn div_qr(w: &mut [Limb], x: &mut [Limb], y: &PreparedDivisor) {
    set_zero(w);

    if cmp(x, &y.divisor) == std::cmp::Ordering::Less {
        return;
    }

    shift_left(x, y.normdist);

    let n = msword(x);
    let t = y.t;

    // Since x >= ny we know that n >= t. Repeatedly subtract the
    // divisor shifted n - t words left until x drops below it. Due to
    // the normalization this loop runs very few times.
    while shiftleft_ge(x, n, &y.ny, t) {
        let mut c: i64 = 0;
        let mut j = n - t;
        for i in 0..t + 1 {
            let tmp = x[j] as i64 - y.ny[i] as i64 + c;
            x[j] = (tmp & MASK_ALL as i64) as Limb;
            c = tmp >> WORDSIZE;
            j += 1;
        }
        w[n - t] += 1;
    }

    let mut u = [0, 0, 0];
    let mut r = [0, 0];

    for i in (t + 1..=n).rev() {
        let k = i - t - 1;

        // Estimate w[k] from the top three words of x and the top two
        // words of ny.
        u[2] = x[i];
        u[1] = x[i - 1];
        u[0] = if i > 1 { x[i - 2] } else { 0 };

        if u[2] == y.d[1] && u[1] >= y.d[0] {
            w[k] = MASK_ALL;
        } else {
            w[k] = div3by2(&mut r, &u, &y.d, &y.neg_d, y.v);
        }

        // Subtract scaled and shifted ny from x.
        muladd_loop(x, &y.neg_ny, 0, t + 2, w[k] as u64, k, 0);

        // We expect x[i] to be cancelled. In the unlikely event that the
        // estimate of w[k] is one too big, x[i] is -1 in two's
        // complement and we add back a scaled ny once.
        if x[k + t + 1] == MASK_ALL {
            let mut c: u64 = 0;
            let mut j = k;
            for l in 0..t + 1 {
                let tmp = x[j] as u64 + y.ny[l] as u64 + c;
                x[j] = (tmp & MASK_ALL as u64) as Limb;
                c = tmp >> WORDSIZE;
                j += 1;
            }
            let tmp = x[j] as u64 + c;
            x[j] = (tmp & MASK_ALL as u64) as Limb;
            j += 1;
            if j < x.len() {
                x[j] = 0;
            }
            w[k] -= 1;
        }
    }

    shift_right(x, y.normdist);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limb;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_limbs(rng: &mut StdRng, len: usize) -> Vec<Limb> {
        (0..len).map(|_| rng.gen::<u32>() & MASK_ALL).collect()
    }

    #[test]
    fn test_reciprocal_word() {
        // v = floor((2^56 - 1) / d) - 2^28 for a normalized d.
        let d = limb::MASK_MSB;
        assert_eq!(reciprocal_word(d), MASK_ALL);
        let d = MASK_ALL;
        assert_eq!(reciprocal_word(d), 1);
    }

    #[test]
    fn test_div3by2_exact() {
        // u = 2^82 + 5 over d = 2^55 gives q = 2^27 and r = 5.
        let d = [0, limb::MASK_MSB];
        let mut neg_d = [0, 0];
        limb::neg(&mut neg_d, &d);
        let v = reciprocal_word_3by2(&d);
        let mut r = [0, 0];
        let q = div3by2(&mut r, &[5, 0, 0x4000000], &d, &neg_d, v);
        assert_eq!(q, limb::MASK_MSB);
        assert_eq!(r, [5, 0]);
    }

    #[test]
    fn test_divide_by_three() {
        // 72-bit dividend over a one-word divisor.
        let x0 = limb::from_bytes_le(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x1F]);
        let pd = PreparedDivisor::new(&[3]);
        let mut x = x0.clone();
        x.extend_from_slice(&[0, 0]);
        let mut q = vec![0; x.len()];
        div_qr(&mut q, &mut x, &pd);

        let mut back = vec![0; q.len() + 2];
        limb::mul(&mut back, &q, &[3]);
        limb::add_assign(&mut back, &x);
        assert_eq!(limb::cmp(&back, &x0), std::cmp::Ordering::Equal);
        assert!(limb::cmp(&x, &[3]) == std::cmp::Ordering::Less);
    }

    #[test]
    fn test_small_dividend() {
        let pd = PreparedDivisor::new(&[0, 0, 1]);
        let mut x = vec![7, 0, 0, 0, 0];
        let mut q = vec![0; 4];
        div_qr(&mut q, &mut x, &pd);
        assert!(limb::is_zero(&q));
        assert_eq!(limb::cmp(&x, &[7]), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_exact_division() {
        let mut rng = StdRng::seed_from_u64(21);
        let y = random_limbs(&mut rng, 4);
        let q0 = random_limbs(&mut rng, 5);
        let mut x = vec![0; 11];
        limb::mul(&mut x, &y, &q0);

        let pd = PreparedDivisor::new(&y);
        let mut q = vec![0; 11];
        div_qr(&mut q, &mut x, &pd);
        assert!(limb::is_zero(&x));
        assert_eq!(limb::cmp(&q, &q0), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_division_round_trip() {
        let mut rng = StdRng::seed_from_u64(22);
        for (xl, yl) in [(2, 1), (6, 3), (12, 5), (30, 11), (16, 16)] {
            let x0 = random_limbs(&mut rng, xl);
            let mut y = random_limbs(&mut rng, yl);
            if limb::is_zero(&y) {
                y[0] = 1;
            }

            let mut x = x0.clone();
            x.extend_from_slice(&[0, 0]);
            let mut q = vec![0; x.len()];
            let pd = PreparedDivisor::new(&y);
            div_qr(&mut q, &mut x, &pd);

            // x0 = q * y + r with r < y.
            assert!(limb::cmp(&x, &y) == std::cmp::Ordering::Less);
            let mut back = vec![0; q.len() + y.len() + 1];
            limb::mul(&mut back, &q, &y);
            limb::add_assign(&mut back, &x);
            assert_eq!(limb::cmp(&back, &x0), std::cmp::Ordering::Equal, "{} / {}", xl, yl);
        }
    }
}
