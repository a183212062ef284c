//! Simultaneous and fixed-base modular exponentiation.
//!
//! [`SimPowTable`] precomputes all subset products of a small list of
//! bases so a product of powers costs one squaring per exponent bit and
//! at most one multiplication. [`FixedBasePow`] splits the exponent of a
//! single fixed basis into slices and turns them into a simultaneous
//! exponentiation, which pays off when many powers of the same basis are
//! needed.

use crate::integer::LargeInt;
use crate::limb::{self, Limb, PreparedDivisor};

/// Precomputed subset products of a list of bases modulo a fixed
/// modulus.
pub struct SimPowTable {
    table: Vec<Vec<Limb>>,
    d: PreparedDivisor,
    width: usize,
    mlen: usize,
}

impl SimPowTable {
    /// Builds the table of all 2^k subset products of the k given bases.
    ///
    /// Panics on a non-positive modulus.
    pub fn new(bases: &[LargeInt], modulus: &LargeInt) -> SimPowTable {
        if modulus.sign() != 1 {
            panic!("non-positive modulus");
        }

        let mlen = modulus.inner.limbs.len();
        let d = PreparedDivisor::new(&modulus.inner.limbs);

        // The kernel expects reduced bases of the limb length of the
        // modulus.
        let reduced: Vec<Vec<Limb>> = bases
            .iter()
            .map(|b| {
                let mut limbs = b.modulo(modulus).inner.limbs;
                limbs.resize(mlen, 0);
                limbs
            })
            .collect();
        let refs: Vec<&[Limb]> = reduced.iter().map(|v| v.as_slice()).collect();
        let table = limb::modpowprodtab(&refs, &d);

        SimPowTable { table, d, width: bases.len(), mlen }
    }

    /// Number of bases the table was built from.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns b[0]^e[0] * ... * b[k-1]^e[k-1] mod m for the bases the
    /// table was built from.
    ///
    /// Panics when the number of exponents differs from the number of
    /// bases or an exponent is negative.
    pub fn mod_pow_prod(&self, exponents: &[LargeInt]) -> LargeInt {
        if exponents.len() != self.width {
            panic!("wrong number of exponents");
        }
        if exponents.iter().any(|e| e.sign() < 0) {
            panic!("negative exponent");
        }

        let refs: Vec<&[Limb]> = exponents.iter().map(|e| e.inner.limbs.as_slice()).collect();
        let mut w = vec![0; self.mlen];
        limb::modpowprod(&mut w, &self.table, &refs, &self.d);
        LargeInt::new(1, w)
    }
}

/// Returns b[0]^e[0] * ... * b[k-1]^e[k-1] mod m by separate
/// exponentiations, as a reference for the table-driven variants.
pub fn mod_pow_prod_naive(
    bases: &[LargeInt],
    exponents: &[LargeInt],
    modulus: &LargeInt,
) -> LargeInt {
    bases
        .iter()
        .zip(exponents.iter())
        .fold(LargeInt::one(), |acc, (b, e)| acc.mod_mul(&b.mod_pow(e, modulus), modulus))
}

/// Precomputed powers of a fixed basis for repeated exponentiation
/// modulo a fixed modulus.
pub struct FixedBasePow {
    table: SimPowTable,
    slice_size: usize,
    width: usize,
}

impl FixedBasePow {
    /// Returns the width minimizing the estimated amortized cost of a
    /// single exponentiation when the precomputation is shared by the
    /// given number of exponentiations.
    fn optimal_width(bit_length: usize, size: usize) -> usize {
        let mut width = 2usize;
        let mut cost = 1.5 * bit_length as f64;
        loop {
            let old_cost = cost;

            // Amortized precomputation plus the multiplications of one
            // call at the current width.
            let t = (((1usize << width) - width + bit_length) as f64) / size as f64;
            let m = bit_length as f64 / width as f64;
            cost = t + m;

            width += 1;

            if width > 16 || cost >= old_cost {
                break;
            }
        }
        width - 1
    }

    /// Prepares the basis for roughly the given number of
    /// exponentiations with exponents up to the bit length of the
    /// modulus.
    pub fn new(basis: &LargeInt, modulus: &LargeInt, size: usize) -> FixedBasePow {
        let bit_length = modulus.bit_length();
        let width = FixedBasePow::optimal_width(bit_length, size.max(1));
        FixedBasePow::with_width(basis, modulus, bit_length, width)
    }

    /// Prepares the basis with an explicit width and exponent bit
    /// length.
    pub fn with_width(
        basis: &LargeInt,
        modulus: &LargeInt,
        bit_length: usize,
        width: usize,
    ) -> FixedBasePow {
        debug_assert!(width >= 1);
        let slice_size = (bit_length + width - 1) / width;

        // bases[i + 1] = bases[i]^(2^sliceSize) mod m, so slice i of the
        // exponent acts on bases[i].
        let power_exp = LargeInt::one().shift_left(slice_size);
        let mut bases = Vec::with_capacity(width);
        bases.push(basis.modulo(modulus));
        for i in 1..width {
            bases.push(bases[i - 1].mod_pow(&power_exp, modulus));
        }

        let table = SimPowTable::new(&bases, modulus);
        FixedBasePow { table, slice_size, width }
    }

    /// Returns basis^exponent mod m.
    ///
    /// Panics on a negative exponent.
    pub fn mod_pow(&self, exponent: &LargeInt) -> LargeInt {
        if exponent.sign() < 0 {
            panic!("negative exponent");
        }

        // The last slice is unbounded, so exponents above the prepared
        // bit length still give the right result, just more slowly.
        let mut slices = Vec::with_capacity(self.width);
        for i in 0..self.width {
            let start = i * self.slice_size;
            let end = if i + 1 == self.width { usize::MAX } else { start + self.slice_size };
            slices.push(exponent.slice_bits(start, end));
        }
        self.table.mod_pow_prod(&slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn int(s: &str) -> LargeInt {
        LargeInt::from_hex(s).unwrap()
    }

    fn modulus() -> LargeInt {
        int("0100000000000000000000000000000000000000000000000000000000000129")
    }

    fn random_int(rng: &mut dyn RandomSource, bits: usize) -> LargeInt {
        LargeInt::random(bits, rng)
    }

    #[test]
    fn test_sim_pow_matches_naive() {
        let mut rng = StdRng::seed_from_u64(41);
        let m = modulus();

        for width in 1..=4 {
            let bases: Vec<LargeInt> = (0..width).map(|_| random_int(&mut rng, 256)).collect();
            let table = SimPowTable::new(&bases, &m);
            assert_eq!(table.width(), width);

            for _ in 0..3 {
                let exponents: Vec<LargeInt> =
                    (0..width).map(|_| random_int(&mut rng, 200)).collect();
                let got = table.mod_pow_prod(&exponents);
                let expected = mod_pow_prod_naive(&bases, &exponents, &m);
                assert_eq!(got, expected, "width {}", width);
            }
        }
    }

    #[test]
    fn test_sim_pow_zero_exponents() {
        let m = modulus();
        let bases = vec![int("05"), int("07")];
        let table = SimPowTable::new(&bases, &m);
        let one = table.mod_pow_prod(&[LargeInt::zero(), LargeInt::zero()]);
        assert_eq!(one, LargeInt::one());
    }

    #[test]
    #[should_panic(expected = "wrong number of exponents")]
    fn test_sim_pow_arity_mismatch_panics() {
        let table = SimPowTable::new(&[int("05")], &modulus());
        let _ = table.mod_pow_prod(&[LargeInt::one(), LargeInt::one()]);
    }

    #[test]
    fn test_fixed_base_matches_mod_pow() {
        let mut rng = StdRng::seed_from_u64(42);
        let m = modulus();
        let g = int("05");
        let fixed = FixedBasePow::new(&g, &m, 10);

        for _ in 0..5 {
            let e = random_int(&mut rng, 256);
            assert_eq!(fixed.mod_pow(&e), g.mod_pow(&e, &m));
        }
        assert_eq!(fixed.mod_pow(&LargeInt::zero()), LargeInt::one());
    }

    #[test]
    fn test_fixed_base_widths_agree() {
        let m = modulus();
        let g = int("0123456789abcdef");
        let e = int("fedcba98765432100123456789abcdef");
        let expected = g.mod_pow(&e, &m);

        for width in 1..=6 {
            let fixed = FixedBasePow::with_width(&g, &m, m.bit_length(), width);
            assert_eq!(fixed.mod_pow(&e), expected, "width {}", width);
        }
    }

    #[test]
    fn test_fixed_base_oversized_exponent() {
        // Exponents above the prepared bit length land in the unbounded
        // last slice.
        let m = modulus();
        let g = int("03");
        let fixed = FixedBasePow::with_width(&g, &m, 64, 4);
        let e = int("0123456789abcdef0123456789abcdef0123456789abcdef");
        assert_eq!(fixed.mod_pow(&e), g.mod_pow(&e, &m));
    }

    #[test]
    fn test_optimal_width_bounds() {
        for size in [1, 10, 100, 10000] {
            for bits in [64, 256, 2048] {
                let w = FixedBasePow::optimal_width(bits, size);
                assert!((1..=16).contains(&w), "bits {} size {}", bits, size);
            }
        }
    }

    #[test]
    fn test_optimal_width_values() {
        // A single exponentiation never amortizes the table.
        assert_eq!(FixedBasePow::optimal_width(256, 1), 2);
        // Larger batches push the width up.
        let small_batch = FixedBasePow::optimal_width(256, 10);
        let large_batch = FixedBasePow::optimal_width(256, 10000);
        assert_eq!(small_batch, 7);
        assert!(large_batch > small_batch);
    }
}
