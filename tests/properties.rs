//! Cross-layer properties checked through the public interface.

use arith_core::{Curve, FixedBasePow, LargeInt, SimPowTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn int(s: &str) -> LargeInt {
    LargeInt::from_hex(s).unwrap()
}

fn random_signed(rng: &mut StdRng, bits: usize) -> LargeInt {
    let x = LargeInt::random(bits, rng);
    if rng.gen::<bool>() {
        x.neg()
    } else {
        x
    }
}

#[test]
fn ring_identities() {
    let mut rng = StdRng::seed_from_u64(101);
    for _ in 0..20 {
        let xbits = rng.gen_range(1..=1024);
        let ybits = rng.gen_range(1..=1024);
        let zbits = rng.gen_range(1..=1024);
        let x = random_signed(&mut rng, xbits);
        let y = random_signed(&mut rng, ybits);
        let z = random_signed(&mut rng, zbits);

        assert_eq!(x.add(&y), y.add(&x));
        assert_eq!(x.mul(&y), y.mul(&x));
        assert_eq!(x.add(&y).add(&z), x.add(&y.add(&z)));
        assert_eq!(x.mul(&y).mul(&z), x.mul(&y.mul(&z)));
        assert_eq!(x.mul(&y.add(&z)), x.mul(&y).add(&x.mul(&z)));
        assert_eq!(x.sub(&y), x.add(&y.neg()));
    }
}

#[test]
fn square_matches_mul_around_recursion_thresholds() {
    let mut rng = StdRng::seed_from_u64(102);
    // Limb counts straddling the points where multiplication switches
    // from the schoolbook to the recursive method.
    for limbs in [1usize, 23, 24, 25, 34, 35, 36, 48, 70] {
        let x = LargeInt::random(28 * limbs, &mut rng);
        assert_eq!(x.square(), x.mul(&x), "{} limbs", limbs);
    }
}

#[test]
fn division_round_trip() {
    let mut rng = StdRng::seed_from_u64(103);
    for _ in 0..20 {
        let xbits = rng.gen_range(1..=800);
        let x = random_signed(&mut rng, xbits);
        let mut y = LargeInt::random(rng.gen_range(1..=400), &mut rng);
        if y.is_zero() {
            y = LargeInt::one();
        }

        let (q, r) = x.div_qr(&y);
        assert_eq!(q.mul(&y).add(&r), x);
        assert!(r.sign() >= 0 && r < y, "remainder in range");
    }
}

#[test]
fn fermat_little_theorem() {
    let p = int("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
    let e = p.sub(&LargeInt::one());
    let mut rng = StdRng::seed_from_u64(104);
    for _ in 0..3 {
        let a = LargeInt::random(256, &mut rng).modulo(&p);
        if a.is_zero() {
            continue;
        }
        assert_eq!(a.mod_pow(&e, &p), LargeInt::one());
    }
}

#[test]
fn egcd_bezout_relation() {
    let mut rng = StdRng::seed_from_u64(105);
    for _ in 0..10 {
        let x = LargeInt::random(rng.gen_range(1..=300), &mut rng);
        let y = LargeInt::random(rng.gen_range(1..=300), &mut rng);
        if x.is_zero() || y.is_zero() {
            continue;
        }
        let (a, b, v) = x.egcd(&y);
        assert_eq!(a.mul(&x).add(&b.mul(&y)), v);
        assert!(x.modulo(&v).is_zero());
        assert!(y.modulo(&v).is_zero());
    }
}

#[test]
fn legendre_and_sqrt_round_trip() {
    let p = int("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
    let mut rng = StdRng::seed_from_u64(106);
    for _ in 0..5 {
        let a = LargeInt::random(256, &mut rng).modulo(&p);
        if a.is_zero() {
            continue;
        }
        // Squares are residues and their roots square back.
        let sq = a.mod_mul(&a, &p);
        assert_eq!(sq.legendre(&p), 1);
        let root = sq.mod_sqrt(&p);
        assert_eq!(root.mod_mul(&root, &p), sq);
    }
}

#[test]
fn curve_group_laws() {
    let p = int("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
    let mut c = Curve::new(&p, &LargeInt::zero(), &LargeInt::from_u64(7));
    let g = c
        .point(
            &int("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"),
            &int("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"),
        )
        .unwrap();

    let mut rng = StdRng::seed_from_u64(107);
    let k1 = LargeInt::random(128, &mut rng);
    let k2 = LargeInt::random(128, &mut rng);

    let a = c.mul(&g, &k1);
    let b = c.mul(&g, &k2);
    let ab = c.add(&a, &b);
    let ba = c.add(&b, &a);
    assert!(c.equals(&ab, &ba));

    // Associativity against a third point.
    let d = c.double(&g);
    let left = {
        let t = c.add(&a, &b);
        c.add(&t, &d)
    };
    let right = {
        let t = c.add(&b, &d);
        c.add(&a, &t)
    };
    assert!(c.equals(&left, &right));

    // Scalars act as a homomorphism from the integers.
    let sum = c.mul(&g, &k1.add(&k2));
    assert!(c.equals(&ab, &sum));

    // Inverses and the identity.
    let neg_a = c.neg(&a);
    assert!(c.add(&a, &neg_a).is_infinity());
    let o = c.infinity();
    let r = c.add(&a, &o);
    assert!(c.equals(&r, &a));
}

#[test]
fn curve_points_stay_on_curve() {
    let p = int("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
    let a = int("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc");
    let b = int("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b");
    let mut c = Curve::new(&p, &a, &b);
    let g = c
        .point(
            &int("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
            &int("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
        )
        .unwrap();

    // Reconstructing each multiple from its affine coordinates
    // revalidates the curve equation.
    let mut acc = g.clone();
    for k in 2u64..=8 {
        acc = c.add(&acc, &g);
        let (x, y) = c.affine_coordinates(&acc).unwrap();
        let again = c.point(&x, &y).unwrap();
        assert!(c.equals(&again, &acc), "{} * G", k);
    }
}

#[test]
fn fixed_base_and_simultaneous_agree_with_mod_pow() {
    let m = int("0100000000000000000000000000000000000000000000000000000000000129");
    let g = int("05");
    let h = int("07");
    let mut rng = StdRng::seed_from_u64(108);

    let fixed = FixedBasePow::new(&g, &m, 20);
    let table = SimPowTable::new(&[g.clone(), h.clone()], &m);

    for _ in 0..5 {
        let e1 = LargeInt::random(256, &mut rng);
        let e2 = LargeInt::random(256, &mut rng);

        assert_eq!(fixed.mod_pow(&e1), g.mod_pow(&e1, &m));

        let prod = table.mod_pow_prod(&[e1.clone(), e2.clone()]);
        let expected = g.mod_pow(&e1, &m).mod_mul(&h.mod_pow(&e2, &m), &m);
        assert_eq!(prod, expected);
    }
}

#[test]
fn seventy_two_bit_values_span_three_limbs() {
    // A 72-bit value fills three 28-bit limbs with its top bit at
    // index 71.
    let x = int("ffffffffffffffffff");
    assert_eq!(x.bit_length(), 72);
    assert_eq!(x.get_bit(71), 1);

    let three = LargeInt::from_u64(3);
    let (q, r) = x.div_qr(&three);
    assert!(r.sign() >= 0 && r < three);
    assert_eq!(q.mul(&three).add(&r), x);

    let y = x.sub(&LargeInt::one());
    assert_eq!(y.to_hex(), "fffffffffffffffffe");
    assert_eq!(x.shift_right(71), LargeInt::one());
}
