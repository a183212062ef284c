//! Addition, subtraction, and two's-complement negation.

use super::{msword, Limb, MASK_ALL, WORDSIZE};

/// Sets w = x + y. The destination must have at least one limb more
/// than the significant words of the larger operand so the final carry
/// always fits.
pub fn add(w: &mut [Limb], x: &[Limb], y: &[Limb]) {
    // Operands are trimmed to their significant words, so generously
    // padded inputs do not force an even larger destination.
    let x = &x[..msword(x) + 1];
    let y = &y[..msword(y) + 1];

    // Let x be the longer operand.
    let (x, y) = if x.len() < y.len() { (y, x) } else { (x, y) };
    debug_assert!(w.len() >= x.len() + 1);

    let mut tmp: u64;
    let mut c: u64 = 0;

    for i in 0..y.len() {
        tmp = x[i] as u64 + y[i] as u64 + c;
        w[i] = (tmp & MASK_ALL as u64) as Limb;
        c = tmp >> WORDSIZE;
    }
    for i in y.len()..x.len() {
        tmp = x[i] as u64 + c;
        w[i] = (tmp & MASK_ALL as u64) as Limb;
        c = tmp >> WORDSIZE;
    }
    w[x.len()] = c as Limb;
    for limb in w[x.len() + 1..].iter_mut() {
        *limb = 0;
    }
}

/// Sets x = x + y in place, where x.len() >= y.len(). Any final carry is
/// lost, so the caller must guarantee that the sum fits.
pub fn add_assign(x: &mut [Limb], y: &[Limb]) {
    debug_assert!(x.len() >= y.len());

    let mut tmp: u64;
    let mut c: u64 = 0;

    for i in 0..y.len() {
        tmp = x[i] as u64 + y[i] as u64 + c;
        x[i] = (tmp & MASK_ALL as u64) as Limb;
        c = tmp >> WORDSIZE;
    }
    let mut i = y.len();
    while c != 0 && i < x.len() {
        tmp = x[i] as u64 + c;
        x[i] = (tmp & MASK_ALL as u64) as Limb;
        c = tmp >> WORDSIZE;
        i += 1;
    }
    debug_assert!(c == 0);
}

/// Sets w = x - y interpreted in two's complement over the length of w,
/// i.e. a negative difference leaves the borrow pattern of all-ones limbs.
/// Returns the final borrow, 0 or -1.
pub fn sub(w: &mut [Limb], x: &[Limb], y: &[Limb]) -> i64 {
    debug_assert!(w.len() >= x.len());

    let yl = y.len().min(w.len());
    let mut tmp: i64;
    let mut c: i64 = 0;

    for i in 0..yl.min(x.len()) {
        tmp = x[i] as i64 - y[i] as i64 + c;
        w[i] = (tmp & MASK_ALL as i64) as Limb;
        c = tmp >> WORDSIZE;
    }
    if x.len() > yl {
        for i in yl..x.len() {
            tmp = x[i] as i64 + c;
            w[i] = (tmp & MASK_ALL as i64) as Limb;
            c = tmp >> WORDSIZE;
        }
        for i in x.len()..w.len() {
            tmp = c;
            w[i] = (tmp & MASK_ALL as i64) as Limb;
            c = tmp >> WORDSIZE;
        }
    } else {
        for i in x.len()..yl {
            tmp = -(y[i] as i64) + c;
            w[i] = (tmp & MASK_ALL as i64) as Limb;
            c = tmp >> WORDSIZE;
        }
        for i in yl..w.len() {
            tmp = c;
            w[i] = (tmp & MASK_ALL as i64) as Limb;
            c = tmp >> WORDSIZE;
        }
    }
    c
}

/// Sets x = x - y in place. Same semantics as [`sub`].
pub fn sub_assign(x: &mut [Limb], y: &[Limb]) -> i64 {
    let yl = y.len().min(x.len());
    let mut tmp: i64;
    let mut c: i64 = 0;

    for i in 0..yl {
        tmp = x[i] as i64 - y[i] as i64 + c;
        x[i] = (tmp & MASK_ALL as i64) as Limb;
        c = tmp >> WORDSIZE;
    }
    for i in yl..x.len() {
        tmp = x[i] as i64 + c;
        x[i] = (tmp & MASK_ALL as i64) as Limb;
        c = tmp >> WORDSIZE;
    }
    c
}

/// Sets x = y - x in place, where x.len() >= y.len(). Same borrow
/// semantics as [`sub`].
pub fn rsub_assign(x: &mut [Limb], y: &[Limb]) -> i64 {
    debug_assert!(x.len() >= y.len());

    let mut tmp: i64;
    let mut c: i64 = 0;

    for i in 0..y.len() {
        tmp = y[i] as i64 - x[i] as i64 + c;
        x[i] = (tmp & MASK_ALL as i64) as Limb;
        c = tmp >> WORDSIZE;
    }
    for i in y.len()..x.len() {
        tmp = -(x[i] as i64) + c;
        x[i] = (tmp & MASK_ALL as i64) as Limb;
        c = tmp >> WORDSIZE;
    }
    c
}

/// Sets w = -x in two's complement over the full length of w, i.e.
/// w = 2^(WORDSIZE * w.len()) - x when x is nonzero.
pub fn neg(w: &mut [Limb], x: &[Limb]) {
    debug_assert!(w.len() >= x.len());

    let mut tmp: i64;
    let mut c: i64 = 1;

    for i in 0..x.len() {
        tmp = (x[i] ^ MASK_ALL) as i64 + c;
        w[i] = (tmp & MASK_ALL as i64) as Limb;
        c = tmp >> WORDSIZE;
    }
    for i in x.len()..w.len() {
        tmp = MASK_ALL as i64 + c;
        w[i] = (tmp & MASK_ALL as i64) as Limb;
        c = tmp >> WORDSIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limb;

    #[test]
    fn test_simple_add() {
        let mut w = vec![0; 3];
        add(&mut w, &[MASK_ALL, MASK_ALL], &[1]);
        assert_eq!(w, vec![0, 0, 1]);
    }

    #[test]
    fn test_add_padded_operands() {
        // Operands padded to the length of the destination still leave
        // room for the carry once trimmed to significant words.
        let mut w = vec![0; 4];
        add(&mut w, &[5, 2, 0, 0], &[7, 0, 0, 0]);
        assert_eq!(w, vec![12, 2, 0, 0]);

        let mut w = vec![0; 3];
        add(&mut w, &[MASK_ALL, MASK_ALL, 0], &[1, 0, 0]);
        assert_eq!(w, vec![0, 0, 1]);
    }

    #[test]
    fn test_add_commutativity() {
        let x = vec![0x1234567, 0x0ABCDEF, 7];
        let y = vec![MASK_ALL, 3];
        let mut a = vec![0; 4];
        let mut b = vec![0; 4];
        add(&mut a, &x, &y);
        add(&mut b, &y, &x);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sub_no_borrow() {
        let mut w = vec![0; 2];
        let c = sub(&mut w, &[5, 1], &[7]);
        assert_eq!(c, 0);
        assert_eq!(w, vec![MASK_ALL - 1, 0]);
    }

    #[test]
    fn test_sub_borrow_pattern() {
        // 0 - 1 leaves all-ones limbs and a borrow of -1.
        let mut w = vec![0; 3];
        let c = sub(&mut w, &[0, 0, 0], &[1]);
        assert_eq!(c, -1);
        assert_eq!(w, vec![MASK_ALL, MASK_ALL, MASK_ALL]);
    }

    #[test]
    fn test_add_sub_round_trip() {
        let x = vec![0x0FEDCBA, 0x1111111, 0x2222222];
        let y = vec![0x0000042, 0x0F0F0F0];
        let mut s = vec![0; 4];
        add(&mut s, &x, &y);
        let mut d = vec![0; 4];
        let c = sub(&mut d, &s, &y);
        assert_eq!(c, 0);
        assert_eq!(limb::cmp(&d, &x), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_in_place_variants() {
        let x = vec![0x0FEDCBA, 0x1111111, 0];
        let y = vec![0x0000042, 0x0F0F0F0];

        let mut a = x.clone();
        add_assign(&mut a, &y);
        let mut expected = vec![0; 4];
        add(&mut expected, &x, &y);
        assert_eq!(limb::cmp(&a, &expected), std::cmp::Ordering::Equal);

        let mut b = a.clone();
        sub_assign(&mut b, &y);
        assert_eq!(limb::cmp(&b, &x), std::cmp::Ordering::Equal);

        // x = y - x with x = [1, 0], y = [0, 1].
        let mut r = vec![1, 0];
        let c = rsub_assign(&mut r, &[0, 1]);
        assert_eq!(c, 0);
        assert_eq!(r, vec![MASK_ALL, 0]);
    }

    #[test]
    fn test_neg_round_trip() {
        let x = vec![0x0000005, 0x0000000, 0x1234567];
        let mut n = vec![0; 3];
        neg(&mut n, &x);
        let mut back = vec![0; 3];
        neg(&mut back, &n);
        assert_eq!(back, x);
    }

    #[test]
    fn test_neg_then_add_is_zero() {
        let x = vec![0x0ABCDEF, 0x0000001];
        let mut n = vec![0; 2];
        neg(&mut n, &x);
        // x + (-x) = 0 mod 2^(2 * WORDSIZE).
        let mut s = x.clone();
        add_assign_mod(&mut s, &n);
        assert!(limb::is_zero(&s));
    }

    // Addition discarding the final carry, used to check two's-complement
    // identities.
    fn add_assign_mod(x: &mut [Limb], y: &[Limb]) {
        let mut c: u64 = 0;
        for i in 0..x.len() {
            let tmp = x[i] as u64 + y[i] as u64 + c;
            x[i] = (tmp & MASK_ALL as u64) as Limb;
            c = tmp >> WORDSIZE;
        }
    }
}
