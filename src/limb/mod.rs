//! Unsigned limb kernel.
//!
//! Integers are little-endian arrays of 28-bit limbs stored in `u32`.
//! Intermediate values use `u64`/`i64`, so the product of two limbs plus
//! carries fits a native word with room to spare.
//!
//! A "limb" is an array element that may or may not hold data; a "word" is
//! a limb holding data, which may be zero if there are words above it. The
//! number of limbs is the array length and the number of words is the index
//! of the most significant nonzero limb plus one.
//!
//! All kernel routines write into caller-provided slices and zero unused
//! high limbs. They operate on unsigned values only; signs live one layer
//! up. Buffer-length requirements are stated per function and violating
//! them is a bug in the caller, checked by debug assertions.

pub mod add;
pub mod div;
pub mod modpow;
pub mod mul;

pub use add::{add, add_assign, neg, rsub_assign, sub, sub_assign};
pub use div::{div3by2, div_qr, reciprocal_word, reciprocal_word_3by2, PreparedDivisor};
pub use modpow::{getuh, modpow, modpow_naive, modpowprod, modpowprodtab, slice_bits};
pub use mul::{mul, mul_naive, muladd_loop, square, square_naive, word_mul};

/// A single limb. Only the low [`WORDSIZE`] bits are ever set.
pub type Limb = u32;

/// Number of bits per limb.
pub const WORDSIZE: usize = 28;

/// Mask with all limb bits set.
pub const MASK_ALL: Limb = (1 << WORDSIZE) - 1;

/// Mask with only the most significant limb bit set.
pub const MASK_MSB: Limb = 1 << (WORDSIZE - 1);

/// `2^WORDSIZE` as a wide word.
pub const TWO_POW_WORDSIZE: u64 = 1 << WORDSIZE;

/// Sets x = 0.
pub fn set_zero(x: &mut [Limb]) {
    for limb in x.iter_mut() {
        *limb = 0;
    }
}

/// Sets x = 1.
pub fn set_one(x: &mut [Limb]) {
    set_zero(x);
    x[0] = 1;
}

/// Sets w = x, truncating or zero-padding to the length of w.
pub fn set(w: &mut [Limb], x: &[Limb]) {
    let n = w.len().min(x.len());
    w[..n].copy_from_slice(&x[..n]);
    for limb in w[n..].iter_mut() {
        *limb = 0;
    }
}

/// Sets w to a single-word value.
pub fn set_word(w: &mut [Limb], x: Limb) {
    debug_assert!(x <= MASK_ALL);
    set_zero(w);
    w[0] = x;
}

/// Resizes x to the given number of limbs, truncating or adding leading
/// zero limbs.
pub fn resize(x: &mut Vec<Limb>, len: usize) {
    x.resize(len, 0);
}

/// Truncates x to the shortest array representing the same absolute value
/// in two's complement, i.e. there is always a leading zero bit.
pub fn normalize(x: &mut Vec<Limb>) {
    let mut l = x.len() - 1;

    if x[l] == 0 {
        // Find the most significant nonzero word, keeping a leading zero
        // limb when its top bit is set.
        while l > 0 && x[l] == 0 {
            l -= 1;
        }
        if x[l] & MASK_MSB != 0 {
            l += 1;
        }
        x.truncate(l + 1);
    } else if x[l] & MASK_MSB != 0 {
        x.push(0);
    }
}

/// Returns the index of the most significant set bit, or 0 if x is zero.
pub fn msbit(x: &[Limb]) -> usize {
    for i in (0..x.len()).rev() {
        if x[i] != 0 {
            return i * WORDSIZE + (31 - x[i].leading_zeros() as usize);
        }
    }
    0
}

/// Returns the index of the least significant set bit, or 0 if x is zero.
pub fn lsbit(x: &[Limb]) -> usize {
    for i in 0..x.len() {
        if x[i] != 0 {
            return i * WORDSIZE + x[i].trailing_zeros() as usize;
        }
    }
    0
}

/// Returns the array index of the most significant word.
pub fn msword(x: &[Limb]) -> usize {
    for i in (1..x.len()).rev() {
        if x[i] != 0 {
            return i;
        }
    }
    0
}

/// Returns the given bit, where bits outside the limbs read as zero.
pub fn getbit(x: &[Limb], index: usize) -> Limb {
    let word = index / WORDSIZE;
    let bit = index % WORDSIZE;
    if word >= x.len() {
        return 0;
    }
    (x[word] >> bit) & 1
}

/// Checks whether x represents zero.
pub fn is_zero(x: &[Limb]) -> bool {
    x.iter().all(|&limb| limb == 0)
}

/// Compares x and y as non-negative integers, skipping high zero words of
/// the longer operand.
pub fn cmp(x: &[Limb], y: &[Limb]) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    // Make sure that x has at least as many limbs as y, remembering if we
    // swapped to fix the ordering at the end.
    let (x, y, swapped) = if x.len() < y.len() { (y, x, true) } else { (x, y, false) };
    let flip = |ord: Ordering| if swapped { ord.reverse() } else { ord };

    for i in (y.len()..x.len()).rev() {
        if x[i] != 0 {
            return flip(Ordering::Greater);
        }
    }
    for i in (0..y.len()).rev() {
        if x[i] != y[i] {
            return flip(x[i].cmp(&y[i]));
        }
    }
    Ordering::Equal
}

/// Shifts x left by the given number of bits within the allocated limbs,
/// i.e. bits shifted above the top limb are lost.
pub fn shift_left(x: &mut [Limb], offset: usize) {
    if offset == 0 {
        return;
    }
    if offset >= x.len() * WORDSIZE {
        set_zero(x);
        return;
    }

    let word_offset = offset / WORDSIZE;
    if word_offset > 0 {
        for j in (word_offset..x.len()).rev() {
            x[j] = x[j - word_offset];
        }
        for j in 0..word_offset {
            x[j] = 0;
        }
    }

    let bit_offset = offset % WORDSIZE;
    if bit_offset != 0 {
        let neg_bit_offset = WORDSIZE - bit_offset;
        for i in (1..x.len()).rev() {
            x[i] = ((x[i] << bit_offset) & MASK_ALL) | (x[i - 1] >> neg_bit_offset);
        }
        x[0] = (x[0] << bit_offset) & MASK_ALL;
    }
}

/// Shifts x right by the given number of bits within the allocated limbs.
pub fn shift_right(x: &mut [Limb], offset: usize) {
    if offset == 0 {
        return;
    }
    if offset >= x.len() * WORDSIZE {
        set_zero(x);
        return;
    }

    let word_offset = offset / WORDSIZE;
    if word_offset > 0 {
        for j in 0..x.len() - word_offset {
            x[j] = x[j + word_offset];
        }
        for j in x.len() - word_offset..x.len() {
            x[j] = 0;
        }
    }

    let bit_offset = offset % WORDSIZE;
    if bit_offset != 0 {
        let neg_bit_offset = WORDSIZE - bit_offset;
        let last = x.len() - 1;
        for i in 0..last {
            x[i] = (x[i] >> bit_offset) | ((x[i + 1] << neg_bit_offset) & MASK_ALL);
        }
        x[last] >>= bit_offset;
    }
}

/// Converts little-endian bytes into limbs. The result has at least one
/// limb.
pub fn from_bytes_le(bytes: &[u8]) -> Vec<Limb> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / WORDSIZE + 1);
    let mut acc: u64 = 0;
    let mut bits = 0;
    for &b in bytes {
        acc |= (b as u64) << bits;
        bits += 8;
        if bits >= WORDSIZE {
            out.push((acc & MASK_ALL as u64) as Limb);
            acc >>= WORDSIZE;
            bits -= WORDSIZE;
        }
    }
    if bits > 0 || out.is_empty() {
        out.push((acc & MASK_ALL as u64) as Limb);
    }
    out
}

/// Converts limbs into little-endian bytes, including high zero bytes for
/// the full limb count.
pub fn to_bytes_le(x: &[Limb]) -> Vec<u8> {
    let mut out = Vec::with_capacity(x.len() * WORDSIZE / 8 + 1);
    let mut acc: u64 = 0;
    let mut bits = 0;
    for &limb in x {
        acc |= (limb as u64) << bits;
        bits += WORDSIZE;
        while bits >= 8 {
            out.push((acc & 0xFF) as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push((acc & 0xFF) as u8);
    }
    if out.is_empty() {
        out.push(0);
    }
    out
}
