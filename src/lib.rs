//! Arbitrary-precision modular arithmetic with an elliptic-curve layer.
//!
//! This library provides the large-integer routines needed to implement
//! multiplicative groups and elliptic-curve groups over prime-order fields,
//! and nothing more.
//!
//! ## Architecture
//!
//! The code is layered from the bottom up:
//!
//! 1. **`limb`**: unsigned kernel over little-endian arrays of 28-bit limbs.
//!    Addition, subtraction, Karatsuba multiplication and squaring,
//!    reciprocal-based division, and windowed modular exponentiation.
//! 2. **`signed`**: mutable sign-magnitude integers on top of the kernel,
//!    with floor division, binary extended GCD, Legendre symbols, and
//!    Tonelli-Shanks square roots.
//! 3. **`integer`**: [`LargeInt`], the immutable public integer type.
//! 4. **`curve`**: Jacobian-coordinate point arithmetic over short
//!    Weierstrass curves.
//! 5. **`multiexp`**: simultaneous and fixed-base exponentiation on top of
//!    precomputed product tables.
//!
//! References: Handbook of Applied Cryptography (HAC) for the schoolbook
//! algorithms and "Improved division by invariant integers" by Moller and
//! Granlund (MG) for the division kernel.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod curve;
pub mod error;
pub mod integer;
pub mod limb;
pub mod multiexp;
pub mod random;
pub mod signed;

pub use curve::{Curve, Point};
pub use error::ArithError;
pub use integer::LargeInt;
pub use multiexp::{FixedBasePow, SimPowTable};
pub use random::RandomSource;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
