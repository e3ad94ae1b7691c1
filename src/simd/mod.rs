//! Vector Backend capability: a narrow trait satisfied by one concrete type
//! per supported instruction set, plus the enum used to pick one of them at
//! `Aligner` construction time (mirrors `cnf_dnf::OptimizedFor`'s runtime
//! CPU-feature detection, generalised from "which AVX width" to "which SIMD
//! width for this band size").

mod scalar;

#[cfg(target_arch = "x86_64")]
mod sse2;

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
mod avx2;

pub use scalar::ScalarVector;

#[cfg(target_arch = "x86_64")]
pub use sse2::Sse2Vector;

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub use avx2::Avx2Vector;

/// Lane-wise operations over `LANES` signed 16-bit integers. Every
/// operation is pure and total: no operation faults on any input, and
/// there is no memory ordering to reason about (§4.1 of the design spec).
///
/// A portable implementation backed by a plain `[i16; LANES]` array must
/// agree bit-for-bit with any SIMD implementation of the same `LANES`.
pub trait VectorOps: Copy {
    /// Number of `i16` lanes; equals the band width `B`.
    const LANES: usize;

    /// All lanes set to `x`.
    fn broadcast(x: i16) -> Self;

    /// Lane `0` is `bases[len-1]`, ..., lane `LANES-1` is `bases[0]`
    /// (values past the end of `bases` are treated as `pad`).
    fn load_reverse(bases: &[u8], pad: u8) -> Self;

    /// As `load_reverse`, but each lane's value (sign-extended from `i8`)
    /// is left-shifted by `shift` bits before being stored.
    fn load_reverse_shifted(vals: &[i8], pad: i8, shift: u32) -> Self;

    /// All lanes zero except the last lane (`LANES-1`), which holds `x`.
    fn zero_with_last(x: i16) -> Self;

    fn extract(self, i: usize) -> i16;
    fn insert(self, x: i16, i: usize) -> Self;

    fn add(self, other: Self) -> Self;
    fn and(self, other: Self) -> Self;
    /// `(!self) & other`
    fn andnot(self, other: Self) -> Self;
    fn or(self, other: Self) -> Self;
    /// All-ones lanes where equal, zero otherwise.
    fn cmpeq(self, other: Self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;

    /// Whole-register shift by `K` *bytes* (a multiple of 2, the score
    /// size), zero-filled, moving data across lanes.
    fn shift_right_bytes<const K: i32>(self) -> Self;
    fn shift_left_bytes<const K: i32>(self) -> Self;

    /// Per-lane bit shift by `K` bits.
    fn shift_left_bits<const K: i32>(self) -> Self;
    fn shift_right_bits<const K: i32>(self) -> Self;
}

/// Which concrete `VectorOps` backend an `Aligner` runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Portable scalar-array reference backend, `B = 8`. Always available;
    /// used as the correctness oracle for property tests.
    Scalar,
    /// SSE2, 128-bit registers, `B = 8`. Always available on `x86_64`.
    Sse2,
    /// AVX2, 256-bit registers, `B = 16`. Gated by runtime CPU detection.
    Avx2,
}

impl Backend {
    pub const fn lanes(self) -> usize {
        match self {
            Backend::Scalar | Backend::Sse2 => 8,
            Backend::Avx2 => 16,
        }
    }

    /// Runtime CPU-feature detection: pick the widest backend supported by
    /// the current hardware. Falls back to `Sse2` (or `Scalar` off
    /// `x86_64`) when no wider instruction set is present.
    pub fn detect_best() -> Self {
        #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
        {
            if std::is_x86_feature_detected!("avx2") {
                return Backend::Avx2;
            }
        }
        #[cfg(target_arch = "x86_64")]
        {
            return Backend::Sse2;
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            Backend::Scalar
        }
    }

    pub fn is_supported(self) -> bool {
        match self {
            Backend::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            Backend::Sse2 => true,
            #[cfg(not(target_arch = "x86_64"))]
            Backend::Sse2 => false,
            #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
            Backend::Avx2 => std::is_x86_feature_detected!("avx2"),
            #[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
            Backend::Avx2 => false,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Backend::Scalar => "scalar (portable reference)",
            Backend::Sse2 => "SSE2 (128-bit, B=8)",
            Backend::Avx2 => "AVX2 (256-bit, B=16)",
        };
        write!(f, "{s}")
    }
}
