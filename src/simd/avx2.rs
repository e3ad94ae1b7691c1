//! AVX2 backend: 16 lanes of `i16` packed into one `__m256i`. Gated at
//! compile time by the `avx2` feature and at runtime by CPU-feature
//! detection performed once in `Backend::detect_best`/`is_supported` —
//! callers must not construct this backend on hardware lacking AVX2.

use std::arch::x86_64::*;

use super::VectorOps;

#[derive(Clone, Copy)]
pub struct Avx2Vector(__m256i);

#[target_feature(enable = "avx2")]
unsafe fn load(arr: &[i16; 16]) -> __m256i {
    unsafe { _mm256_loadu_si256(arr.as_ptr() as *const __m256i) }
}

#[target_feature(enable = "avx2")]
unsafe fn store(v: __m256i) -> [i16; 16] {
    let mut out = [0i16; 16];
    unsafe { _mm256_storeu_si256(out.as_mut_ptr() as *mut __m256i, v) };
    out
}

impl Avx2Vector {
    #[inline]
    fn to_array(self) -> [i16; 16] {
        unsafe { store(self.0) }
    }

    #[inline]
    fn from_array(a: [i16; 16]) -> Self {
        Avx2Vector(unsafe { load(&a) })
    }
}

impl VectorOps for Avx2Vector {
    const LANES: usize = 16;

    #[inline]
    fn broadcast(x: i16) -> Self {
        Avx2Vector(unsafe { _mm256_set1_epi16(x) })
    }

    #[inline]
    fn load_reverse(bases: &[u8], pad: u8) -> Self {
        let mut arr = [0i16; 16];
        for lane in 0..16 {
            let src_idx = 15 - lane;
            arr[lane] = bases.get(src_idx).copied().unwrap_or(pad) as i16;
        }
        Self::from_array(arr)
    }

    #[inline]
    fn load_reverse_shifted(vals: &[i8], pad: i8, shift: u32) -> Self {
        let mut arr = [0i16; 16];
        for lane in 0..16 {
            let src_idx = 15 - lane;
            let v = vals.get(src_idx).copied().unwrap_or(pad);
            arr[lane] = (v as i16) << shift;
        }
        Self::from_array(arr)
    }

    #[inline]
    fn zero_with_last(x: i16) -> Self {
        let mut arr = [0i16; 16];
        arr[15] = x;
        Self::from_array(arr)
    }

    #[inline]
    fn extract(self, i: usize) -> i16 {
        self.to_array()[i]
    }

    #[inline]
    fn insert(self, x: i16, i: usize) -> Self {
        let mut arr = self.to_array();
        arr[i] = x;
        Self::from_array(arr)
    }

    #[inline]
    fn add(self, other: Self) -> Self {
        Avx2Vector(unsafe { _mm256_add_epi16(self.0, other.0) })
    }

    #[inline]
    fn and(self, other: Self) -> Self {
        Avx2Vector(unsafe { _mm256_and_si256(self.0, other.0) })
    }

    #[inline]
    fn andnot(self, other: Self) -> Self {
        Avx2Vector(unsafe { _mm256_andnot_si256(self.0, other.0) })
    }

    #[inline]
    fn or(self, other: Self) -> Self {
        Avx2Vector(unsafe { _mm256_or_si256(self.0, other.0) })
    }

    #[inline]
    fn cmpeq(self, other: Self) -> Self {
        Avx2Vector(unsafe { _mm256_cmpeq_epi16(self.0, other.0) })
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        Avx2Vector(unsafe { _mm256_min_epi16(self.0, other.0) })
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        Avx2Vector(unsafe { _mm256_max_epi16(self.0, other.0) })
    }

    #[inline]
    fn shift_right_bytes<const K: i32>(self) -> Self {
        // AVX2's byte-shift intrinsics operate within each 128-bit lane, so
        // the whole-register shift is assembled across the two halves.
        let arr = self.to_array();
        let mut out = [0i16; 16];
        let lanes = (K / 2) as usize;
        for i in 0..16 {
            out[i] = if i >= lanes { arr[i - lanes] } else { 0 };
        }
        Self::from_array(out)
    }

    #[inline]
    fn shift_left_bytes<const K: i32>(self) -> Self {
        let arr = self.to_array();
        let mut out = [0i16; 16];
        let lanes = (K / 2) as usize;
        for i in 0..16 {
            out[i] = if i + lanes < 16 { arr[i + lanes] } else { 0 };
        }
        Self::from_array(out)
    }

    #[inline]
    fn shift_left_bits<const K: i32>(self) -> Self {
        Avx2Vector(unsafe { _mm256_slli_epi16::<K>(self.0) })
    }

    #[inline]
    fn shift_right_bits<const K: i32>(self) -> Self {
        Avx2Vector(unsafe { _mm256_srai_epi16::<K>(self.0) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::ScalarVector;

    fn to_scalar(v: Avx2Vector) -> ScalarVector<16> {
        ScalarVector(v.to_array())
    }

    #[test]
    fn matches_scalar_reference_on_basic_ops() {
        if !std::is_x86_feature_detected!("avx2") {
            return;
        }
        let bases = b"ACGTACGTACGTACGT";
        let avx = Avx2Vector::load_reverse(bases, b'N');
        let sca = ScalarVector::<16>::load_reverse(bases, b'N');
        assert_eq!(to_scalar(avx), sca);

        let a = Avx2Vector::broadcast(10);
        let b = Avx2Vector::broadcast(3);
        assert_eq!(to_scalar(a.add(b)), ScalarVector::<16>::broadcast(13));
    }
}
