//! SSE2 backend: 8 lanes of `i16` packed into one `__m128i`. Always
//! available on `x86_64` (SSE2 is part of the baseline ABI), so this
//! backend needs no runtime feature probe of its own.

use std::arch::x86_64::*;

use super::VectorOps;

#[derive(Clone, Copy)]
pub struct Sse2Vector(__m128i);

impl Sse2Vector {
    #[inline]
    fn to_array(self) -> [i16; 8] {
        let mut out = [0i16; 8];
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0) };
        out
    }

    #[inline]
    fn from_array(a: [i16; 8]) -> Self {
        Sse2Vector(unsafe { _mm_loadu_si128(a.as_ptr() as *const __m128i) })
    }
}

impl VectorOps for Sse2Vector {
    const LANES: usize = 8;

    #[inline]
    fn broadcast(x: i16) -> Self {
        Sse2Vector(unsafe { _mm_set1_epi16(x) })
    }

    #[inline]
    fn load_reverse(bases: &[u8], pad: u8) -> Self {
        let mut arr = [0i16; 8];
        for lane in 0..8 {
            let src_idx = 7 - lane;
            arr[lane] = bases.get(src_idx).copied().unwrap_or(pad) as i16;
        }
        Self::from_array(arr)
    }

    #[inline]
    fn load_reverse_shifted(vals: &[i8], pad: i8, shift: u32) -> Self {
        let mut arr = [0i16; 8];
        for lane in 0..8 {
            let src_idx = 7 - lane;
            let v = vals.get(src_idx).copied().unwrap_or(pad);
            arr[lane] = (v as i16) << shift;
        }
        Self::from_array(arr)
    }

    #[inline]
    fn zero_with_last(x: i16) -> Self {
        let mut arr = [0i16; 8];
        arr[7] = x;
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
        Sse2Vector(unsafe { _mm_add_epi16(self.0, other.0) })
    }

    #[inline]
    fn and(self, other: Self) -> Self {
        Sse2Vector(unsafe { _mm_and_si128(self.0, other.0) })
    }

    #[inline]
    fn andnot(self, other: Self) -> Self {
        Sse2Vector(unsafe { _mm_andnot_si128(self.0, other.0) })
    }

    #[inline]
    fn or(self, other: Self) -> Self {
        Sse2Vector(unsafe { _mm_or_si128(self.0, other.0) })
    }

    #[inline]
    fn cmpeq(self, other: Self) -> Self {
        Sse2Vector(unsafe { _mm_cmpeq_epi16(self.0, other.0) })
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        Sse2Vector(unsafe { _mm_min_epi16(self.0, other.0) })
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        Sse2Vector(unsafe { _mm_max_epi16(self.0, other.0) })
    }

    // NOTE: `shift_right_bytes`/`shift_left_bytes` are named by which lane
    // they vacate (lane 0 vs. the top lane, matching the scalar reference),
    // which is the opposite of x86's byte-shift mnemonics: freeing lane 0
    // is `_mm_bslli_si128` ("shift left" in register-byte terms moves the
    // low byte out), and freeing the top lane is `_mm_bsrli_si128`.
    #[inline]
    fn shift_right_bytes<const K: i32>(self) -> Self {
        Sse2Vector(unsafe { _mm_bslli_si128::<K>(self.0) })
    }

    #[inline]
    fn shift_left_bytes<const K: i32>(self) -> Self {
        Sse2Vector(unsafe { _mm_bsrli_si128::<K>(self.0) })
    }

    #[inline]
    fn shift_left_bits<const K: i32>(self) -> Self {
        Sse2Vector(unsafe { _mm_slli_epi16::<K>(self.0) })
    }

    #[inline]
    fn shift_right_bits<const K: i32>(self) -> Self {
        Sse2Vector(unsafe { _mm_srai_epi16::<K>(self.0) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::ScalarVector;

    fn to_scalar(v: Sse2Vector) -> ScalarVector<8> {
        ScalarVector(v.to_array())
    }

    #[test]
    fn matches_scalar_reference_on_basic_ops() {
        let bases = b"ACGTACGT";
        let sse = Sse2Vector::load_reverse(bases, b'N');
        let sca = ScalarVector::<8>::load_reverse(bases, b'N');
        assert_eq!(to_scalar(sse), sca);

        let a = Sse2Vector::broadcast(10);
        let b = Sse2Vector::broadcast(3);
        assert_eq!(to_scalar(a.add(b)), ScalarVector::<8>::broadcast(13));
        assert_eq!(to_scalar(a.min(b)), ScalarVector::<8>::broadcast(3));
        assert_eq!(to_scalar(a.max(b)), ScalarVector::<8>::broadcast(10));
    }

    #[test]
    fn byte_shifts_match_scalar_reference() {
        let arr = [1i16, 2, 3, 4, 5, 6, 7, 8];
        let sse = Sse2Vector::from_array(arr);
        let sca = ScalarVector(arr);

        assert_eq!(to_scalar(sse.shift_left_bytes::<2>()), sca.shift_left_bytes::<2>());
        assert_eq!(to_scalar(sse.shift_right_bytes::<2>()), sca.shift_right_bytes::<2>());
    }
}
