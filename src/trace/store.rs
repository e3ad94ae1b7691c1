//! Back-pointer buffer: one vector per half step, indexable logically by
//! half-step number. Kept as a plain growable sequence rather than a raw
//! pointer reinterpretation into 16-bit words, per the portability note in
//! the design spec's Open Questions.

use smallvec::SmallVec;

use crate::simd::VectorOps;

/// Most real inputs keep `|T|` under a couple hundred bases; this keeps the
/// common case on the stack without capping the buffer's actual size.
const INLINE_STEPS: usize = 256;

pub struct TraceStore<V: VectorOps> {
    steps: SmallVec<[V; INLINE_STEPS]>,
}

impl<V: VectorOps> TraceStore<V> {
    pub fn with_capacity(half_steps: usize) -> Self {
        TraceStore {
            steps: SmallVec::with_capacity(half_steps),
        }
    }

    pub fn push(&mut self, v: V) {
        self.steps.push(v);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The back-pointer vector written at half step `s`, if it was reached.
    pub fn step(&self, s: usize) -> Option<&V> {
        self.steps.get(s)
    }
}
