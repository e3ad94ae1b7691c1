//! The banded anti-diagonal recurrence: advances the three-state HMM one
//! half step at a time, entirely through lane shifts, min/max, add and
//! compare on the current `VectorOps` backend.

use crate::codec::{self, Tag, INFINITY};
use crate::simd::VectorOps;
use crate::trace::TraceStore;

use super::windows::{GapPenalty, MAX_N_QUALITY, N_SCORE, QUERY_PAD, TRACE_SHIFT, TRUTH_PAD};

/// The three state vectors for one half-step parity.
#[derive(Clone, Copy)]
struct BandState<V: VectorOps> {
    m: V,
    i: V,
    d: V,
}

impl<V: VectorOps> BandState<V> {
    fn seeded() -> Self {
        BandState {
            m: V::broadcast(INFINITY),
            i: V::broadcast(INFINITY),
            d: V::broadcast(INFINITY),
        }
    }

    /// Capture this half step's back-pointer vector, then canonicalise the
    /// low tag bits of `m`, `i`, `d` to their own state's constant so the
    /// next half step's `min()` calls report correct predecessors.
    fn finish(&mut self, trace: &mut Option<TraceStore<V>>) {
        if let Some(store) = trace {
            let mt = self.m.and(V::broadcast(0x3));
            let it = self.i.and(V::broadcast(0x3)).shift_left_bits::<2>();
            let dt = self.d.and(V::broadcast(0x3)).shift_left_bits::<6>();
            store.push(mt.or(it).or(dt));
        }
        self.m = set_tag(self.m, Tag::Match);
        self.i = set_tag(self.i, Tag::Insert);
        self.d = set_tag(self.d, Tag::Delete);
    }
}

#[inline]
fn set_tag<V: VectorOps>(v: V, tag: Tag) -> V {
    let cleared = V::broadcast(0x3).andnot(v);
    cleared.or(V::broadcast(tag.bits()))
}

/// Running minimum over the exit column, tracked as the half-step index at
/// which it was attained (needed by the reconstructor to seed its walk).
#[derive(Clone, Copy)]
struct ExitMin {
    raw: i16,
    step: usize,
}

/// Outcome of running the full recurrence.
pub struct BandRunResult<V: VectorOps> {
    pub score: i16,
    pub exit_step: Option<usize>,
    pub trace: Option<TraceStore<V>>,
}

/// Inputs and mutable DP state for one `score_only`/`score_and_align` call.
pub struct BandEngine<'a, V: VectorOps> {
    truth: &'a [u8],
    query: &'a [u8],
    qual: &'a [i8],
    gap_open: GapPenalty<'a>,
    gap_extend: GapPenalty<'a>,
    nuc_prior: V,

    state1: BandState<V>,
    state2: BandState<V>,

    twin: V,
    qwin: V,
    qqwin: V,
    go_win: V,
    ge_win: V,
    tnq: V,

    initmask: V,
    initmask2: V,

    truth_cursor: usize,
    query_cursor: usize,

    exit_min: Option<ExitMin>,
}

impl<'a, V: VectorOps> BandEngine<'a, V> {
    pub fn new(
        truth: &'a [u8],
        query: &'a [u8],
        qual: &'a [i8],
        gap_open: GapPenalty<'a>,
        gap_extend: GapPenalty<'a>,
        nuc_prior: i16,
    ) -> Self {
        let lanes = V::LANES;
        let initial_truth_len = lanes.min(truth.len());

        let twin = V::load_reverse(&truth[..initial_truth_len], TRUTH_PAD);
        let tnq = build_tnq::<V>(&truth[..initial_truth_len], TRUTH_PAD);
        let (go_win, ge_win) = load_gap_windows::<V>(&gap_open, &gap_extend, 0, lanes);

        // The band starts with no target bases consumed yet.
        let qwin = V::broadcast(QUERY_PAD as i16);
        let qqwin = V::broadcast((MAX_N_QUALITY as i16) << TRACE_SHIFT);

        let initmask = V::broadcast(-1);
        let initmask2 = V::zero_with_last(codec::BIAS);

        let mut state1 = BandState::seeded();
        state1.m = initmask2;
        let state2 = BandState::seeded();

        BandEngine {
            truth,
            query,
            qual,
            gap_open,
            gap_extend,
            nuc_prior: V::broadcast((nuc_prior.max(0)) << TRACE_SHIFT),
            state1,
            state2,
            twin,
            qwin,
            qqwin,
            go_win,
            ge_win,
            tnq,
            initmask,
            initmask2,
            truth_cursor: lanes.min(truth.len()),
            query_cursor: 0,
            exit_min: None,
        }
    }

    /// Run the full recurrence. Writes one back-pointer vector per half
    /// step to `trace` when present. Returns the bias-corrected score
    /// together with the half-step index the minimum was attained at
    /// (needed to seed the reconstructor).
    pub fn run(mut self, mut trace: Option<TraceStore<V>>) -> BandRunResult<V> {
        let q_len = self.query.len();
        let lanes = V::LANES;
        let total_half_steps = 2 * (q_len + lanes);

        let mut s = 0usize;
        while s < total_half_steps {
            self.advance_even(s, &mut trace);
            if s + 1 < total_half_steps {
                self.advance_odd(s + 1, &mut trace);
            }
            s += 2;
        }

        let score = self
            .exit_min
            .map(|m| codec::report_score(m.raw))
            .unwrap_or(INFINITY);
        BandRunResult {
            score,
            exit_step: self.exit_min.map(|m| m.step),
            trace,
        }
    }

    fn fold_exit_min(&mut self, m: V, s: usize, q_len: usize, lanes: usize) {
        if s / 2 < q_len {
            return;
        }
        let lane = s / 2 - q_len;
        if lane >= lanes {
            return;
        }
        let raw = m.extract(lane);
        let better = match self.exit_min {
            None => true,
            Some(cur) => raw < cur.raw,
        };
        if better {
            self.exit_min = Some(ExitMin { raw, step: s });
        }
    }

    fn advance_even(&mut self, s: usize, trace: &mut Option<TraceStore<V>>) {
        let lanes = V::LANES;
        let q_len = self.query.len();

        // 1. shift in the next target base/quality at lane 0.
        let next_base = self.query.get(self.query_cursor).copied().unwrap_or(QUERY_PAD);
        let next_qual = self
            .qual
            .get(self.query_cursor)
            .copied()
            .unwrap_or(MAX_N_QUALITY);
        self.query_cursor += 1;

        self.qwin = self.qwin.shift_right_bytes::<2>().insert(next_base as i16, 0);
        self.qqwin = self
            .qqwin
            .shift_right_bytes::<2>()
            .insert((next_qual as i16) << TRACE_SHIFT, 0);

        // 2. clear-init seeding of M1/M2 while still inside the first
        //    `lanes` half steps.
        self.state1.m = self.initmask2.or(self.initmask.andnot(self.state1.m));
        self.state2.m = self.initmask2.or(self.initmask.andnot(self.state2.m));

        // 3. fold match/mismatch predecessor choice.
        self.state1.m = self.state1.m.min(self.state1.i.min(self.state1.d));

        // 4. exit-column extraction.
        self.fold_exit_min(self.state1.m, s, q_len, lanes);

        // 5. emission.
        let mismatch = self.qwin.cmpeq(self.twin).andnot(self.qqwin);
        self.state1.m = self.state1.m.add(mismatch.min(self.tnq));

        // 6. deletion, carried from the opposite-parity state.
        let open = self.state2.m.min(self.state2.i).add(self.go_win.shift_right_bytes::<2>());
        self.state1.d = self.state2.d.add(self.ge_win).min(open);
        self.state1.d = self.state1.d.shift_right_bytes::<2>().insert(INFINITY, 0);

        // 7. insertion, carried from the opposite-parity state.
        let opened = self.state2.m.add(self.go_win);
        let extended = self.state2.i.add(self.ge_win);
        self.state1.i = extended.min(opened).add(self.nuc_prior);

        self.state1.finish(trace);
    }

    fn advance_odd(&mut self, s: usize, trace: &mut Option<TraceStore<V>>) {
        let lanes = V::LANES;
        let q_len = self.query.len();

        // 1. shift in the next truth base at the top lane.
        let next_truth = self.truth.get(self.truth_cursor).copied().unwrap_or(TRUTH_PAD);
        self.truth_cursor += 1;
        self.twin = self.twin.shift_left_bytes::<2>().insert(next_truth as i16, lanes - 1);
        self.tnq = self.tnq.shift_left_bytes::<2>().insert(
            if next_truth == b'N' {
                N_SCORE << TRACE_SHIFT
            } else {
                INFINITY
            },
            lanes - 1,
        );

        // 2. refresh gap-penalty windows from the per-position tables.
        let (go, ge) = load_gap_windows::<V>(&self.gap_open, &self.gap_extend, self.truth_cursor, lanes);
        self.go_win = go;
        self.ge_win = ge;

        // 3. shrink the init masks by one lane.
        self.initmask = self.initmask.shift_left_bytes::<2>();
        self.initmask2 = self.initmask2.shift_left_bytes::<2>();

        // mirror of the even half step, 1<->2 swapped.
        self.state2.m = self.initmask2.or(self.initmask.andnot(self.state2.m));
        self.state1.m = self.initmask2.or(self.initmask.andnot(self.state1.m));

        self.state2.m = self.state2.m.min(self.state2.i.min(self.state2.d));

        self.fold_exit_min(self.state2.m, s, q_len, lanes);

        let mismatch = self.qwin.cmpeq(self.twin).andnot(self.qqwin);
        self.state2.m = self.state2.m.add(mismatch.min(self.tnq));

        let open = self.state1.m.min(self.state1.i).add(self.go_win.shift_right_bytes::<2>());
        self.state2.d = self.state1.d.add(self.ge_win).min(open);
        self.state2.d = self.state2.d.shift_right_bytes::<2>().insert(INFINITY, 0);

        let opened = self.state1.m.add(self.go_win);
        let extended = self.state1.i.add(self.ge_win);
        self.state2.i = extended.min(opened).add(self.nuc_prior);

        self.state2.finish(trace);
    }
}

fn build_tnq<V: VectorOps>(bases: &[u8], pad: u8) -> V {
    let lanes = V::LANES;
    let mut v = V::broadcast(INFINITY);
    for lane in 0..lanes {
        let src_idx = lanes - 1 - lane;
        let b = bases.get(src_idx).copied().unwrap_or(pad);
        if b == b'N' {
            v = v.insert(N_SCORE << TRACE_SHIFT, lane);
        }
    }
    v
}

/// Load the gap-open/gap-extend windows covering `lanes` truth positions
/// starting at `start`, reversed and pre-shifted to align with a packed
/// cell (so adding them never disturbs the low trace-tag bits).
fn load_gap_windows<V: VectorOps>(
    gap_open: &GapPenalty,
    gap_extend: &GapPenalty,
    start: usize,
    lanes: usize,
) -> (V, V) {
    let mut open_vals = [0i8; 64];
    let mut ext_vals = [0i8; 64];
    let n = lanes.min(open_vals.len());
    let len = gap_open.len();
    for k in 0..n {
        let pos = start + k;
        let in_range = len.map(|l| pos < l).unwrap_or(true);
        if in_range {
            open_vals[k] = gap_open.at(pos);
            ext_vals[k] = gap_extend.at(pos);
        }
    }
    let go = V::load_reverse_shifted(&open_vals[..n], 0, TRACE_SHIFT);
    let ge = V::load_reverse_shifted(&ext_vals[..n], 0, TRACE_SHIFT);
    (go, ge)
}
