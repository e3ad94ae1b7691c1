//! Walks the back-pointer buffer backwards from the cell where the running
//! minimum was attained, producing a gapped alignment of the covered truth
//! and query substrings.

use crate::codec::Tag;
use crate::simd::VectorOps;

use super::store::TraceStore;

pub struct Reconstruction {
    pub first_pos: i64,
    pub truth_alignment: String,
    pub query_alignment: String,
}

/// `None` signals score overflow: out-of-range `s`/lane indicates the
/// trace was never populated that far, which can only happen if the
/// packed scores saturated against `INFINITY` partway through the loop.
pub fn reconstruct<V: VectorOps>(
    truth: &[u8],
    query: &[u8],
    trace: &TraceStore<V>,
    exit_step: usize,
) -> Option<Reconstruction> {
    let lanes = V::LANES;
    let q_len = query.len();

    if q_len == 0 || exit_step / 2 < q_len {
        return None;
    }

    let mut s = exit_step;
    let mut i = s / 2 - q_len;
    let mut y = q_len;
    let mut x = s.checked_sub(y)?;

    if i >= lanes {
        return None;
    }

    let mut state = read_tag(trace, s, i, Tag::Match)?;

    let mut truth_rev = Vec::new();
    let mut query_rev = Vec::new();

    while y > 0 {
        match state {
            Tag::Match => {
                if x == 0 {
                    return None;
                }
                x -= 1;
                y -= 1;
                truth_rev.push(*truth.get(x)?);
                query_rev.push(*query.get(y)?);
                if s < 2 {
                    return None;
                }
                s -= 2;
            }
            Tag::Insert => {
                if y == 0 {
                    return None;
                }
                y -= 1;
                truth_rev.push(b'-');
                query_rev.push(*query.get(y)?);
                if s < 1 {
                    return None;
                }
                s -= 1;
                i += s & 1;
            }
            Tag::Delete => {
                if x == 0 {
                    return None;
                }
                x -= 1;
                truth_rev.push(*truth.get(x)?);
                query_rev.push(b'-');
                if s < 1 {
                    return None;
                }
                s -= 1;
                i += s & 1;
            }
        }

        if i >= lanes {
            return None;
        }

        if y == 0 {
            break;
        }

        state = read_tag(trace, s, i, state)?;
    }

    truth_rev.reverse();
    query_rev.reverse();

    Some(Reconstruction {
        first_pos: x as i64,
        truth_alignment: String::from_utf8_lossy(&truth_rev).into_owned(),
        query_alignment: String::from_utf8_lossy(&query_rev).into_owned(),
    })
}

fn read_tag<V: VectorOps>(trace: &TraceStore<V>, s: usize, lane: usize, from: Tag) -> Option<Tag> {
    let bp = trace.step(s)?;
    let shift = 2 * (from.bits() as u32);
    let bits = (bp.extract(lane) >> shift) & 0x3;
    Tag::from_bits(bits)
}
