use std::fmt;

/// Contract violations caught before the band engine runs. These are
/// programmer errors, not scoring outcomes — a score overflow during the
/// recurrence itself is reported separately as the documented `-1`
/// sentinel, never as one of these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignerError {
    /// `|T| > B`, `|T| == |Q| + 2*B - 1`, `|q| == |Q|`, or
    /// `|gO| == |gE| == |T|` (when given per-position) did not hold.
    ShapeMismatch { detail: String },
    /// An alignment-mode output buffer is smaller than `2*|T| + 1`.
    BufferTooSmall { required: usize, actual: usize },
    /// A per-position gap penalty fell outside `0..=(INFINITY >> 2)`.
    InvalidGapPenalty { truth_pos: usize, value: i8 },
}

impl fmt::Display for AlignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignerError::ShapeMismatch { detail } => {
                write!(f, "input shape precondition violated: {detail}")
            }
            AlignerError::BufferTooSmall { required, actual } => {
                write!(f, "alignment buffer too small: need {required}, got {actual}")
            }
            AlignerError::InvalidGapPenalty { truth_pos, value } => {
                write!(f, "gap penalty {value} at truth position {truth_pos} out of range")
            }
        }
    }
}

impl std::error::Error for AlignerError {}
