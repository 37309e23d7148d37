use std::fmt;

use serde::{Deserialize, Serialize};

/// Sequence number of one user submission; a larger token is a newer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionToken(pub u64);

impl SubmissionToken {
    pub const FIRST: Self = Self(1);

    /// Token for the submission issued right after this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
