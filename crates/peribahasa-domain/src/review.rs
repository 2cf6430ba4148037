//! Review status module
//!
//! The storage layer keeps a single nullable `cek` column where `NULL` means
//! "not reviewed yet" and `-1` means "review attempt failed". Inside the
//! domain those two states and a real score are distinct variants, so a failed
//! review can never be mistaken for a very low confidence.

use std::fmt;

/// Entries scoring below this confidence need a human to look at them
pub const NEEDS_REVIEW_THRESHOLD: f64 = 0.5;

/// Stored value of the failure sentinel
pub const FAILED_SENTINEL: f64 = -1.0;

/// LLM-assigned confidence score in [0.0, 1.0]
///
/// 1.0 means the entry needed no change.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    /// Create a confidence score, rejecting values outside [0, 1] and NaN
    pub fn new(value: f64) -> Result<Self, String> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(format!("Confidence must be in [0, 1], got {}", value));
        }
        Ok(Self(value))
    }

    /// Create a confidence score, clamping out-of-range values into [0, 1]
    ///
    /// NaN is treated as 0.0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw score
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether this score flags the entry for human review
    pub fn needs_review(&self) -> bool {
        self.0 < NEEDS_REVIEW_THRESHOLD
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Review state of one entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReviewStatus {
    /// Not processed by the correction workflow yet
    Unreviewed,

    /// Reviewed by the LLM with the given confidence
    Reviewed(Confidence),

    /// The review attempt for this entry failed
    Failed,
}

impl ReviewStatus {
    /// Decode the stored `cek` column
    ///
    /// Any negative value is the failure sentinel. Positive values above 1.0
    /// written by older tooling are clamped.
    pub fn from_stored(value: Option<f64>) -> Self {
        match value {
            None => ReviewStatus::Unreviewed,
            Some(v) if v < 0.0 => ReviewStatus::Failed,
            Some(v) => ReviewStatus::Reviewed(Confidence::clamped(v)),
        }
    }

    /// Encode for the stored `cek` column
    pub fn to_stored(&self) -> Option<f64> {
        match self {
            ReviewStatus::Unreviewed => None,
            ReviewStatus::Reviewed(c) => Some(c.value()),
            ReviewStatus::Failed => Some(FAILED_SENTINEL),
        }
    }

    /// Whether the entry is still waiting for review
    pub fn is_unreviewed(&self) -> bool {
        matches!(self, ReviewStatus::Unreviewed)
    }

    /// Whether a human should look at the entry
    ///
    /// Only graded scores count; a failed review is reported separately.
    pub fn needs_review(&self) -> bool {
        matches!(self, ReviewStatus::Reviewed(c) if c.needs_review())
    }
}

/// Breakdown of the corpus by review state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewCounts {
    /// Entries never reviewed
    pub unreviewed: usize,

    /// Entries with a graded confidence
    pub reviewed: usize,

    /// Reviewed entries whose confidence is below the threshold
    pub needs_review: usize,

    /// Entries whose review attempt failed
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_bounds() {
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
        assert!(Confidence::new(-0.1).is_err());
        assert!(Confidence::new(1.01).is_err());
        assert!(Confidence::new(f64::NAN).is_err());
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Confidence::clamped(1.7).value(), 1.0);
        assert_eq!(Confidence::clamped(-3.0).value(), 0.0);
        assert_eq!(Confidence::clamped(f64::NAN).value(), 0.0);
        assert_eq!(Confidence::clamped(0.42).value(), 0.42);
    }

    #[test]
    fn test_stored_round_trip() {
        let statuses = [
            ReviewStatus::Unreviewed,
            ReviewStatus::Failed,
            ReviewStatus::Reviewed(Confidence::clamped(0.75)),
        ];
        for status in statuses {
            assert_eq!(ReviewStatus::from_stored(status.to_stored()), status);
        }
    }

    #[test]
    fn test_failed_is_not_low_confidence() {
        let failed = ReviewStatus::from_stored(Some(-1.0));
        assert_eq!(failed, ReviewStatus::Failed);
        assert!(!failed.needs_review());

        let low = ReviewStatus::from_stored(Some(0.2));
        assert!(low.needs_review());

        let high = ReviewStatus::from_stored(Some(0.9));
        assert!(!high.needs_review());
    }
}
