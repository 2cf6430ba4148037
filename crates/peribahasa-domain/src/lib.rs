//! Peribahasa Domain Layer
//!
//! This crate contains the core domain model for the peribahasa corpus manager.
//! It has ZERO external dependencies and defines the value objects and trait
//! interfaces that the storage, extraction, and review layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Entry**: One proverb (peribahasa) and its meaning (artinya)
//! - **Source**: The extractor that produced an entry
//! - **Review status**: Unreviewed, reviewed with a confidence score, or failed
//! - **Candidate**: A raw (proverb, meaning) pair before normalization
//! - **Timing**: Injectable clock and sleeper for rate limiting and backoff
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure domain logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod entry;
pub mod review;
pub mod source;
pub mod timing;
pub mod traits;

// Re-exports for convenience
pub use candidate::{normalize_text, RawCandidate};
pub use entry::{EntryError, EntryId, NewEntry, ProverbEntry};
pub use review::{Confidence, ReviewCounts, ReviewStatus, NEEDS_REVIEW_THRESHOLD};
pub use source::Source;
pub use timing::{Clock, ManualClock, Pacer, RecordingSleeper, Sleeper, SystemClock, ThreadSleeper};
