//! Cross-venue matching.
//!
//! A run moves through fixed stages:
//!
//! 1. **Resolve**: topic string to canonical topic to pipeline
//! 2. **Fetch**: both venues' candidates, concurrently
//! 3. **Prepare**: dedupe, eligibility filter, signal extraction
//! 4. **Pair**: score every left/right pair, drop those under `min_score`
//! 5. **Cap**: mutual top-K per side
//! 6. **Decide**: suggest, auto-confirm or auto-reject, then upsert
//! 7. **Aggregate**: counts, score distribution and errors
//!
//! # Modules
//!
//! - [`engine`]: the single-topic run
//! - [`pairing`]: scoring and selection helpers
//! - [`batch`]: sequential multi-topic runs

pub mod batch;
pub mod engine;
pub mod pairing;
