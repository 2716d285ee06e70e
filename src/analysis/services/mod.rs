/// Pure domain services: scoring, advisory merging, and the offline
/// fallback table. Nothing in this module performs I/O.
pub mod advisory_merge;
pub mod fallback_advisories;
pub mod trust_calculator;

pub use advisory_merge::merge_advisories;
pub use fallback_advisories::fallback_advisories;
pub use trust_calculator::calculate_trust_score;
