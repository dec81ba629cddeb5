mod chunking;
mod normalization;
mod reintegration;
#[cfg(test)]
mod tests;

pub use chunking::chunk_unit;
pub use normalization::{min_display_duration, normalize_timings};
pub use reintegration::reintegrate_cues;
