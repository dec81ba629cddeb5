pub mod hypothesis;
pub mod interpolation;
pub mod report;
pub mod sequence;
pub mod similarity;
