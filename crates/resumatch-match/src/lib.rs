//! Rule-based matchers: education level resolution with section context,
//! and skill/experience scoring. Everything here is a pure function over
//! the document text; no index or model state is touched.

pub mod education;
pub mod skills;

pub use education::{ConfidenceWeights, EducationMatcher};
