//! Views computed from a filtered observation frame.
//!
//! Every function here is pure: the same frame in gives the same output.

pub mod correlation;
pub mod daily;
pub mod error;
pub mod hourly;
pub mod monthly;
