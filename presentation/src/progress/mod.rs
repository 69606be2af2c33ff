//! Progress reporting during orchestration

pub mod reporter;
