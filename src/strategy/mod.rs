//! Query Strategy Module
//!
//! - Sequential: `Document::find_all*` on the calling thread
//! - Parallel: independent queries fanned out over rayon's pool

pub mod parallel;

pub use parallel::{find_all_parallel, find_all_parallel_with_filters};
