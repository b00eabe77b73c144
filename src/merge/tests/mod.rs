//! Tests for embedding merging
//!
//! - `common`: Shared fixtures for contributions and permutations
//! - `linear`: Masked linear average behaviour
//! - `slerp`: Pairwise SLERP and its linear fallbacks
//! - `orientation`: Base-model ordering for SLERP
//! - `error_cases`: Error taxonomy
//! - `property`: Property-based tests using proptest

mod common;
mod slerp;
