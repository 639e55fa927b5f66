//! Streambench
//!
//! Facade over [`streambench_core`]; the `streambench` binary lives in the
//! `streambench-cli` crate.

pub use streambench_core::*;
