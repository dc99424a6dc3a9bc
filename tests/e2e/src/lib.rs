//! Shared harness for VScore journey tests.

pub mod fixtures;
