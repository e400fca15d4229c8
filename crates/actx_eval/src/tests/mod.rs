//! Behavioral suites for the node engine, driven through the public facade.
//!
//! Every test builds its expressions over objects it owns, so nodes are never
//! shared between concurrently running tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]


mod collection_tests;
mod short_circuit_tests;
