//! Runtime system
//!
//! The coroutine contract and the cooperative scheduler that drives it.

pub mod coroutine;
pub mod scheduler;
