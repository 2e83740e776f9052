// checkout/src/pipeline/mod.rs

//! The `Pipeline<TData, Err>` struct, its hooks and its execution logic.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
