// Adapters layer: concrete implementations of the domain ports.

pub mod filler;
pub mod llm;
pub mod storage;
