//! Integration flows across the engine, the batch model and the stores.

pub mod concurrency;
pub mod expiry;
pub mod scenario;
