//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for callers of the filter
//! - Driven Ports (outbound) - The remote bit store the filter depends on

pub mod inbound;
pub mod outbound;

pub use inbound::BloomFilterApi;
pub use outbound::BitStore;
