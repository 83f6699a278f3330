//! Service layer - wires the domain to a bit store

mod remote_bloom_filter;

pub use remote_bloom_filter::RemoteBloomFilter;
