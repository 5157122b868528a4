//! Port implementations: in-memory and RocksDB stores, clocks, and the
//! simulated payment gateway.

pub mod clock;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod simulated_gateway;
