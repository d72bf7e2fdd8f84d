// # Persisted State
//
// This module provides the IpCache implementations and the reader for the
// `current_host` file naming the host's main domain.

pub mod file;
pub mod host;
pub mod memory;

pub use file::FileIpCache;
pub use host::read_current_host;
pub use memory::MemoryIpCache;
