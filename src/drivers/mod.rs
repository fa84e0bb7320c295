mod memory;
mod registry;

pub use self::memory::{ConnEvent, MemoryDriver, MemoryResponse, RecordedStatement};
pub use self::registry::DriverRegistry;
