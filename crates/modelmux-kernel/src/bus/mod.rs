// Message bus seam: wire envelope, transport trait, in-memory transport.

pub mod envelope;
pub mod memory;
pub mod traits;

pub use envelope::BusMessage;
pub use memory::InMemoryBus;
pub use traits::{BusError, BusResult, BusSubscription, MessageBus};
