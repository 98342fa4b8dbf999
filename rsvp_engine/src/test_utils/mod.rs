mod memory_store;
#[cfg(feature = "sqlite")]
pub mod prepare_env;
mod recording_push;

pub use memory_store::MemoryDatabase;
pub use recording_push::RecordingPushDelivery;
