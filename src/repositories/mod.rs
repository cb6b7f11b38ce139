// Repositories module - persistence layer

pub mod collection;
pub mod storage;


pub use collection::JsonCollection;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, UnavailableStorage};
