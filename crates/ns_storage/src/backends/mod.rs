pub mod file;
pub mod memory;

pub use file::{FileStorage, DEFAULT_KEYWORDS_FILE};
pub use memory::MemoryStorage;
