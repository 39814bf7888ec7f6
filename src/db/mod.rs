mod pool;

pub mod chats;
pub mod entries;
pub mod settings;

pub use pool::create_pool;
#[cfg(test)]
pub use pool::{lazy_pool, test_pool};
