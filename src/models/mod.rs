pub mod chat;
pub mod daily_entry;
pub mod settings;
