pub mod coach;
pub mod entries;
pub mod health;
pub mod reports;
pub mod settings;
pub mod summaries;
