pub mod coach;
pub mod compliance;
pub mod generation;
pub mod motivation;
pub mod reports;
pub mod validation;
