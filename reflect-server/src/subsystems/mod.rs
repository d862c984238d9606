pub mod analytics;
pub mod dialogue;
