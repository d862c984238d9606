pub mod chat;
pub mod event;
pub mod program;

pub use chat::{ChatMessage, Role};
pub use event::{AnalyticsEvent, AnalyticsSummary, EventKind};
pub use program::Program;
