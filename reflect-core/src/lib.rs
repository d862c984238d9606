pub mod assessment;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod fallback;
pub mod generation;
pub mod models;

pub use assessment::{AssessmentError, Profile, TraitBucket};
pub use config::ReflectConfig;
pub use dialogue::ConversationState;
pub use error::ReflectError;
pub use generation::{
    ChatCompletionClient, GenerationError, GenerationRequest, TextGenerator,
};
pub use models::{AnalyticsEvent, AnalyticsSummary, ChatMessage, EventKind, Program, Role};
