//! Dialogue subsystem: turns a transcript into the next coaching step
//!
//! This subsystem implements `POST /chat`:
//! - Derives conversation depth and the latest user message from the transcript
//! - Concludes on a keyword in the latest user message or after six coach turns
//! - Asks the upstream generator for a follow-up question or a final report
//! - Falls back to the offline generator on ANY upstream failure
//!
//! The outcome records whether live or offline text was used. That marker is
//! for logs and tests only; the HTTP response never exposes it.

use std::sync::Arc;

use reflect_core::config::GenerationConfig;
use reflect_core::dialogue::{self, ConversationState, SYSTEM_PROMPT};
use reflect_core::fallback;
use reflect_core::generation::{
    ChatCompletionClient, GenerationError, GenerationRequest, TextGenerator,
};
use reflect_core::{ChatMessage, Program, ReflectError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueStep {
    Continue { question: String },
    Complete { report: String, program: Program },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub step: DialogueStep,
    pub source: GenerationSource,
}

impl Advance {
    pub fn is_complete(&self) -> bool {
        matches!(self.step, DialogueStep::Complete { .. })
    }

    /// External wire shape. Deliberately identical for live and fallback text.
    pub fn to_json(&self) -> serde_json::Value {
        match &self.step {
            DialogueStep::Continue { question } => serde_json::json!({
                "message": question,
                "complete": false,
            }),
            DialogueStep::Complete { report, program } => serde_json::json!({
                "complete": true,
                "report": report,
                "program": program,
            }),
        }
    }
}

/// Stateless controller; the full transcript is supplied on every call.
#[derive(Clone)]
pub struct DialogueController {
    generator: Option<Arc<dyn TextGenerator>>,
    question_max_tokens: u32,
    report_max_tokens: u32,
}

impl DialogueController {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: &GenerationConfig) -> Self {
        Self {
            generator,
            question_max_tokens: config.question_max_tokens,
            report_max_tokens: config.report_max_tokens,
        }
    }

    /// Build from config. A missing credential selects offline-only mode.
    pub fn from_config(config: &GenerationConfig) -> Self {
        let generator: Option<Arc<dyn TextGenerator>> =
            match ChatCompletionClient::from_config(config) {
                Ok(client) => {
                    tracing::info!(model = %config.model, "Live generation enabled");
                    Some(Arc::new(client))
                }
                Err(GenerationError::MissingApiKey) => {
                    tracing::warn!(
                        env = %config.api_key_env,
                        "No generation credential set; dialogue runs on offline fallback only"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build generation client; using offline fallback");
                    None
                }
            };
        Self::new(generator, config)
    }

    pub fn offline(config: &GenerationConfig) -> Self {
        Self::new(None, config)
    }

    pub fn is_live(&self) -> bool {
        self.generator.is_some()
    }

    /// Decide continue-vs-conclude and produce the next step.
    ///
    /// Only an empty transcript is an error. Upstream failures never surface.
    pub async fn advance(&self, transcript: &[ChatMessage]) -> Result<Advance, ReflectError> {
        if transcript.is_empty() {
            return Err(ReflectError::invalid("messages must be a non-empty array"));
        }

        let state = ConversationState::from_transcript(transcript);

        if state.should_conclude() {
            Ok(self.conclude(transcript, &state).await)
        } else {
            Ok(self.next_question(transcript, &state).await)
        }
    }

    async fn conclude(&self, transcript: &[ChatMessage], state: &ConversationState) -> Advance {
        let request = GenerationRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: dialogue::report_prompt(transcript),
            max_tokens: self.report_max_tokens,
        };

        match self.generate(&request, state).await {
            Some(report) => {
                let program = Program::from_report_text(&report);
                Advance {
                    step: DialogueStep::Complete { report, program },
                    source: GenerationSource::Live,
                }
            }
            None => {
                let r = fallback::report(transcript);
                Advance {
                    step: DialogueStep::Complete {
                        report: r.content,
                        program: r.program,
                    },
                    source: GenerationSource::Fallback,
                }
            }
        }
    }

    async fn next_question(&self, transcript: &[ChatMessage], state: &ConversationState) -> Advance {
        let request = GenerationRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: dialogue::question_prompt(transcript),
            max_tokens: self.question_max_tokens,
        };

        match self.generate(&request, state).await {
            Some(question) => Advance {
                step: DialogueStep::Continue { question },
                source: GenerationSource::Live,
            },
            None => Advance {
                step: DialogueStep::Continue {
                    question: fallback::question(state.depth).to_string(),
                },
                source: GenerationSource::Fallback,
            },
        }
    }

    /// One upstream attempt. `None` means use the offline generator.
    async fn generate(&self, request: &GenerationRequest, state: &ConversationState) -> Option<String> {
        let generator = self.generator.as_ref()?;
        match generator.generate(request).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(
                    backend = generator.name(),
                    depth = state.depth,
                    error = %e,
                    "Generation failed; using offline fallback"
                );
                None
            }
        }
    }
}
