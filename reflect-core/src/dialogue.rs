//! Conversation heuristics and prompt construction for the reflection dialogue.
//!
//! Everything here is pure: the caller resupplies the full transcript on every
//! turn and nothing is remembered between calls.

use crate::models::{ChatMessage, Role};

/// Greeting shown before the user has said anything.
pub const OPENING_MESSAGE: &str = "Hello. I'd like to talk with you about your leadership journey. My first question: Think of an important decision you made recently. What did you pay attention to when making that decision?";

/// Persona shared by every upstream request.
pub const SYSTEM_PROMPT: &str = "You are a thoughtful leadership coach having a reflective conversation. Ask open-ended questions about decision-making, responsibility, values, and self-awareness. Be warm and conversational. Keep responses to 1-2 sentences.";

/// Words in the latest user message that end the dialogue early.
pub const CONCLUSION_KEYWORDS: [&str; 5] = ["conclusion", "recommend", "program", "report", "summary"];

/// Number of assistant turns after which the dialogue always concludes.
pub const MAX_DEPTH: usize = 6;

/// Trailing messages embedded in the report prompt.
pub const REPORT_CONTEXT_MESSAGES: usize = 4;

const REPORT_TEMPLATE: &str = "Now write a thoughtful Leadership Reflection Report with these sections:
1. Overall Approach (2-3 paragraphs about their leadership style)
2. Strengths (3 bullet points)
3. Development Areas (2 bullet points)
4. Focus Themes (3 bullet points)
5. Program Recommendation (Recommend either NPL for emerging leaders or LIR for experienced leaders, 1 paragraph)

Write naturally and warmly. No scores or judgments.";

/// Derived view of a transcript. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    /// Count of assistant-authored messages.
    pub depth: usize,
    /// Most recent user message, lower-cased. Empty if the user has not spoken.
    pub last_user: String,
}

impl ConversationState {
    pub fn from_transcript(transcript: &[ChatMessage]) -> Self {
        let depth = transcript.iter().filter(|m| m.role == Role::Assistant).count();
        let last_user = latest_user_message(transcript)
            .map(|c| c.to_lowercase())
            .unwrap_or_default();
        Self { depth, last_user }
    }

    pub fn asks_for_conclusion(&self) -> bool {
        CONCLUSION_KEYWORDS.iter().any(|k| self.last_user.contains(k))
    }

    pub fn should_conclude(&self) -> bool {
        self.asks_for_conclusion() || self.depth >= MAX_DEPTH
    }
}

/// Content of the most recent user message, verbatim.
pub fn latest_user_message(transcript: &[ChatMessage]) -> Option<&str> {
    transcript
        .iter()
        .rev()
        .find(|m| m.is_user())
        .map(|m| m.content.as_str())
}

fn speaker_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Coach",
    }
}

/// Render the tail of the transcript as `Speaker: text` lines.
pub fn recent_history(transcript: &[ChatMessage], count: usize) -> String {
    let start = transcript.len().saturating_sub(count);
    transcript[start..]
        .iter()
        .map(|m| format!("{}: {}", speaker_label(m.role), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn report_prompt(transcript: &[ChatMessage]) -> String {
    format!(
        "{}\n\nConversation so far:\n{}\n\n{}",
        SYSTEM_PROMPT,
        recent_history(transcript, REPORT_CONTEXT_MESSAGES),
        REPORT_TEMPLATE
    )
}

pub fn question_prompt(transcript: &[ChatMessage]) -> String {
    let last = latest_user_message(transcript).unwrap_or_default();
    format!(
        "You're a leadership coach in a reflective conversation. The user just said: \"{}\"\n\nAsk a thoughtful follow-up question about their leadership approach, values, or decision-making. Keep it to 1-2 sentences, warm and conversational.",
        last
    )
}
