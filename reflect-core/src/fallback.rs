//! Offline dialogue generator used whenever live generation is unavailable.
//!
//! Deterministic and free of I/O, so it is the path every test can reach
//! without a network.

use crate::models::{ChatMessage, Program};

pub const FALLBACK_QUESTIONS: [&str; 6] = [
    "Think of an experience where you led a team or project. What did you prioritize most during that process?",
    "How do you feel when facing uncertainty? Can you give an example?",
    "How do you feel when delegating responsibility to others?",
    "When did you most recently feel like a \"leader\"?",
    "What approach to communication comes most naturally to you?",
    "Have you ever faced a situation where you had to compromise your values? How did you decide?",
];

/// Words in any user message that indicate an experienced leader.
pub const EXPERIENCE_MARKERS: [&str; 3] = ["year", "team", "experience"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackReport {
    pub content: String,
    pub program: Program,
}

/// Question for the given conversation depth, saturating at the last entry.
pub fn question(depth: usize) -> &'static str {
    FALLBACK_QUESTIONS[depth.min(FALLBACK_QUESTIONS.len() - 1)]
}

pub fn has_experience(transcript: &[ChatMessage]) -> bool {
    transcript.iter().filter(|m| m.is_user()).any(|m| {
        let text = m.content.to_lowercase();
        EXPERIENCE_MARKERS.iter().any(|w| text.contains(w))
    })
}

pub fn report(transcript: &[ChatMessage]) -> FallbackReport {
    let program = if has_experience(transcript) {
        Program::Lir
    } else {
        Program::Npl
    };

    let content = format!(
        r#"# Leadership Reflection Report

## 1. OVERALL APPROACH

Throughout our conversation, I observed that you approach leadership from a thoughtful, human-centered perspective. You tend to consider both logical and emotional factors when making decisions. You don't shy away from taking responsibility, but you also value creating space for others.

Your relationship with uncertainty is open to growth. Sometimes you may feel fear of losing control, but you're aware of this. This awareness is the first step toward growth.

## 2. STRENGTHS

- **Self-Awareness**: You have a strong capacity to observe your own thoughts and feelings
- **Relational Sensitivity**: You pay attention to people's needs and emotions
- **Value-Centered**: You recognize the role of your values in your decisions

## 3. DEVELOPMENT AREAS

- **Dancing with Uncertainty**: Practicing acceptance of lack of control and seeing it as opportunity
- **Boundary Setting**: Balancing responsibility-taking with protecting your own boundaries

## 4. RECOMMENDED FOCUS THEMES

- Personal values and leadership identity
- Uncertainty and flexibility
- Communication and relationship-building skills

## 5. PROGRAM RECOMMENDATION

**{}** may be suitable for you. {}

---

This report is not a measurement, but a reflection. Your own observations are always your most valuable guide."#,
        program.display_name(),
        program.recommendation()
    );

    FallbackReport { content, program }
}
