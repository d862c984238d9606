//! Five-question leadership self-assessment.
//!
//! Each option carries a tag; four trait buckets each claim three tags. The
//! bucket holding the most answered tags picks the profile, with ties going to
//! the bucket declared first in [`TraitBucket::ALL`].

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("Unknown question id {0}")]
    UnknownQuestion(u8),

    #[error("Question {question} has no option '{tag}'")]
    UnknownOption { question: u8, tag: String },

    #[error("Question {0} was not answered")]
    MissingAnswer(u8),
}

#[derive(Debug, Serialize)]
pub struct AnswerOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Question {
    pub id: u8,
    pub question: &'static str,
    pub options: [AnswerOption; 4],
}

const fn opt(value: &'static str, label: &'static str) -> AnswerOption {
    AnswerOption { value, label }
}

pub static QUESTIONS: [Question; 5] = [
    Question {
        id: 1,
        question: "When facing a difficult decision, I tend to:",
        options: [
            opt("reflect", "Take time alone to reflect deeply"),
            opt("discuss", "Talk it through with trusted people"),
            opt("analyze", "Gather data and analyze options"),
            opt("intuition", "Trust my gut feeling"),
        ],
    },
    Question {
        id: 2,
        question: "What energizes me most as a leader?",
        options: [
            opt("vision", "Creating and sharing a compelling vision"),
            opt("people", "Supporting and developing others"),
            opt("systems", "Building systems and processes"),
            opt("impact", "Seeing tangible results and impact"),
        ],
    },
    Question {
        id: 3,
        question: "In moments of conflict, I usually:",
        options: [
            opt("mediate", "Try to understand all perspectives"),
            opt("direct", "Address it directly and clearly"),
            opt("pause", "Step back and give it time"),
            opt("solve", "Focus on finding solutions"),
        ],
    },
    Question {
        id: 4,
        question: "I feel most aligned when:",
        options: [
            opt("authentic", "I can be completely authentic"),
            opt("growing", "I'm learning and growing"),
            opt("contributing", "I'm contributing to something meaningful"),
            opt("creating", "I'm creating something new"),
        ],
    },
    Question {
        id: 5,
        question: "What do you value most in leadership?",
        options: [
            opt("integrity", "Integrity and consistency"),
            opt("empathy", "Empathy and understanding"),
            opt("clarity", "Clarity and direction"),
            opt("courage", "Courage and boldness"),
        ],
    },
];

pub fn question(id: u8) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitBucket {
    Reflective,
    Analytical,
    Collaborative,
    Visionary,
}

impl TraitBucket {
    /// Declaration order; also the tie-break order.
    pub const ALL: [TraitBucket; 4] = [
        TraitBucket::Reflective,
        TraitBucket::Analytical,
        TraitBucket::Collaborative,
        TraitBucket::Visionary,
    ];

    pub fn tags(&self) -> [&'static str; 3] {
        match self {
            TraitBucket::Reflective => ["reflect", "pause", "authentic"],
            TraitBucket::Analytical => ["analyze", "systems", "clarity"],
            TraitBucket::Collaborative => ["people", "mediate", "empathy"],
            TraitBucket::Visionary => ["intuition", "vision", "creating"],
        }
    }

    pub fn count(&self, answers: &[&str]) -> usize {
        let tags = self.tags();
        answers.iter().filter(|a| tags.iter().any(|t| t == *a)).count()
    }

    pub fn profile(&self) -> &'static Profile {
        match self {
            TraitBucket::Reflective => &PROFILES[0],
            TraitBucket::Analytical => &PROFILES[1],
            TraitBucket::Collaborative => &PROFILES[2],
            TraitBucket::Visionary => &PROFILES[3],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub bucket: TraitBucket,
    pub title: &'static str,
    pub description: &'static str,
    pub strengths: [&'static str; 4],
    pub growth: [&'static str; 3],
}

static PROFILES: [Profile; 4] = [
    Profile {
        bucket: TraitBucket::Reflective,
        title: "The Reflective Leader",
        description: "You lead from a place of deep inner awareness and authenticity. Your strength lies in your ability to pause, reflect, and bring genuine presence to your leadership.",
        strengths: [
            "Deep self-awareness and emotional intelligence",
            "Authentic and genuine in your interactions",
            "Thoughtful decision-making process",
            "Creates space for others to reflect and grow",
        ],
        growth: [
            "Balance reflection with timely action",
            "Share your internal process with others",
            "Trust that your authentic voice is enough",
        ],
    },
    Profile {
        bucket: TraitBucket::Analytical,
        title: "The Systematic Leader",
        description: "You bring clarity and structure to complexity. Your ability to see patterns, build systems, and think strategically creates stability and direction for those you lead.",
        strengths: [
            "Strong analytical and strategic thinking",
            "Creates clear processes and frameworks",
            "Data-informed decision making",
            "Brings order to chaos",
        ],
        growth: [
            "Balance logic with intuition and emotion",
            "Create space for ambiguity and emergence",
            "Connect systems thinking to human impact",
        ],
    },
    Profile {
        bucket: TraitBucket::Collaborative,
        title: "The Relational Leader",
        description: "You understand that leadership is fundamentally about people. Your empathy, listening skills, and ability to develop others creates environments where everyone can thrive.",
        strengths: [
            "High emotional intelligence and empathy",
            "Natural mentor and developer of people",
            "Creates psychological safety",
            "Builds strong, trusting relationships",
        ],
        growth: [
            "Balance care for others with self-care",
            "Practice making difficult decisions",
            "Set healthy boundaries",
        ],
    },
    Profile {
        bucket: TraitBucket::Visionary,
        title: "The Visionary Leader",
        description: "You see possibilities others miss and inspire people toward a compelling future. Your intuition and creative thinking helps teams imagine and create what doesn't yet exist.",
        strengths: [
            "Strong intuition and future-thinking",
            "Inspires and motivates others",
            "Comfortable with ambiguity",
            "Drives innovation and change",
        ],
        growth: [
            "Balance vision with practical execution",
            "Stay grounded in present reality",
            "Translate inspiration into actionable steps",
        ],
    },
];

/// Check that every question is answered with one of its own options.
pub fn validate(answers: &BTreeMap<u8, String>) -> Result<(), AssessmentError> {
    for (&id, tag) in answers {
        let q = question(id).ok_or(AssessmentError::UnknownQuestion(id))?;
        if !q.options.iter().any(|o| o.value == tag) {
            return Err(AssessmentError::UnknownOption {
                question: id,
                tag: tag.clone(),
            });
        }
    }
    if let Some(q) = QUESTIONS.iter().find(|q| !answers.contains_key(&q.id)) {
        return Err(AssessmentError::MissingAnswer(q.id));
    }
    Ok(())
}

/// Tally only; no validation. Ties resolve to the earliest bucket.
pub fn primary_bucket(answers: &BTreeMap<u8, String>) -> TraitBucket {
    let tags: Vec<&str> = answers.values().map(String::as_str).collect();
    let mut best = TraitBucket::ALL[0];
    let mut best_count = best.count(&tags);
    for bucket in &TraitBucket::ALL[1..] {
        let c = bucket.count(&tags);
        if c > best_count {
            best = *bucket;
            best_count = c;
        }
    }
    best
}

pub fn score(answers: &BTreeMap<u8, String>) -> Result<&'static Profile, AssessmentError> {
    validate(answers)?;
    Ok(primary_bucket(answers).profile())
}
