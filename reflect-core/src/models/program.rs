use serde::{Deserialize, Serialize};

/// The two coaching programs a completed dialogue can recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    /// New Personal Leadership, for emerging leaders.
    #[serde(rename = "NPL")]
    Npl,
    /// Leadership in Residence, for experienced leaders.
    #[serde(rename = "LIR")]
    Lir,
}

impl Program {
    pub const ALL: [Program; 2] = [Program::Npl, Program::Lir];

    pub fn code(&self) -> &'static str {
        match self {
            Program::Npl => "NPL",
            Program::Lir => "LIR",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Program::Npl => "New Personal Leadership",
            Program::Lir => "Leadership in Residence",
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} ({})", self.title(), self.code())
    }

    pub fn description(&self) -> &'static str {
        match self {
            Program::Npl => "A foundational program for emerging leaders who want to build self-awareness, clarify their values, and develop a personal leadership philosophy. Through guided reflection and practical exercises, you'll discover your unique approach to leadership.",
            Program::Lir => "An immersive experience for established leaders seeking deeper transformation. This residency combines intensive self-inquiry, peer learning, and one-on-one mentorship to help you evolve your leadership practice and navigate complex challenges.",
        }
    }

    pub fn duration(&self) -> &'static str {
        match self {
            Program::Npl => "8 weeks",
            Program::Lir => "6 months",
        }
    }

    pub fn format(&self) -> &'static str {
        match self {
            Program::Npl => "Cohort-based",
            Program::Lir => "Hybrid",
        }
    }

    /// Recommendation paragraph used by the offline report.
    pub fn recommendation(&self) -> &'static str {
        match self {
            Program::Npl => "This program is designed for those who want to explore the foundations of their leadership journey, clarify their values, and develop their personal leadership approach. I recommend this program to deepen your self-awareness and build a solid foundation for your leadership practice.",
            Program::Lir => "This program is designed for leaders with experience who want to deepen their practice. I recommend it for rediscovering your current experience, refining your leadership approach, and gaining new perspectives.",
        }
    }

    /// Label a generated report. Only an explicit mention of the residency
    /// selects LIR; everything else is NPL.
    pub fn from_report_text(report: &str) -> Self {
        if report.contains(Program::Lir.title()) {
            Program::Lir
        } else {
            Program::Npl
        }
    }

    pub fn catalog_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "title": self.title(),
            "description": self.description(),
            "duration": self.duration(),
            "format": self.format(),
        })
    }
}
