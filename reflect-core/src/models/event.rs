use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Program;
use crate::error::ReflectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "conversation_started")]
    Started,
    #[serde(rename = "conversation_completed")]
    Completed,
    #[serde(rename = "conversation_abandoned")]
    Abandoned,
}

/// Anonymized dialogue lifecycle record. The session id is generated by the
/// client and carries no personal data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event: EventKind,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<Program>,
}

impl AnalyticsEvent {
    pub fn new(event: EventKind, session_id: impl Into<String>) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
            session_id: session_id.into(),
            program: None,
        }
    }

    pub fn with_program(mut self, program: Program) -> Self {
        self.program = Some(program);
        self
    }

    /// Reject records that cannot be attributed to a session.
    pub fn validate(&self) -> Result<(), ReflectError> {
        if self.session_id.trim().is_empty() {
            return Err(ReflectError::invalid("sessionId must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_conversations: u64,
    pub completed_conversations: u64,
    pub abandoned_conversations: u64,
    pub npl_recommendations: u64,
    pub lir_recommendations: u64,
}

impl AnalyticsSummary {
    /// Full recount over every event; nothing is cached between reads.
    pub fn from_events(events: &[AnalyticsEvent]) -> Self {
        let mut summary = Self::default();
        for e in events {
            match e.event {
                EventKind::Started => summary.total_conversations += 1,
                EventKind::Abandoned => summary.abandoned_conversations += 1,
                EventKind::Completed => {
                    summary.completed_conversations += 1;
                    match e.program {
                        Some(Program::Npl) => summary.npl_recommendations += 1,
                        Some(Program::Lir) => summary.lir_recommendations += 1,
                        None => {}
                    }
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::json!({
            "event": "conversation_completed",
            "timestamp": "2025-03-01T10:00:00.000Z",
            "sessionId": "session_1740823200_abc123",
            "program": "LIR"
        });
        let event: AnalyticsEvent = serde_json::from_value(json).unwrap();
        assert_eq!(event.event, EventKind::Completed);
        assert_eq!(event.session_id, "session_1740823200_abc123");
        assert_eq!(event.program, Some(Program::Lir));
    }

    #[test]
    fn test_program_omitted_when_absent() {
        let event = AnalyticsEvent::new(EventKind::Started, "s1");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "conversation_started");
        assert_eq!(value["sessionId"], "s1");
        assert!(value.get("program").is_none());
    }

    #[test]
    fn test_summary_counts_program_only_on_completion() {
        let events = vec![
            AnalyticsEvent::new(EventKind::Started, "a"),
            AnalyticsEvent::new(EventKind::Completed, "a").with_program(Program::Npl),
            AnalyticsEvent::new(EventKind::Abandoned, "b").with_program(Program::Lir),
            AnalyticsEvent::new(EventKind::Completed, "c"),
        ];
        let summary = AnalyticsSummary::from_events(&events);
        assert_eq!(summary.total_conversations, 1);
        assert_eq!(summary.completed_conversations, 2);
        assert_eq!(summary.abandoned_conversations, 1);
        assert_eq!(summary.npl_recommendations, 1);
        assert_eq!(summary.lir_recommendations, 0);
    }

    #[test]
    fn test_summary_wire_names() {
        let value = serde_json::to_value(AnalyticsSummary::default()).unwrap();
        assert_eq!(value["totalConversations"], 0);
        assert_eq!(value["completedConversations"], 0);
        assert_eq!(value["abandonedConversations"], 0);
        assert_eq!(value["nplRecommendations"], 0);
        assert_eq!(value["lirRecommendations"], 0);
    }

    #[test]
    fn test_validate_requires_session_id() {
        assert!(AnalyticsEvent::new(EventKind::Started, "s1").validate().is_ok());
        let err = AnalyticsEvent::new(EventKind::Started, " \t").validate().unwrap_err();
        assert!(err.is_invalid_input());
    }
}
