use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Trimmed answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, String>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn record(&mut self, question_id: impl Into<String>, answer: impl Into<String>) {
        self.0.insert(question_id.into(), answer.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(id, answer)| (id.as_str(), answer.as_str()))
    }
}

/// Durable snapshot of an assistant session.
///
/// Stored as `{"answers": {...}, "currentQuestionIndex": n, "timestamp": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answers: AnswerMap,
    #[serde(default)]
    pub current_question_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PersistedSession {
    pub fn new(answers: AnswerMap, current_question_index: usize, at: DateTime<Utc>) -> Self {
        Self {
            answers,
            current_question_index,
            timestamp: Some(at),
        }
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(text)?)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<AnswerMap, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<AnswerMap>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn persisted_session_uses_camel_case_and_iso_timestamp() {
        let mut answers = AnswerMap::new();
        answers.record("nature", "山と川");
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 9, 30, 0).unwrap();
        let json = PersistedSession::new(answers.clone(), 2, at)
            .to_json()
            .unwrap();

        assert!(json.contains("\"currentQuestionIndex\":2"));
        assert!(json.contains("\"answers\":{\"nature\":\"山と川\"}"));
        assert!(json.contains("\"timestamp\":\"2025-04-01T09:30:00Z\""));

        let restored = PersistedSession::from_json(&json).unwrap();
        assert_eq!(restored.answers, answers);
        assert_eq!(restored.current_question_index, 2);
        assert_eq!(restored.timestamp, Some(at));
    }

    #[test]
    fn missing_members_fall_back_to_defaults() {
        let restored = PersistedSession::from_json("{}").unwrap();
        assert!(restored.answers.is_empty());
        assert_eq!(restored.current_question_index, 0);
        assert!(restored.timestamp.is_none());
    }

    #[test]
    fn null_answers_keep_the_saved_index() {
        let restored =
            PersistedSession::from_json(r#"{"answers":null,"currentQuestionIndex":2}"#).unwrap();
        assert!(restored.answers.is_empty());
        assert_eq!(restored.current_question_index, 2);
    }
}
