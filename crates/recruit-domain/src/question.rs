use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A single prompt in an assistant flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            required: false,
            placeholder: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Ordered, immutable question definition loaded once per assistant.
///
/// Construction guarantees at least one question and unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    questions: Vec<Question>,
}

#[derive(Deserialize)]
struct RawQuestionSet {
    #[serde(default)]
    title: Option<String>,
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(title: Option<String>, questions: Vec<Question>) -> Result<Self, DomainError> {
        if questions.is_empty() {
            return Err(DomainError::InvalidQuestionSet(
                "at least one question is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for question in &questions {
            if question.id.trim().is_empty() {
                return Err(DomainError::InvalidQuestionSet(format!(
                    "question `{}` has an empty id",
                    question.text
                )));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(DomainError::InvalidQuestionSet(format!(
                    "duplicate question id `{}`",
                    question.id
                )));
            }
        }
        Ok(Self { title, questions })
    }

    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let raw: RawQuestionSet = serde_json::from_str(text)?;
        Self::new(raw.title, raw.questions)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_document_with_optional_fields() {
        let set = QuestionSet::from_json(
            r#"{
                "title": "地域の特徴づくり",
                "questions": [
                    {"id": "nature", "text": "自然の魅力は？", "required": true, "placeholder": "例: 山並み"},
                    {"id": "food", "text": "名物は？"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(set.title(), Some("地域の特徴づくり"));
        assert_eq!(set.len(), 2);
        assert!(set.questions()[0].required);
        assert_eq!(set.questions()[0].placeholder.as_deref(), Some("例: 山並み"));
        assert!(!set.questions()[1].required);
        assert_eq!(set.last_index(), 1);
    }

    #[test]
    fn rejects_empty_and_duplicate_sets() {
        assert!(matches!(
            QuestionSet::from_json(r#"{"questions": []}"#),
            Err(DomainError::InvalidQuestionSet(_))
        ));
        assert!(matches!(
            QuestionSet::new(
                None,
                vec![Question::new("a", "one"), Question::new("a", "two")]
            ),
            Err(DomainError::InvalidQuestionSet(_))
        ));
        assert!(matches!(
            QuestionSet::from_json(r#"{"title": "missing questions"}"#),
            Err(DomainError::Serde(_))
        ));
    }
}
