// src/answers.rs
// Shared answer store: the append-only list of formatted "question: answer"
// lines consumed by the page after the survey. Owned by app state and passed
// in explicitly wherever it is mutated.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub id: String,
    pub line: String,
    pub recorded_at: String,
}

#[derive(Debug, Default)]
pub struct AnswerStore {
    entries: Vec<AnswerEntry>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one formatted line. There is no update or removal; the page
    /// only ever appends, at most once per question.
    pub fn append(&mut self, question: &str, answer: &str) {
        let line = format!("{}: {}", question, answer.trim());
        tracing::info!("storing answer {}: {} chars", self.entries.len() + 1, line.len());
        self.entries.push(AnswerEntry {
            id: Uuid::new_v4().to_string(),
            line,
            recorded_at: Utc::now().to_rfc3339(),
        });
    }

    pub fn entries(&self) -> &[AnswerEntry] {
        &self.entries
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.line.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
