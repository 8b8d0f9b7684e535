use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::catalog::{NON_NEGOTIABLES, WHY_US};

/// Answers keyed by question id.
///
/// Multiple-choice selections and the free-text responses share the same map, mirroring
/// the request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

/// `null` values are dropped on the way in, so they read as skipped like empty strings.
impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(question_id, value)| value.map(|value| (question_id, value)))
            .collect())
    }
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(question_id, value);
        self
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(question_id.into(), value.into());
    }

    /// Selected value for a question, treating empty strings as skipped.
    pub fn selection(&self, question_id: &str) -> Option<&str> {
        self.0
            .get(question_id)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn is_selected(&self, question_id: &str, option_id: &str) -> bool {
        self.selection(question_id) == Some(option_id)
    }

    pub fn why_us(&self) -> &str {
        self.free_text(WHY_US)
    }

    pub fn non_negotiables(&self) -> &str {
        self.free_text(NON_NEGOTIABLES)
    }

    fn free_text(&self, key: &str) -> &str {
        self.0.get(key).map(|value| value.trim()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Request body accepted by the scoring endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSubmission {
    #[serde(default)]
    pub name: Option<String>,
    pub answers: AnswerSet,
}
