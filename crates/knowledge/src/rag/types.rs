//! RAG workflow types.

use crate::index::score_order;
use serde::{Deserialize, Serialize};

/// Maximum excerpt length in characters.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Marker appended to excerpts that were cut.
pub const EXCERPT_ELLIPSIS: &str = "...";

/// One retrieved passage with its similarity score (higher is better).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    pub content: String,
    pub source: String,
    pub chunk_id: String,
    pub score: f32,
}

impl EvidenceItem {
    pub fn new(
        content: impl Into<String>,
        source: impl Into<String>,
        chunk_id: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            chunk_id: chunk_id.into(),
            score,
        }
    }
}

/// Evidence ordered by descending score. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceSet {
    items: Vec<EvidenceItem>,
}

impl EvidenceSet {
    /// Build a set, sorting by descending score.
    ///
    /// The sort is stable with ties broken by chunk id, so input that is
    /// already ordered comes out unchanged.
    pub fn from_items(mut items: Vec<EvidenceItem>) -> Self {
        items.sort_by(|a, b| {
            score_order(a.score, b.score).then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The highest-scoring item.
    pub fn best(&self) -> Option<&EvidenceItem> {
        self.items.first()
    }

    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvidenceItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a EvidenceSet {
    type Item = &'a EvidenceItem;
    type IntoIter = std::slice::Iter<'a, EvidenceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A source reference attached to a generated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub source: String,
    pub chunk_id: String,
    pub excerpt: String,
    pub score: f32,
}

impl From<&EvidenceItem> for Citation {
    fn from(item: &EvidenceItem) -> Self {
        Self {
            source: item.source.clone(),
            chunk_id: item.chunk_id.clone(),
            excerpt: excerpt(&item.content),
            score: item.score,
        }
    }
}

/// First 200 chars of `content`, with `...` appended only when cut.
pub fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &content[..cut], EXCERPT_ELLIPSIS),
        None => content.to_string(),
    }
}

/// Outcome of the abstention gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub should_abstain: bool,
    pub abstain_reason: Option<String>,
}

impl Decision {
    pub fn answer() -> Self {
        Self {
            should_abstain: false,
            abstain_reason: None,
        }
    }

    pub fn abstain(reason: String) -> Self {
        Self {
            should_abstain: true,
            abstain_reason: Some(reason),
        }
    }
}

/// Stages of one workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Start,
    Retrieving,
    Deciding,
    Abstained,
    Generating,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Retrieving => "retrieving",
            Stage::Deciding => "deciding",
            Stage::Abstained => "abstained",
            Stage::Generating => "generating",
            Stage::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one execution produced. Created at start, filled in as the
/// stages run, and returned once the machine reaches `Done`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub request_id: String,
    pub question: String,
    pub evidence: EvidenceSet,
    pub should_abstain: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abstain_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub citations: Vec<Citation>,
    pub model_abstained: bool,
    pub stage: Stage,
}

impl WorkflowState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            question: question.into(),
            evidence: EvidenceSet::empty(),
            should_abstain: false,
            abstain_reason: None,
            answer: None,
            citations: Vec::new(),
            model_abstained: false,
            stage: Stage::Start,
        }
    }

    /// The answer text, or an empty string before the machine finished.
    pub fn answer_text(&self) -> &str {
        self.answer.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_sorts_descending() {
        let set = EvidenceSet::from_items(vec![
            EvidenceItem::new("low", "a.md", "a_chunk_0", 0.2),
            EvidenceItem::new("high", "b.md", "b_chunk_0", 0.9),
            EvidenceItem::new("mid", "c.md", "c_chunk_0", 0.5),
        ]);

        let scores: Vec<f32> = set.iter().map(|i| i.score).collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.2]);
        assert_eq!(set.best().unwrap().content, "high");
    }

    #[test]
    fn test_from_items_ties_by_chunk_id() {
        let set = EvidenceSet::from_items(vec![
            EvidenceItem::new("", "x.md", "x_chunk_1", 0.7),
            EvidenceItem::new("", "x.md", "x_chunk_0", 0.7),
        ]);
        assert_eq!(set.items()[0].chunk_id, "x_chunk_0");
    }

    #[test]
    fn test_from_items_puts_nan_scores_last() {
        let items: Vec<EvidenceItem> = (0..40)
            .map(|i| {
                let score = if i % 3 == 0 { f32::NAN } else { i as f32 / 40.0 };
                EvidenceItem::new("", "n.md", format!("n_chunk_{:02}", i), score)
            })
            .collect();

        let set = EvidenceSet::from_items(items);
        assert_eq!(set.len(), 40);

        let real: Vec<f32> = set.iter().map(|i| i.score).take_while(|s| !s.is_nan()).collect();
        assert_eq!(real.len(), 26);
        assert!(real.windows(2).all(|w| w[0] >= w[1]));
        assert!(set.iter().skip(26).all(|i| i.score.is_nan()));
        assert_eq!(set.best().unwrap().chunk_id, "n_chunk_38");
    }

    #[test]
    fn test_excerpt_boundary() {
        let exact = "a".repeat(200);
        assert_eq!(excerpt(&exact), exact);

        let long = "a".repeat(201);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), 203);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..200], &long[..200]);
    }

    #[test]
    fn test_excerpt_multibyte() {
        let long = "ü".repeat(250);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), 203);
        assert!(cut.starts_with(&"ü".repeat(200)));
    }

    #[test]
    fn test_citation_from_evidence() {
        let item = EvidenceItem::new("short", "guide.md", "guide.md_chunk_2", 0.8);
        let citation = Citation::from(&item);

        assert_eq!(citation.source, "guide.md");
        assert_eq!(citation.chunk_id, "guide.md_chunk_2");
        assert_eq!(citation.excerpt, "short");
        assert_eq!(citation.score, 0.8);
    }

    #[test]
    fn test_citation_serializes_camel_case() {
        let citation = Citation::from(&EvidenceItem::new("c", "s.md", "s.md_chunk_0", 0.5));
        let json = serde_json::to_value(&citation).unwrap();
        assert_eq!(json["chunkId"], "s.md_chunk_0");
    }

    #[test]
    fn test_new_state() {
        let state = WorkflowState::new("What is it?");
        assert_eq!(state.stage, Stage::Start);
        assert!(state.citations.is_empty());
        assert!(uuid::Uuid::parse_str(&state.request_id).is_ok());
        assert_eq!(state.answer_text(), "");
    }
}
