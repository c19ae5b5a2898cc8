//! Abstention gate.

use crate::rag::types::{Decision, EvidenceSet};

/// Decide whether the evidence is strong enough to answer.
///
/// Only the best (first) item is consulted. A best score equal to the
/// threshold answers. A NaN score never clears the threshold.
pub fn decide(evidence: &EvidenceSet, min_relevance_score: f32) -> Decision {
    let Some(best) = evidence.best() else {
        return Decision::abstain(
            "I don't have enough information to answer: no evidence retrieved from the knowledge base."
                .to_string(),
        );
    };

    if best.score >= min_relevance_score {
        return Decision::answer();
    }

    Decision::abstain(format!(
        "I don't have enough information to answer confidently. The most relevant document \
         has a similarity score of {:.3}, which is below the minimum threshold of {:.3}. \
         Try rephrasing the question or adding documentation on this topic.",
        best.score, min_relevance_score
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::types::EvidenceItem;

    fn set(scores: &[f32]) -> EvidenceSet {
        EvidenceSet::from_items(
            scores
                .iter()
                .enumerate()
                .map(|(i, s)| EvidenceItem::new("c", "d.md", format!("d.md_chunk_{}", i), *s))
                .collect(),
        )
    }

    #[test]
    fn test_empty_abstains() {
        let decision = decide(&EvidenceSet::empty(), 0.0);
        assert!(decision.should_abstain);
        assert!(decision.abstain_reason.unwrap().contains("no evidence retrieved"));
    }

    #[test]
    fn test_below_threshold_reports_scores() {
        let decision = decide(&set(&[0.3]), 0.5);
        assert!(decision.should_abstain);

        let reason = decision.abstain_reason.unwrap();
        assert!(reason.contains("0.300"));
        assert!(reason.contains("0.500"));
    }

    #[test]
    fn test_equality_answers() {
        let decision = decide(&set(&[0.5]), 0.5);
        assert!(!decision.should_abstain);
        assert!(decision.abstain_reason.is_none());
    }

    #[test]
    fn test_only_best_consulted() {
        assert!(!decide(&set(&[0.9, 0.1, 0.0]), 0.5).should_abstain);
        assert!(decide(&set(&[0.49, 0.49]), 0.5).should_abstain);
    }

    #[test]
    fn test_nan_abstains() {
        assert!(decide(&set(&[f32::NAN]), 0.5).should_abstain);
    }

    #[test]
    fn test_idempotent() {
        let evidence = set(&[0.42, 0.1]);
        assert_eq!(decide(&evidence, 0.5), decide(&evidence, 0.5));
    }
}
