//! Parameter normalizer - maps free text onto an engineering parameter
//!
//! Scoring is plain keyword counting: a parameter scores one point for each
//! of its keywords that appears (case-insensitively) as a substring of the
//! input. There is no stemming, tokenizing or language model behind it.
//!
//! # Tie-break
//!
//! Parameters are scanned in knowledge-base load order. The first parameter
//! to reach the highest score keeps the match, so a later parameter with an
//! equal score never displaces it. Candidates are sorted with a stable sort,
//! which keeps load order among equal scores.

use serde::Serialize;
use tracing::debug;

use crate::{EngineeringParameter, KnowledgeBase};

/// How many candidates the trace lists
const TRACE_CANDIDATES: usize = 3;

/// A parameter that matched at least one keyword
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub parameter: EngineeringParameter,
    pub score: usize,
    /// Keywords as written in the knowledge base, in keyword-list order
    pub matched_keywords: Vec<String>,
}

/// Outcome of normalizing one piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalization {
    #[serde(rename = "match")]
    pub matched: Option<EngineeringParameter>,
    /// All candidates, highest score first
    pub candidates: Vec<Candidate>,
    /// User-facing reasoning, in order
    pub trace: Vec<String>,
}

/// Normalize free text to the best-scoring parameter
pub fn normalize(kb: &KnowledgeBase, text: &str) -> Normalization {
    let text = text.to_lowercase();
    let mut trace = vec![format!("Analyzing input: '{}'", text)];

    let mut candidates = Vec::new();
    let mut best: Option<usize> = None;
    let mut max_score = 0;

    for param in kb.parameters() {
        let matched_keywords: Vec<String> = param
            .keywords
            .iter()
            .filter(|kw| !kw.is_empty() && text.contains(&kw.to_lowercase()))
            .cloned()
            .collect();
        let score = matched_keywords.len();
        if score == 0 {
            continue;
        }
        if score > max_score {
            max_score = score;
            best = Some(candidates.len());
        }
        candidates.push(Candidate {
            parameter: param.clone(),
            score,
            matched_keywords,
        });
    }

    let matched = best.map(|i| candidates[i].parameter.clone());

    // stable: equal scores keep load order
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    if candidates.is_empty() {
        trace.push("No keywords matched.".to_string());
    } else {
        trace.push(format!("Found {} potential candidates.", candidates.len()));
        for c in candidates.iter().take(TRACE_CANDIDATES) {
            trace.push(format!(
                " - Candidate [{}] '{}': Score {} (Keywords: {})",
                c.parameter.id,
                c.parameter.name,
                c.score,
                c.matched_keywords.join(", ")
            ));
        }
    }

    if let Some(ref param) = matched {
        trace.push(format!("Primary match selected: ID {}", param.id));
    }

    debug!(
        input = %text,
        candidates = candidates.len(),
        matched = ?matched.as_ref().map(|p| p.id),
        "normalized input"
    );

    Normalization {
        matched,
        candidates,
        trace,
    }
}
