//! Contradiction resolver - matrix lookup with two fallback strategies
//!
//! # Decision order
//!
//! 1. Both ids must name known parameters, otherwise `InvalidInput`.
//! 2. `improving == worsening` is a physical contradiction: the answer is
//!    the two fixed separation principles and the matrix is never read.
//! 3. Otherwise the matrix cell `(improving, worsening)` is read. An absent
//!    or empty cell falls back to [`FALLBACK_PRINCIPLES`].
//! 4. Principle ids are resolved in order; ids missing from the knowledge
//!    base are dropped with a warning in the trace.
//!
//! Every step appends to the report's execution log, which is shown to the
//! user as-is.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::normalizer::normalize;
use crate::{EngineeringParameter, Error, InventivePrinciple, KnowledgeBase, Result, Role};

/// Generally applicable principles used when the matrix has no answer
pub const FALLBACK_PRINCIPLES: [u32; 4] = [35, 10, 1, 28];

/// Reserved id of the synthetic "Separation in Time" principle
pub const SEPARATION_IN_TIME_ID: u32 = 999;

/// Reserved id of the synthetic "Separation in Space" principle
pub const SEPARATION_IN_SPACE_ID: u32 = 998;

// ── Strategy ──────────────────────────────────────────────

/// How the suggested principles were chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Same parameter on both sides; separation principles
    PhysicalContradiction,
    /// Empty matrix cell; general-purpose principles
    HeuristicFallback,
    /// Principles straight from the matrix cell
    StandardMatrix,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::PhysicalContradiction => "PHYSICAL CONTRADICTION",
            Strategy::HeuristicFallback => "Heuristic Fallback",
            Strategy::StandardMatrix => "Standard Matrix Solution",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ── Solution Report ───────────────────────────────────────

/// Result of resolving one contradiction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionReport {
    pub improving_parameter: EngineeringParameter,
    pub worsening_parameter: EngineeringParameter,
    pub suggested_principles: Vec<InventivePrinciple>,
    pub strategy: Strategy,
    /// Human-readable trace, in the order steps ran
    pub execution_log: Vec<String>,
}

/// The two separation principles answering a physical contradiction.
///
/// These are not part of the knowledge base; their ids are reserved.
pub fn separation_principles() -> Vec<InventivePrinciple> {
    vec![
        InventivePrinciple {
            id: SEPARATION_IN_TIME_ID,
            name: "Separation in Time".into(),
            description: "Separate conflicting properties in time.".into(),
            examples: vec!["Traffic lights separate flow".into()],
        },
        InventivePrinciple {
            id: SEPARATION_IN_SPACE_ID,
            name: "Separation in Space".into(),
            description: "Separate conflicting properties in space.".into(),
            examples: vec!["Bicycle path vs car lane".into()],
        },
    ]
}

// ── Resolution ────────────────────────────────────────────

/// Resolve the contradiction between two parameter ids
///
/// # Errors
/// Returns `InvalidInput` if either id is not a known parameter.
pub fn solve(kb: &KnowledgeBase, improving_id: u32, worsening_id: u32) -> Result<SolutionReport> {
    let mut log = vec!["Initiating TRIZ Logic Block: Matrix Lookup".to_string()];

    let improving = kb.parameter(improving_id).ok_or(Error::InvalidInput {
        role: Role::Improving,
        id: improving_id,
    })?;
    let worsening = kb.parameter(worsening_id).ok_or(Error::InvalidInput {
        role: Role::Worsening,
        id: worsening_id,
    })?;

    log.push(format!("Improving Parameter: [{}] {}", improving_id, improving.name));
    log.push(format!("Worsening Parameter: [{}] {}", worsening_id, worsening.name));

    if improving_id == worsening_id {
        log.push("!! PHYSICAL CONTRADICTION DETECTED !! (A vs A)".to_string());
        log.push("Switching logic to SEPARATION PRINCIPLES.".to_string());
        debug!(parameter = improving_id, "physical contradiction");
        return Ok(SolutionReport {
            improving_parameter: improving.clone(),
            worsening_parameter: worsening.clone(),
            suggested_principles: separation_principles(),
            strategy: Strategy::PhysicalContradiction,
            execution_log: log,
        });
    }

    log.push(format!(
        "Querying Matrix Cell [{}, {}]...",
        improving_id, worsening_id
    ));
    let cell = kb.principle_ids_for_pair(improving_id, worsening_id);

    let (ids, strategy): (&[u32], Strategy) = if cell.is_empty() {
        log.push("Matrix Cell is EMPTY (No classic recommendation).".to_string());
        log.push("Applying HEURISTIC FALLBACK (Top 4 general principles).".to_string());
        (&FALLBACK_PRINCIPLES[..], Strategy::HeuristicFallback)
    } else {
        log.push(format!("Matrix Match Found! Principles: {}", join_ids(cell)));
        (cell, Strategy::StandardMatrix)
    };

    let mut suggested = Vec::with_capacity(ids.len());
    for &id in ids {
        match kb.principle(id) {
            Some(principle) => suggested.push(principle.clone()),
            None => log.push(format!("Warning: Principle ID {} not found in database.", id)),
        }
    }

    debug!(
        improving = improving_id,
        worsening = worsening_id,
        strategy = %strategy,
        principles = suggested.len(),
        "resolved contradiction"
    );

    Ok(SolutionReport {
        improving_parameter: improving.clone(),
        worsening_parameter: worsening.clone(),
        suggested_principles: suggested,
        strategy,
        execution_log: log,
    })
}

/// Normalize both texts, then resolve the contradiction between the matches.
///
/// The report's execution log starts with both normalization traces.
///
/// # Errors
/// Returns `NoMatch` if either text matches no parameter.
pub fn solve_text(
    kb: &KnowledgeBase,
    improving_text: &str,
    worsening_text: &str,
) -> Result<SolutionReport> {
    let improving = normalize(kb, improving_text);
    let improving_id = match improving.matched {
        Some(ref p) => p.id,
        None => {
            return Err(Error::NoMatch {
                role: Role::Improving,
                text: improving_text.to_string(),
            })
        }
    };
    let worsening = normalize(kb, worsening_text);
    let worsening_id = match worsening.matched {
        Some(ref p) => p.id,
        None => {
            return Err(Error::NoMatch {
                role: Role::Worsening,
                text: worsening_text.to_string(),
            })
        }
    };

    let mut report = solve(kb, improving_id, worsening_id)?;
    let mut log = improving.trace;
    log.extend(worsening.trace);
    log.append(&mut report.execution_log);
    report.execution_log = log;
    Ok(report)
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
