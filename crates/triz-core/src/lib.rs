//! TRIZ Core - contradiction matrix engine
//!
//! Given a parameter to improve and a parameter that worsens as a side
//! effect, the engine suggests inventive principles and records a
//! human-readable trace of how it got there.
//!
//! # Architecture
//!
//! ```text
//! data/*.json → KnowledgeBase (immutable)
//!                    ↓
//! free text → Normalizer → EngineeringParameter
//!                    ↓
//!            Resolver → SolutionReport { principles, strategy, trace }
//!
//! factors → Ideality → benefit / (cost + harm)
//! ```
//!
//! # Guarantees
//!
//! - **Degradable**: a missing or malformed resource loads as empty
//! - **Deterministic**: same knowledge base + same query = same report
//! - **Read-only**: nothing mutates the knowledge base after load

pub mod error;
pub mod ideality;
pub mod knowledge;
pub mod normalizer;
pub mod resolver;

pub use error::{Error, Result, Role};
pub use ideality::{calculate_ideality, IDEAL_SENTINEL};
pub use knowledge::{KnowledgeBase, Stats};
pub use normalizer::{normalize, Candidate, Normalization};
pub use resolver::{solve, solve_text, SolutionReport, Strategy};

use serde::{Deserialize, Serialize};

/// Version of the engine crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// An engineering parameter of the contradiction matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeringParameter {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Matched case-insensitively as substrings of user text
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// One of the inventive principles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventivePrinciple {
    pub id: u32,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A named, weighted benefit, cost or harm (weights are nominally 1-10)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealityFactor {
    pub name: String,
    pub weight: f64,
}
