//! Knowledge base loader - parameters, principles and the contradiction matrix
//!
//! The three resources live side by side in one directory:
//!
//! | file              | shape                                          |
//! |-------------------|------------------------------------------------|
//! | `parameters.json` | `[{id, name, description?, keywords}]`         |
//! | `principles.json` | `[{id, name, description, examples}]`          |
//! | `matrix.json`     | `{"<improving>,<worsening>": [principle ids]}` |
//!
//! # Fault tolerance
//!
//! Each resource loads independently. A missing file or a top-level value of
//! the wrong shape leaves that resource empty; a bad record or matrix cell is
//! skipped, as is a single bad principle id inside an otherwise valid matrix
//! cell. All of these are logged as warnings and never abort the load, so the
//! engine stays queryable in a degraded state. Empty keywords are kept but
//! reported, since they can never match.
//!
//! Referential integrity between the matrix and the other two resources is
//! not checked. The resolver tolerates dangling principle ids.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::{EngineeringParameter, Error, InventivePrinciple, Result};

pub const PARAMETERS_FILE: &str = "parameters.json";
pub const PRINCIPLES_FILE: &str = "principles.json";
pub const MATRIX_FILE: &str = "matrix.json";

/// Sparse contradiction matrix keyed by (improving, worsening)
pub type Matrix = BTreeMap<(u32, u32), Vec<u32>>;

// ── Knowledge Base ────────────────────────────────────────

/// Immutable in-memory knowledge base.
///
/// Records keep the order they were loaded in; that order is the
/// normalizer's iteration order and therefore its tie-break.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    parameters: Vec<EngineeringParameter>,
    parameter_index: HashMap<u32, usize>,
    principles: Vec<InventivePrinciple>,
    principle_index: HashMap<u32, usize>,
    matrix: Matrix,
}

/// Record counts of a loaded knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub parameters: usize,
    pub principles: usize,
    pub matrix_cells: usize,
}

impl KnowledgeBase {
    /// Load the three resources from `dir`.
    ///
    /// Never fails: each resource that cannot be read or decoded is logged
    /// and left empty.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();

        let parameters: Vec<EngineeringParameter> =
            load_records(&dir.join(PARAMETERS_FILE), "parameters")
                .unwrap_or_else(|e| degraded(e, Vec::new()));
        let principles: Vec<InventivePrinciple> =
            load_records(&dir.join(PRINCIPLES_FILE), "principles")
                .unwrap_or_else(|e| degraded(e, Vec::new()));
        let matrix =
            load_matrix(&dir.join(MATRIX_FILE)).unwrap_or_else(|e| degraded(e, Matrix::new()));

        let kb = Self::from_parts(parameters, principles, matrix);
        let stats = kb.stats();
        info!(
            dir = %dir.display(),
            parameters = stats.parameters,
            principles = stats.principles,
            matrix_cells = stats.matrix_cells,
            "knowledge base loaded"
        );
        kb
    }

    /// Build a knowledge base from already-decoded values.
    ///
    /// Applies the same validation as [`KnowledgeBase::load`]: id 0 is
    /// dropped, a repeated id replaces the earlier record's content but keeps
    /// its position, and self-pair matrix keys are dropped.
    pub fn from_parts(
        parameters: Vec<EngineeringParameter>,
        principles: Vec<InventivePrinciple>,
        mut matrix: Matrix,
    ) -> Self {
        let (parameters, parameter_index) = index_records(parameters);
        for id in parameters_with_empty_keywords(&parameters) {
            warn!(parameter = id, "parameter has an empty keyword, it will never match");
        }
        let (principles, principle_index) = index_records(principles);

        matrix.retain(|&(improving, worsening), _| {
            if improving == worsening {
                warn!(improving, worsening, "ignoring self-pair matrix cell");
                false
            } else {
                true
            }
        });

        KnowledgeBase {
            parameters,
            parameter_index,
            principles,
            principle_index,
            matrix,
        }
    }

    pub fn parameter(&self, id: u32) -> Option<&EngineeringParameter> {
        self.parameter_index.get(&id).map(|&i| &self.parameters[i])
    }

    pub fn principle(&self, id: u32) -> Option<&InventivePrinciple> {
        self.principle_index.get(&id).map(|&i| &self.principles[i])
    }

    /// Principle ids for a matrix cell, empty when the cell is absent
    pub fn principle_ids_for_pair(&self, improving: u32, worsening: u32) -> &[u32] {
        self.matrix_entry(improving, worsening).unwrap_or(&[])
    }

    /// The raw matrix cell; `None` means no entry, as opposed to an empty list
    pub fn matrix_entry(&self, improving: u32, worsening: u32) -> Option<&[u32]> {
        self.matrix
            .get(&(improving, worsening))
            .map(|ids| ids.as_slice())
    }

    /// Parameters in load order
    pub fn parameters(&self) -> &[EngineeringParameter] {
        &self.parameters
    }

    /// Principles in load order
    pub fn principles(&self) -> &[InventivePrinciple] {
        &self.principles
    }

    pub fn stats(&self) -> Stats {
        Stats {
            parameters: self.parameters.len(),
            principles: self.principles.len(),
            matrix_cells: self.matrix.len(),
        }
    }

    /// SHA-256 (hex) over a canonical serialization of the loaded content.
    ///
    /// Record order is part of the fingerprint since it decides tie-breaks.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_text().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn canonical_text(&self) -> String {
        const SEP: &str = "\u{1f}";
        let mut out = String::new();
        for p in &self.parameters {
            out.push_str(&format!(
                "P{SEP}{}{SEP}{}{SEP}{}{SEP}{}\n",
                p.id,
                p.name,
                p.description.as_deref().unwrap_or(""),
                p.keywords.join(SEP),
            ));
        }
        for p in &self.principles {
            out.push_str(&format!(
                "I{SEP}{}{SEP}{}{SEP}{}{SEP}{}\n",
                p.id,
                p.name,
                p.description,
                p.examples.join(SEP),
            ));
        }
        for ((improving, worsening), ids) in &self.matrix {
            let ids: Vec<String> = ids.iter().map(u32::to_string).collect();
            out.push_str(&format!(
                "M{SEP}{improving},{worsening}{SEP}{}\n",
                ids.join(",")
            ));
        }
        out
    }
}

// ── Record indexing ───────────────────────────────────────

trait Keyed {
    const KIND: &'static str;
    fn key(&self) -> u32;
}

impl Keyed for EngineeringParameter {
    const KIND: &'static str = "parameter";
    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for InventivePrinciple {
    const KIND: &'static str = "principle";
    fn key(&self) -> u32 {
        self.id
    }
}

fn index_records<T: Keyed>(records: Vec<T>) -> (Vec<T>, HashMap<u32, usize>) {
    let mut kept = Vec::with_capacity(records.len());
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        let id = record.key();
        if id == 0 {
            warn!(kind = T::KIND, "skipping record with id 0");
            continue;
        }
        match index.get(&id).copied() {
            Some(position) => {
                warn!(kind = T::KIND, id, "duplicate id, later record replaces earlier one");
                kept[position] = record;
            }
            None => {
                index.insert(id, kept.len());
                kept.push(record);
            }
        }
    }
    (kept, index)
}

/// Ids of parameters carrying an empty keyword
pub fn parameters_with_empty_keywords(parameters: &[EngineeringParameter]) -> Vec<u32> {
    parameters
        .iter()
        .filter(|p| p.keywords.iter().any(|kw| kw.is_empty()))
        .map(|p| p.id)
        .collect()
}

// ── File decoding ─────────────────────────────────────────

/// Log a resource load failure and fall back to an empty resource
fn degraded<T>(err: Error, empty: T) -> T {
    warn!(error = %err, "knowledge base resource unavailable, continuing without it");
    empty
}

fn read_json(path: &Path, resource: &'static str) -> Result<serde_json::Value> {
    let load_error = |message: String| Error::LoadError {
        resource,
        path: path.display().to_string(),
        message,
    };
    let text = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| load_error(e.to_string()))
}

/// Decode a JSON array of records, skipping the ones that do not decode
fn load_records<T: DeserializeOwned>(path: &Path, resource: &'static str) -> Result<Vec<T>> {
    let items = match read_json(path, resource)? {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(Error::LoadError {
                resource,
                path: path.display().to_string(),
                message: format!("expected a JSON array, found {}", json_kind(&other)),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!(resource, position, error = %e, "skipping malformed record"),
        }
    }
    Ok(records)
}

fn load_matrix(path: &Path) -> Result<Matrix> {
    let cells = match read_json(path, "matrix")? {
        serde_json::Value::Object(cells) => cells,
        other => {
            return Err(Error::LoadError {
                resource: "matrix",
                path: path.display().to_string(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            })
        }
    };

    let mut matrix = Matrix::new();
    for (key, value) in cells {
        let Some(pair) = parse_matrix_key(&key) else {
            warn!(key = %key, "skipping matrix cell with malformed key");
            continue;
        };
        let items = match value {
            serde_json::Value::Array(items) => items,
            other => {
                warn!(
                    key = %key,
                    found = json_kind(&other),
                    "skipping matrix cell with malformed value"
                );
                continue;
            }
        };
        let ids = items
            .into_iter()
            .filter_map(|item| {
                let id = principle_id(&item);
                if id.is_none() {
                    warn!(key = %key, value = %item, "skipping malformed principle id in matrix cell");
                }
                id
            })
            .collect();
        matrix.insert(pair, ids);
    }
    Ok(matrix)
}

fn principle_id(value: &serde_json::Value) -> Option<u32> {
    value.as_u64().and_then(|id| u32::try_from(id).ok())
}

/// Parse a `"<improving>,<worsening>"` matrix key
pub fn parse_matrix_key(key: &str) -> Option<(u32, u32)> {
    let (improving, worsening) = key.split_once(',')?;
    let improving = improving.trim().parse().ok()?;
    let worsening = worsening.trim().parse().ok()?;
    Some((improving, worsening))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
