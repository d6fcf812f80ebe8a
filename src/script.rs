//! Operation scripts for driving a [`LanaiTrie`] from a file.
//!
//! A script is a TOML document with an array of `step` tables:
//!
//! ```toml
//! [[step]]
//! op = "insert"
//! key = "port"
//! value = 8080
//!
//! [[step]]
//! op = "get"
//! key = "port"
//! type = "int"
//! expect = true
//! ```
//!
//! Values keep the TOML type they were written with (`int`, `float`, `bool`,
//! `string`), so a `get` naming a different type fails just as a typed read
//! would in code. `expect` is optional and turns a step into an assertion.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::data_structures::{LanaiTrie, LanaiTrieResult};
use crate::error::script::ScriptError;

/// A value as written in a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// The type a `get` step reads its value as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Int,
    Float,
    Bool,
    String,
}

/// One operation of a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Insert {
        key: String,
        value: ScriptValue,
        #[serde(default)]
        expect: Option<bool>,
    },
    Get {
        key: String,
        #[serde(rename = "type")]
        value_type: ValueType,
        #[serde(default)]
        expect: Option<bool>,
    },
    Remove {
        key: String,
        #[serde(default)]
        expect: Option<bool>,
    },
    Contains {
        key: String,
        #[serde(default)]
        expect: Option<bool>,
    },
}

impl Step {
    fn expect(&self) -> Option<bool> {
        match self {
            Step::Insert { expect, .. }
            | Step::Get { expect, .. }
            | Step::Remove { expect, .. }
            | Step::Contains { expect, .. } => *expect,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Insert { key, value, .. } => write!(f, "insert {key:?} = {value:?}"),
            Step::Get {
                key, value_type, ..
            } => write!(f, "get {key:?} as {value_type:?}"),
            Step::Remove { key, .. } => write!(f, "remove {key:?}"),
            Step::Contains { key, .. } => write!(f, "contains {key:?}"),
        }
    }
}

/// A parsed operation script.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    steps: Vec<Step>,
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(|e| ScriptError::ParseError(e.to_string()))
    }
}

impl Script {
    /// Reads and parses a script file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScriptError::FileNotFound(path.to_path_buf()));
        }
        std::fs::read_to_string(path)?.parse()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Executes every step against `trie` in order.
    pub fn run(&self, trie: &LanaiTrie) -> ScriptReport {
        let outcomes = self
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let outcome = execute(trie, index, step);
                match (outcome.expectation_met(), &outcome.detail) {
                    (false, detail) => warn!(
                        step = index,
                        op = %step,
                        succeeded = outcome.succeeded,
                        detail = detail.as_deref().unwrap_or(""),
                        "step did not meet expectation"
                    ),
                    (true, detail) => debug!(
                        step = index,
                        op = %step,
                        succeeded = outcome.succeeded,
                        detail = detail.as_deref().unwrap_or(""),
                        "step executed"
                    ),
                }
                outcome
            })
            .collect();

        let report = ScriptReport { outcomes };
        info!(
            steps = report.outcomes.len(),
            succeeded = report.succeeded(),
            unmet = report.unmet_expectations().count(),
            "script finished"
        );
        report
    }
}

/// The result of executing a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Zero-based position of the step in the script.
    pub index: usize,
    /// Whether the trie operation succeeded.
    pub succeeded: bool,
    /// The value read by a successful `get`, or the reason a step failed.
    pub detail: Option<String>,
    /// The outcome the script asked for, if any.
    pub expected: Option<bool>,
}

impl StepOutcome {
    /// `true` unless the step carried an expectation that was not met.
    pub fn expectation_met(&self) -> bool {
        self.expected.map_or(true, |expected| expected == self.succeeded)
    }
}

/// Outcomes of a whole script run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptReport {
    outcomes: Vec<StepOutcome>,
}

impl ScriptReport {
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    /// Number of steps whose operation succeeded.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn unmet_expectations(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| !o.expectation_met())
    }

    /// `true` if every expectation in the script was met.
    pub fn passed(&self) -> bool {
        self.unmet_expectations().next().is_none()
    }
}

fn execute(trie: &LanaiTrie, index: usize, step: &Step) -> StepOutcome {
    let result: LanaiTrieResult<Option<String>> = match step {
        Step::Insert { key, value, .. } => match value.clone() {
            ScriptValue::Bool(v) => trie.try_insert(key, v),
            ScriptValue::Int(v) => trie.try_insert(key, v),
            ScriptValue::Float(v) => trie.try_insert(key, v),
            ScriptValue::Text(v) => trie.try_insert(key, v),
        }
        .map(|()| None),
        Step::Get {
            key, value_type, ..
        } => match value_type {
            ValueType::Int => trie.try_get::<i64>(key).map(|v| v.to_string()),
            ValueType::Float => trie.try_get::<f64>(key).map(|v| v.to_string()),
            ValueType::Bool => trie.try_get::<bool>(key).map(|v| v.to_string()),
            ValueType::String => trie.try_get::<String>(key),
        }
        .map(Some),
        Step::Remove { key, .. } => trie.try_remove(key).map(|()| None),
        Step::Contains { key, .. } => {
            return StepOutcome {
                index,
                succeeded: trie.contains_key(key),
                detail: None,
                expected: step.expect(),
            }
        }
    };

    let (succeeded, detail) = match result {
        Ok(detail) => (true, detail),
        Err(e) => (false, Some(e.to_string())),
    };
    StepOutcome {
        index,
        succeeded,
        detail,
        expected: step.expect(),
    }
}
