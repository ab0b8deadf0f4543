//! Variable scope
//!
//! Assembles the variable tree offered for completion from an execution
//! context: the current node's input, workflow variables, and the outputs
//! of nodes that already ran.

use serde_json::{Map, Value};

use crate::dialect::Dialect;
use crate::error::{EngineError, EngineResult};

/// Key under which a node's primary output is nested
pub const MAIN_OUTPUT: &str = "main";

/// Key for workflow variables
pub const VARS_ROOT: &str = "$vars";

/// Runtime data a template field can reference
#[derive(Debug, Clone, PartialEq)]
pub struct VariableScope {
    /// Current node's input data
    pub input: Value,
    /// Workflow variables
    pub vars: Value,
    /// Raw outputs of executed nodes, by node id, in execution order
    pub node_results: Map<String, Value>,
}

impl Default for VariableScope {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableScope {
    /// Empty scope
    pub fn new() -> Self {
        Self {
            input: Value::Object(Map::new()),
            vars: Value::Object(Map::new()),
            node_results: Map::new(),
        }
    }

    /// Read a context object with optional `json`, `$vars` and `node_results` keys
    pub fn from_context(context: &Value) -> EngineResult<Self> {
        let map = context
            .as_object()
            .ok_or_else(|| EngineError::Schema("context must be a JSON object".to_string()))?;

        let mut scope = Self::new();
        if let Some(input) = map.get("json") {
            scope.input = input.clone();
        }
        if let Some(vars) = map.get(VARS_ROOT) {
            scope.vars = vars.clone();
        }
        match map.get("node_results") {
            Some(Value::Object(results)) => scope.node_results = results.clone(),
            Some(Value::Null) | None => {}
            Some(_) => {
                return Err(EngineError::Schema(
                    "node_results must be an object keyed by node id".to_string(),
                ))
            }
        }
        Ok(scope)
    }

    /// Parse a context from JSON text
    pub fn parse(content: &str) -> EngineResult<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| EngineError::Schema(e.to_string()))?;
        Self::from_context(&value)
    }

    /// Record the output of a node that just ran
    pub fn record_node_result(&mut self, node_id: impl Into<String>, output: Value) {
        self.node_results.insert(node_id.into(), output);
    }

    /// Output of a node, unwrapping `main` when present
    pub fn node_output(&self, node_id: &str) -> Option<&Value> {
        let result = self.node_results.get(node_id)?;
        match result {
            Value::Object(map) => Some(map.get(MAIN_OUTPUT).unwrap_or(result)),
            _ => Some(result),
        }
    }

    /// Build the variable tree for `dialect`
    ///
    /// `json` dialect: `{ "json": input, "$vars": vars }`.
    /// `dollar` dialect: `{ "$json": { <node id>: output, ... }, "$vars": vars }`.
    pub fn to_tree(&self, dialect: Dialect) -> Value {
        let root_value = match dialect {
            Dialect::Json => self.input.clone(),
            Dialect::Dollar => Value::Object(
                self.node_results
                    .keys()
                    .filter_map(|id| self.node_output(id).map(|v| (id.clone(), v.clone())))
                    .collect(),
            ),
        };

        let mut tree = Map::new();
        tree.insert(dialect.root().to_string(), root_value);
        tree.insert(VARS_ROOT.to_string(), self.vars.clone());
        Value::Object(tree)
    }
}
