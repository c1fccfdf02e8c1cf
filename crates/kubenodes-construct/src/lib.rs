//! # kubenodes-construct
//!
//! [`RuleEvaluator`] backed by minijinja, evaluating the Jinja expressions of
//! `compose`, `groups` and `keyed_groups` against a host's variables.
//!
//! Undefined variables are errors, so a rule that refers to a missing
//! variable fails instead of silently producing an empty value. Whether the
//! failure aborts the parse is decided by the caller's `strict` setting.
//!
//! Conditions use Jinja truthiness, as in `{% if cond %}`: any non-empty
//! string is true, including `"no"` and `"false"`.

#![deny(unsafe_code)]

use kubenodes_core::{RuleError, RuleEvaluator, Vars};
use minijinja::{Environment, UndefinedBehavior};
use serde_json::Value;
use tracing::trace;

/// Jinja expression evaluator.
pub struct JinjaEvaluator {
    env: Environment<'static>,
}

impl JinjaEvaluator {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    fn eval(&self, expression: &str, vars: &Vars) -> Result<minijinja::Value, RuleError> {
        let compiled = self
            .env
            .compile_expression(expression)
            .map_err(template_error)?;
        let value = compiled.eval(vars).map_err(template_error)?;
        if value.is_undefined() {
            return Err(RuleError::Template(format!("'{expression}' is undefined")));
        }
        trace!(expression, %value, "evaluated expression");
        Ok(value)
    }
}

impl Default for JinjaEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEvaluator for JinjaEvaluator {
    fn compose(&self, expression: &str, vars: &Vars) -> Result<Value, RuleError> {
        let value = self.eval(expression, vars)?;
        serde_json::to_value(&value).map_err(|e| RuleError::Template(e.to_string()))
    }

    fn evaluate_condition(&self, expression: &str, vars: &Vars) -> Result<bool, RuleError> {
        self.eval(expression, vars).map(|v| v.is_true())
    }
}

fn template_error(err: minijinja::Error) -> RuleError {
    RuleError::Template(err.to_string())
}
