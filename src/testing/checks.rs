//! Grouped assertions
//!
//! A step records every failed check and reports them together, so one run
//! shows all broken fields of a response instead of only the first.

use std::fmt::Debug;

use serde_json::Value;

use crate::api::ApiResponse;
use crate::common::{Error, Result};

/// Collector for the checks of one step
#[derive(Debug, Default)]
pub struct Checks {
    failures: Vec<String>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` unless `ok` holds; returns `ok`
    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> bool {
        if !ok {
            self.failures.push(message.into());
        }
        ok
    }

    /// Record a failure unconditionally
    pub fn fail(&mut self, message: impl Into<String>) {
        self.failures.push(message.into());
    }

    /// Equality check that reports both sides
    pub fn equal<T>(&mut self, actual: T, expected: T, message: &str) -> bool
    where
        T: PartialEq + Debug,
    {
        let ok = actual == expected;
        if !ok {
            self.failures.push(format!(
                "{} (expected {:?}, got {:?})",
                message, expected, actual
            ));
        }
        ok
    }

    /// Expect a 200 OK
    pub fn status_ok(&mut self, response: &ApiResponse) -> bool {
        let ok = response.is_ok();
        if !ok {
            self.failures.push(format!(
                "Expected status code OK (200), got {}",
                response.status
            ));
        }
        ok
    }

    /// Expect a non-empty body
    pub fn not_empty(&mut self, response: &ApiResponse) -> bool {
        self.check(!response.is_empty(), "Response content should not be empty")
    }

    /// Expect a JSON array body with at least one element
    pub fn non_empty_array(&mut self, response: &ApiResponse, what: &str) -> Option<Vec<Value>> {
        match response.json() {
            Ok(Value::Array(items)) => {
                self.check(
                    !items.is_empty(),
                    format!("Expected at least one {} in the response", what),
                );
                Some(items)
            }
            Ok(_) => {
                self.fail("Expected response content to be a JSON array");
                None
            }
            Err(e) => {
                self.fail(e.to_string());
                None
            }
        }
    }

    /// Expect a JSON object body
    pub fn object(&mut self, response: &ApiResponse) -> Option<Value> {
        match response.json() {
            Ok(value @ Value::Object(_)) => Some(value),
            Ok(_) => {
                self.fail("Expected response content to be a JSON object");
                None
            }
            Err(e) => {
                self.fail(e.to_string());
                None
            }
        }
    }

    /// Expect `field` to be present with a non-empty textual form
    pub fn field_present(&mut self, value: &Value, field: &str, message: &str) -> bool {
        let ok = field_text(value, field).is_some_and(|s| !s.is_empty());
        self.check(ok, message)
    }

    /// Expect string `field` to equal `expected`
    pub fn field_eq(&mut self, value: &Value, field: &str, expected: &str, message: &str) -> bool {
        self.equal(field_text(value, field).as_deref(), Some(expected), message)
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Close the step: `Ok` if nothing failed
    pub fn finish(self) -> Result<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Assertion(self.failures))
        }
    }
}

/// Fail fast unless the response is 200 OK
pub fn ensure_ok(response: &ApiResponse) -> Result<()> {
    let mut checks = Checks::new();
    checks.status_ok(response);
    checks.finish()
}

/// Textual form of a JSON field: strings as-is, other values serialized,
/// missing or null as `None`
pub fn field_text(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
