//! Template interpolation of user-entered option values
//!
//! Option values may embed variable tokens such as `$(custom:speaker)`. The
//! dispatcher resolves every templated value through an [`Interpolator`]
//! before validating it.

use async_trait::async_trait;
use std::collections::HashMap;

/// Resolves template tokens in user-entered text
#[async_trait]
pub trait Interpolator: Send + Sync {
    async fn interpolate(&self, raw: &str) -> String;
}

/// In-memory variable table resolving `$(namespace:name)` tokens.
///
/// Unknown tokens and unterminated `$(` sequences are left verbatim.
#[derive(Debug, Default, Clone)]
pub struct VariableTable {
    values: HashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, keyed as `namespace:name`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parse a `namespace:name=value` assignment
    pub fn parse_assignment(assignment: &str) -> Option<(String, String)> {
        let (key, value) = assignment.split_once('=')?;
        let key = key.trim();
        if key.is_empty() || !key.contains(':') {
            return None;
        }
        Some((key.to_string(), value.to_string()))
    }

    /// Replace every known token in `raw`
    pub fn resolve(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(start) = rest.find("$(") {
            out.push_str(&rest[..start]);
            let token = &rest[start + 2..];
            match token.find(')') {
                Some(end) => {
                    let key = &token[..end];
                    match self.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("$(");
                            out.push_str(key);
                            out.push(')');
                        }
                    }
                    rest = &token[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[async_trait]
impl Interpolator for VariableTable {
    async fn interpolate(&self, raw: &str) -> String {
        self.resolve(raw)
    }
}
