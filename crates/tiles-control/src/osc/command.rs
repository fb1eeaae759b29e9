//! Outgoing OSC command model
//!
//! A [`Command`] is an address under the `/tiles` namespace plus an ordered
//! list of [`TypedArgument`]s. Argument position is part of the protocol, so
//! arguments are only ever appended in the order an action declares them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::address::tiles_address;
use crate::{error::TilesError, Result};

/// A single OSC argument as understood by the tiles app
///
/// Serializes as `{"type": "s", "value": "Alice"}` / `{"type": "i", "value": 2}`.
/// Deserializing a mismatched pair (e.g. `{"type": "i", "value": "2"}`) fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TypedArgument {
    /// UTF-8 string (`s`)
    #[serde(rename = "s")]
    String(String),
    /// 32-bit signed integer (`i`)
    #[serde(rename = "i")]
    Int(i32),
}

/// Untyped value paired with an explicit type tag, see [`TypedArgument::tagged`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Number(i64),
}

impl TypedArgument {
    /// The single-character OSC type tag
    pub fn tag(&self) -> char {
        match self {
            TypedArgument::String(_) => 's',
            TypedArgument::Int(_) => 'i',
        }
    }

    /// Build an argument from an explicit type tag and value.
    ///
    /// The tag must agree with the value; nothing is coerced.
    pub fn tagged(tag: &str, value: RawValue) -> Result<Self> {
        match (tag, value) {
            ("s", RawValue::Text(s)) => Ok(TypedArgument::String(s)),
            ("i", RawValue::Number(n)) => i32::try_from(n).map(TypedArgument::Int).map_err(|_| {
                TilesError::InvalidArgument(format!("integer {} does not fit in 32 bits", n))
            }),
            ("s", value) | ("i", value) => Err(TilesError::InvalidArgument(format!(
                "type tag '{}' does not match value {:?}",
                tag, value
            ))),
            (other, _) => Err(TilesError::InvalidArgument(format!(
                "unsupported type tag '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TypedArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedArgument::String(s) => write!(f, "{{s, {:?}}}", s),
            TypedArgument::Int(i) => write!(f, "{{i, {}}}", i),
        }
    }
}

/// An OSC message addressed to the tiles app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    address: String,
    args: Vec<TypedArgument>,
}

impl Command {
    /// Start a command for the given action suffix (e.g. `/tileIndex/block`).
    ///
    /// The suffix is a protocol constant, never user input. The resulting
    /// address is always `/tiles` + suffix and the argument list is empty.
    pub fn build(suffix: &str) -> Self {
        Self {
            address: tiles_address(suffix),
            args: Vec::new(),
        }
    }

    /// Used when mirroring inbound messages, whose address is already complete
    pub(crate) fn from_parts(address: String, args: Vec<TypedArgument>) -> Self {
        Self { address, args }
    }

    /// Append a string argument
    pub fn with_string(mut self, value: impl Into<String>) -> Self {
        self.push(TypedArgument::String(value.into()));
        self
    }

    /// Append an integer argument
    pub fn with_int(mut self, value: i32) -> Self {
        self.push(TypedArgument::Int(value));
        self
    }

    pub fn push(&mut self, arg: TypedArgument) {
        self.args.push(arg);
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn args(&self) -> &[TypedArgument] {
        &self.args
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.address)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prefixes_namespace() {
        let command = Command::build("/startPMI");
        assert_eq!(command.address(), "/tiles/startPMI");
        assert!(command.args().is_empty());

        let command = Command::build("/userName/block");
        assert_eq!(command.address(), "/tiles/userName/block");
    }

    #[test]
    fn test_args_keep_insertion_order() {
        let command = Command::build("/userName/replaceByIndex")
            .with_string("Alice")
            .with_int(1)
            .with_int(4);
        assert_eq!(
            command.args(),
            &[
                TypedArgument::String("Alice".to_string()),
                TypedArgument::Int(1),
                TypedArgument::Int(4),
            ]
        );
    }

    #[test]
    fn test_tagged_rejects_mismatch() {
        assert_eq!(
            TypedArgument::tagged("s", RawValue::Text("Bob".into())).unwrap(),
            TypedArgument::String("Bob".into())
        );
        assert_eq!(
            TypedArgument::tagged("i", RawValue::Number(7)).unwrap(),
            TypedArgument::Int(7)
        );
        assert!(TypedArgument::tagged("i", RawValue::Text("7".into())).is_err());
        assert!(TypedArgument::tagged("s", RawValue::Number(7)).is_err());
        assert!(TypedArgument::tagged("f", RawValue::Number(7)).is_err());
        assert!(TypedArgument::tagged("i", RawValue::Number(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&TypedArgument::Int(2)).unwrap();
        assert_eq!(json, r#"{"type":"i","value":2}"#);

        let arg: TypedArgument = serde_json::from_str(r#"{"type":"s","value":"Carol"}"#).unwrap();
        assert_eq!(arg, TypedArgument::String("Carol".into()));

        let mismatch: std::result::Result<TypedArgument, _> =
            serde_json::from_str(r#"{"type":"i","value":"2"}"#);
        assert!(mismatch.is_err());
    }

    #[test]
    fn test_display() {
        let command = Command::build("/tileIndex/block").with_int(2).with_int(5);
        assert_eq!(command.to_string(), "/tiles/tileIndex/block [{i, 2}, {i, 5}]");
    }
}
