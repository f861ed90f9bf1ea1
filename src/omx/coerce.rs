//! Scalar value coercion for OMX leaf elements
//!
//! Every leaf element in an OMX document carries its value as text (or as an
//! inline `value` attribute). The schema registry declares which [`ScalarKind`]
//! a leaf holds; the functions here turn the raw token into a typed [`Scalar`].
//!
//! Boolean tokens are case-sensitive: `true`, `false`, `1` and `0` are
//! accepted, nothing else.

use std::fmt;

use serde::Serialize;

/// The kind of scalar a leaf element is declared to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarKind {
    /// Signed 64-bit integer
    Integer,
    /// Double-precision float
    Float,
    /// Boolean (`true`/`false`/`1`/`0`)
    Boolean,
    /// Text, kept as-is after trimming
    String,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Boolean => "boolean",
            ScalarKind::String => "string",
        };
        f.write_str(name)
    }
}

/// A coerced primitive value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// String value
    String(String),
}

impl Scalar {
    /// The kind of this value
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Integer(_) => ScalarKind::Integer,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Boolean(_) => ScalarKind::Boolean,
            Scalar::String(_) => ScalarKind::String,
        }
    }

    /// Get the value as i64 if it is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as f64; integers are widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            Scalar::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get the value as bool if it is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a string slice if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(v) => Some(v),
            _ => None,
        }
    }
}

/// A raw token could not be coerced to the requested kind
///
/// The tag name is not known at this level; the decoder attaches it before
/// surfacing the failure as a decode error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot read {text:?} as {kind}")]
pub struct CoercionError {
    /// The offending raw text
    pub text: String,
    /// The kind that was requested
    pub kind: ScalarKind,
}

impl CoercionError {
    fn new(text: &str, kind: ScalarKind) -> Self {
        Self {
            text: text.to_owned(),
            kind,
        }
    }
}

/// Parse a signed integer
pub fn to_integer(text: &str) -> Result<i64, CoercionError> {
    text.parse()
        .map_err(|_| CoercionError::new(text, ScalarKind::Integer))
}

/// Parse a double-precision float
pub fn to_float(text: &str) -> Result<f64, CoercionError> {
    text.parse()
        .map_err(|_| CoercionError::new(text, ScalarKind::Float))
}

/// Parse a boolean token
pub fn to_boolean(text: &str) -> Result<bool, CoercionError> {
    match text {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(CoercionError::new(text, ScalarKind::Boolean)),
    }
}

/// Identity coercion for string leaves
pub fn to_string(text: &str) -> String {
    text.to_owned()
}

/// Coerce `text` into a [`Scalar`] of the given kind
pub fn coerce(text: &str, kind: ScalarKind) -> Result<Scalar, CoercionError> {
    Ok(match kind {
        ScalarKind::Integer => Scalar::Integer(to_integer(text)?),
        ScalarKind::Float => Scalar::Float(to_float(text)?),
        ScalarKind::Boolean => Scalar::Boolean(to_boolean(text)?),
        ScalarKind::String => Scalar::String(to_string(text)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer() {
        assert_eq!(coerce("42", ScalarKind::Integer), Ok(Scalar::Integer(42)));
        assert_eq!(coerce("-7", ScalarKind::Integer), Ok(Scalar::Integer(-7)));
        assert_eq!(to_integer("+3"), Ok(3));

        let err = coerce("abc", ScalarKind::Integer).unwrap_err();
        assert_eq!(err.text, "abc");
        assert_eq!(err.kind, ScalarKind::Integer);
    }

    #[test]
    fn test_float() {
        assert_eq!(to_float("1.5"), Ok(1.5));
        let evalue = to_float("3.2e-05").unwrap();
        assert!((evalue - 3.2e-5).abs() < 1e-12);
        assert!(to_float("1.2.3").is_err());
    }

    #[test]
    fn test_boolean_is_case_sensitive() {
        assert_eq!(coerce("true", ScalarKind::Boolean), Ok(Scalar::Boolean(true)));
        assert_eq!(coerce("false", ScalarKind::Boolean), Ok(Scalar::Boolean(false)));
        assert_eq!(to_boolean("1"), Ok(true));
        assert_eq!(to_boolean("0"), Ok(false));
        assert!(to_boolean("True").is_err());
        assert!(to_boolean("yes").is_err());
    }

    #[test]
    fn test_string_is_identity() {
        assert_eq!(
            coerce("PEPTIDEK", ScalarKind::String),
            Ok(Scalar::String("PEPTIDEK".to_string()))
        );
        assert_eq!(coerce("", ScalarKind::String), Ok(Scalar::String(String::new())));
    }

    #[test]
    fn test_widening() {
        assert_eq!(Scalar::Integer(2).as_f64(), Some(2.0));
        assert_eq!(Scalar::Float(2.0).as_i64(), None);
    }
}
