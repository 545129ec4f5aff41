//! Scalar kinds supported by the mapping engine.
//!
//! # Responsibility
//! - Define the closed set of field types the engine can coerce.
//! - Pair every kind with one parse function and one stringify function.
//!
//! # Invariants
//! - Adding a kind is one `ScalarKind` variant plus one `parse` table entry.
//! - `kind.parse(value.render()) == value` for every in-range value.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Closed set of scalar kinds storable in a flat key/value entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Char,
    Text,
}

impl ScalarKind {
    /// Stable lowercase label used in error messages and log events.
    pub fn label(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Text => "text",
        }
    }

    /// Parses a non-empty stored string into a value of this kind.
    ///
    /// The engine never calls this with an empty string; empty resolved
    /// values leave the target field at its zero value instead.
    pub fn parse(self, raw: &str) -> Result<ScalarValue, ScalarParseError> {
        match self {
            Self::I8 => parse_int(self, raw, ScalarValue::I8),
            Self::I16 => parse_int(self, raw, ScalarValue::I16),
            Self::I32 => parse_int(self, raw, ScalarValue::I32),
            Self::I64 => parse_int(self, raw, ScalarValue::I64),
            Self::U8 => parse_int(self, raw, ScalarValue::U8),
            Self::U16 => parse_int(self, raw, ScalarValue::U16),
            Self::U32 => parse_int(self, raw, ScalarValue::U32),
            Self::U64 => parse_int(self, raw, ScalarValue::U64),
            Self::F32 => parse_float(self, raw, ScalarValue::F32),
            Self::F64 => parse_float(self, raw, ScalarValue::F64),
            Self::Bool => raw
                .parse::<bool>()
                .map(ScalarValue::Bool)
                .map_err(|source| ScalarParseError::Bool {
                    raw: raw.to_string(),
                    source,
                }),
            // Matches the historical format: the first character wins and
            // trailing characters are ignored.
            Self::Char => raw
                .chars()
                .next()
                .map(ScalarValue::Char)
                .ok_or_else(|| ScalarParseError::EmptyChar),
            Self::Text => Ok(ScalarValue::Text(raw.to_string())),
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn parse_int<N>(
    kind: ScalarKind,
    raw: &str,
    wrap: fn(N) -> ScalarValue,
) -> Result<ScalarValue, ScalarParseError>
where
    N: std::str::FromStr<Err = std::num::ParseIntError>,
{
    raw.parse::<N>()
        .map(wrap)
        .map_err(|source| ScalarParseError::Int {
            kind,
            raw: raw.to_string(),
            source,
        })
}

fn parse_float<N>(
    kind: ScalarKind,
    raw: &str,
    wrap: fn(N) -> ScalarValue,
) -> Result<ScalarValue, ScalarParseError>
where
    N: std::str::FromStr<Err = std::num::ParseFloatError>,
{
    raw.parse::<N>()
        .map(wrap)
        .map_err(|source| ScalarParseError::Float {
            kind,
            raw: raw.to_string(),
            source,
        })
}

/// One coerced scalar value, tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
    Text(String),
}

impl ScalarValue {
    /// Kind tag of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Char(_) => ScalarKind::Char,
            Self::Text(_) => ScalarKind::Text,
        }
    }

    /// Stringifies this value into its stored form.
    ///
    /// Stringification of scalars cannot fail.
    pub fn render(&self) -> String {
        match self {
            Self::I8(v) => v.to_string(),
            Self::I16(v) => v.to_string(),
            Self::I32(v) => v.to_string(),
            Self::I64(v) => v.to_string(),
            Self::U8(v) => v.to_string(),
            Self::U16(v) => v.to_string(),
            Self::U32(v) => v.to_string(),
            Self::U64(v) => v.to_string(),
            Self::F32(v) => v.to_string(),
            Self::F64(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Char(v) => v.to_string(),
            Self::Text(v) => v.clone(),
        }
    }
}

/// Coercion failure for one stored string.
#[derive(Debug)]
pub enum ScalarParseError {
    Int {
        kind: ScalarKind,
        raw: String,
        source: std::num::ParseIntError,
    },
    Float {
        kind: ScalarKind,
        raw: String,
        source: std::num::ParseFloatError,
    },
    Bool {
        raw: String,
        source: std::str::ParseBoolError,
    },
    EmptyChar,
}

impl Display for ScalarParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int { kind, raw, .. } => write!(f, "cannot parse `{raw}` as {kind}"),
            Self::Float { kind, raw, .. } => write!(f, "cannot parse `{raw}` as {kind}"),
            Self::Bool { raw, .. } => {
                write!(f, "cannot parse `{raw}` as bool; expected true|false")
            }
            Self::EmptyChar => write!(f, "cannot parse empty string as char"),
        }
    }
}

impl Error for ScalarParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Int { source, .. } => Some(source),
            Self::Float { source, .. } => Some(source),
            Self::Bool { source, .. } => Some(source),
            Self::EmptyChar => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScalarKind, ScalarParseError, ScalarValue};

    #[test]
    fn parse_round_trips_rendered_values() {
        let values = [
            ScalarValue::I8(-12),
            ScalarValue::I64(9_000_000_000),
            ScalarValue::U16(65_535),
            ScalarValue::F64(2.5),
            ScalarValue::Bool(true),
            ScalarValue::Char('x'),
            ScalarValue::Text("plain text".to_string()),
        ];

        for value in values {
            let parsed = value.kind().parse(&value.render()).unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn parse_rejects_non_numeric_integer_text() {
        let err = ScalarKind::I32.parse("abc").unwrap_err();
        assert!(matches!(err, ScalarParseError::Int { raw, .. } if raw == "abc"));
    }

    #[test]
    fn parse_rejects_out_of_range_integer() {
        let err = ScalarKind::U8.parse("256").unwrap_err();
        assert!(matches!(err, ScalarParseError::Int { .. }));
    }

    #[test]
    fn parse_rejects_loose_bool_spelling() {
        let err = ScalarKind::Bool.parse("yes").unwrap_err();
        assert!(matches!(err, ScalarParseError::Bool { raw, .. } if raw == "yes"));
    }

    #[test]
    fn char_takes_first_character() {
        let parsed = ScalarKind::Char.parse("abc").unwrap();
        assert_eq!(parsed, ScalarValue::Char('a'));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_value(ScalarKind::I32).unwrap();
        assert_eq!(json, "i32");
        let json = serde_json::to_value(ScalarKind::Text).unwrap();
        assert_eq!(json, "text");
    }
}
