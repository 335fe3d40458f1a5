//! Chain specification strings.
//!
//! Format: `"unit_type:param=value,param=value|unit_type|..."`. Parameter
//! keys are native parameter ids of the unit; values are plain numbers.

use thiserror::Error;

/// Errors from parsing a chain specification.
#[derive(Debug, Error, PartialEq)]
pub enum ChainSpecError {
    /// A `key=value` pair is malformed.
    #[error("invalid parameter format: '{0}' (expected key=value)")]
    BadParam(String),

    /// A value is not a number.
    #[error("invalid value for '{param}': '{value}' is not a number")]
    BadValue {
        /// Parameter key.
        param: String,
        /// Raw value.
        value: String,
    },

    /// A segment names no unit type.
    #[error("empty unit type in '{0}'")]
    EmptyType(String),
}

/// One unit of a parsed chain.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSpec {
    /// Registry type name.
    pub unit_type: String,
    /// Native parameter values, in the order given.
    pub params: Vec<(String, f64)>,
}

/// Parse a chain specification. Empty segments are skipped.
pub fn parse_chain(spec: &str) -> Result<Vec<UnitSpec>, ChainSpecError> {
    spec.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_unit_spec)
        .collect()
}

fn parse_unit_spec(spec: &str) -> Result<UnitSpec, ChainSpecError> {
    let (name, params) = spec.split_once(':').unwrap_or((spec, ""));
    let unit_type = name.trim();
    if unit_type.is_empty() {
        return Err(ChainSpecError::EmptyType(spec.to_string()));
    }
    Ok(UnitSpec {
        unit_type: unit_type.to_string(),
        params: parse_params(params)?,
    })
}

fn parse_params(params: &str) -> Result<Vec<(String, f64)>, ChainSpecError> {
    let mut out = Vec::new();
    for param in params.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = param.split_once('=') else {
            return Err(ChainSpecError::BadParam(param.to_string()));
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            return Err(ChainSpecError::BadParam(param.to_string()));
        }
        let number = value.parse().map_err(|_| ChainSpecError::BadValue {
            param: key.to_string(),
            value: value.to_string(),
        })?;
        out.push((key.to_string(), number));
    }
    Ok(out)
}
