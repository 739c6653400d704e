//! Error types for graph construction and engine configuration.

use thiserror::Error;

/// Which end of an edge failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	Source,
	Target,
}

impl std::fmt::Display for Endpoint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Endpoint::Source => write!(f, "source"),
			Endpoint::Target => write!(f, "target"),
		}
	}
}

/// Non-fatal problems found while building a [`Graph`](super::graph::Graph).
///
/// The offending element is left out and the rest of the graph still renders.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	#[error("edge #{position} references unknown {endpoint} node '{id}'")]
	DanglingEdge {
		position: usize,
		endpoint: Endpoint,
		id: String,
	},
	#[error("node #{position} reuses id '{id}', keeping the first occurrence")]
	DuplicateNode { position: usize, id: String },
}

/// A configuration value that would make the engine misbehave.
///
/// Reported at setup time instead of being clamped.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
	#[error("{field} must be finite, got {value}")]
	NotFinite { field: &'static str, value: f64 },
	#[error("{field} must be within [{min}, {max}], got {value}")]
	OutOfRange {
		field: &'static str,
		value: f64,
		min: f64,
		max: f64,
	},
	#[error("{field} must be greater than zero, got {value}")]
	NotPositive { field: &'static str, value: f64 },
	#[error("min_scale ({min}) must be below max_scale ({max})")]
	InvertedScaleExtent { min: f64, max: f64 },
	#[error("unknown theme '{0}'")]
	UnknownTheme(String),
	#[error("invalid configuration JSON: {0}")]
	Parse(String),
	#[error("canvas size must be positive, got {width}x{height}")]
	EmptyCanvas { width: f64, height: f64 },
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
	if value.is_finite() {
		Ok(())
	} else {
		Err(ConfigError::NotFinite { field, value })
	}
}

pub(crate) fn ensure_range(
	field: &'static str,
	value: f64,
	min: f64,
	max: f64,
) -> Result<(), ConfigError> {
	ensure_finite(field, value)?;
	if (min..=max).contains(&value) {
		Ok(())
	} else {
		Err(ConfigError::OutOfRange {
			field,
			value,
			min,
			max,
		})
	}
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
	ensure_finite(field, value)?;
	if value > 0.0 {
		Ok(())
	} else {
		Err(ConfigError::NotPositive { field, value })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn range_check_rejects_nan() {
		assert_eq!(
			ensure_range("alpha", f64::NAN, 0.0, 1.0).unwrap_err().to_string(),
			"alpha must be finite, got NaN"
		);
	}

	#[test]
	fn dangling_edge_message_names_the_endpoint() {
		let err = GraphError::DanglingEdge {
			position: 3,
			endpoint: Endpoint::Target,
			id: "ghost".into(),
		};
		assert_eq!(
			err.to_string(),
			"edge #3 references unknown target node 'ghost'"
		);
	}
}
