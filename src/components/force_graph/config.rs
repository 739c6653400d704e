//! Engine configuration, loadable from JSON.
//!
//! Every section defaults field by field, so `{}` or a partial object is a
//! valid configuration.

use serde::Deserialize;

use super::error::ConfigError;
use super::geometry::GeometryConfig;
use super::interaction::InteractionConfig;
use super::simulation::SimulationConfig;
use super::theme::Theme;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
	pub simulation: SimulationConfig,
	pub geometry: GeometryConfig,
	pub interaction: InteractionConfig,
	/// Name of a [`Theme`] preset; the default theme when unset.
	pub theme: Option<String>,
}

impl EngineConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.simulation.validate()?;
		self.geometry.validate()?;
		self.interaction.validate()?;
		match self.theme.as_deref() {
			Some(name) if Theme::by_name(name).is_none() => {
				Err(ConfigError::UnknownTheme(name.to_string()))
			}
			_ => Ok(()),
		}
	}

	pub fn theme_preset(&self) -> Theme {
		self.theme
			.as_deref()
			.and_then(Theme::by_name)
			.unwrap_or_default()
	}

	/// Parses and validates a JSON configuration.
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		let config: Self =
			serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::interaction::PinPolicy;

	#[test]
	fn empty_object_is_the_default() {
		assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
	}

	#[test]
	fn partial_sections_keep_other_defaults() {
		let config = EngineConfig::from_json(
			r#"{
				"geometry": { "packing": 3 },
				"interaction": { "pin_policy": "keep_pinned", "release_alpha_target": 0.2 }
			}"#,
		)
		.unwrap();
		assert_eq!(config.geometry.packing, 3.0);
		assert_eq!(config.interaction.pin_policy, PinPolicy::KeepPinned);
		assert_eq!(config.interaction.release_alpha_target, 0.2);
		assert_eq!(config.interaction.drag_alpha_target, 0.3);
		assert_eq!(config.simulation, SimulationConfig::default());
	}

	#[test]
	fn theme_is_picked_by_preset_name() {
		let config = EngineConfig::from_json(r#"{ "theme": "midnight" }"#).unwrap();
		assert_eq!(config.theme_preset(), Theme::midnight());
		assert_eq!(EngineConfig::default().theme_preset().name, "ledger");
	}

	#[test]
	fn invalid_values_are_rejected_not_clamped() {
		let err = EngineConfig::from_json(r#"{ "geometry": { "packing": 9 } }"#).unwrap_err();
		assert!(matches!(err, ConfigError::OutOfRange { field: "geometry.packing", .. }));

		let err = EngineConfig::from_json(r#"{ "theme": "neon" }"#).unwrap_err();
		assert_eq!(err, ConfigError::UnknownTheme("neon".into()));

		let err = EngineConfig::from_json("[1, 2]").unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}
}
