//! Zoom-dependent sizes for nodes, edges, arrowheads and labels.
//!
//! Positions are in world space and the whole drawing is scaled by the
//! viewport's zoom `k`. Each visual size picks how it reacts to that:
//!
//! - [`ScaleBehavior::World`]: grows and shrinks with the drawing.
//! - [`ScaleBehavior::Screen`]: fixed pixel size, divided by `k` before drawing.
//! - [`ScaleBehavior::Clamped`]: world size, kept within pixel bounds.

/// How a size reacts to zoom.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	World,
	Screen,
	/// `(min_screen, max_screen)` in pixels. Infinite bounds are allowed.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space size to draw at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match *self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// How an opacity multiplier reacts to zoom.
#[derive(Clone, Debug, PartialEq)]
pub enum AlphaBehavior {
	/// Proportional to `k`, capped at 1.
	ScaleWithZoom,
	/// Zero at `zero_alpha_k`, fully visible from `full_alpha_k` upward.
	Fade { zero_alpha_k: f64, full_alpha_k: f64 },
}

impl AlphaBehavior {
	pub fn apply(&self, k: f64) -> f64 {
		match *self {
			AlphaBehavior::ScaleWithZoom => k.clamp(0.0, 1.0),
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeScaleConfig {
	pub radius: f64,
	pub radius_behavior: ScaleBehavior,
	/// Extra pick slack around the drawn circle, in screen pixels.
	pub hit_slack: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeScaleConfig {
	/// Stroke width in screen pixels.
	pub line_width: f64,
	/// Pointer distance that still counts as over the edge, in screen pixels.
	pub hit_tolerance: f64,
	/// Segments used to approximate an arc when hit testing.
	pub hit_samples: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrowScaleConfig {
	pub size: f64,
	pub size_behavior: ScaleBehavior,
	pub alpha_behavior: AlphaBehavior,
	/// Arrows fainter than this are skipped.
	pub cull_alpha: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelScaleConfig {
	/// Font size in screen pixels.
	pub size: f64,
	pub alpha_behavior: AlphaBehavior,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub arrow: ArrowScaleConfig,
	pub label: LabelScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 24.0,
				radius_behavior: ScaleBehavior::World,
				hit_slack: 2.0,
			},
			edge: EdgeScaleConfig {
				line_width: 1.5,
				hit_tolerance: 5.0,
				hit_samples: 24,
			},
			arrow: ArrowScaleConfig {
				size: 9.0,
				size_behavior: ScaleBehavior::Clamped {
					min_screen: 3.0,
					max_screen: 18.0,
				},
				alpha_behavior: AlphaBehavior::ScaleWithZoom,
				cull_alpha: 0.05,
			},
			label: LabelScaleConfig {
				size: 11.0,
				alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.35,
					full_alpha_k: 0.7,
				},
			},
		}
	}
}

/// [`ScaleConfig`] resolved for one zoom level, in world units.
///
/// Built once per frame and shared by drawing and hit testing.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledValues {
	pub k: f64,
	pub node_radius: f64,
	pub node_hit_radius: f64,
	pub edge_line_width: f64,
	pub edge_hit_tolerance: f64,
	pub edge_hit_samples: usize,
	pub arrow_size: f64,
	pub arrow_alpha: f64,
	pub cull_arrows: bool,
	/// CSS font, e.g. `"11px sans-serif"` before the zoom correction.
	pub label_font: String,
	pub label_alpha: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node_radius = config.node.radius_behavior.apply(config.node.radius, k);
		let arrow_alpha = config.arrow.alpha_behavior.apply(k);
		Self {
			k,
			node_radius,
			node_hit_radius: node_radius + config.node.hit_slack / k,
			edge_line_width: ScaleBehavior::Screen.apply(config.edge.line_width, k),
			edge_hit_tolerance: ScaleBehavior::Screen.apply(config.edge.hit_tolerance, k),
			edge_hit_samples: config.edge.hit_samples.max(2),
			arrow_size: config.arrow.size_behavior.apply(config.arrow.size, k),
			arrow_alpha,
			cull_arrows: arrow_alpha < config.arrow.cull_alpha,
			label_font: format!("{}px sans-serif", config.label.size / k),
			label_alpha: config.label.alpha_behavior.apply(k),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_sizes_stay_constant_on_screen() {
		let config = ScaleConfig::default();
		for k in [0.25, 1.0, 4.0] {
			let scaled = ScaledValues::new(&config, k);
			assert!((scaled.edge_line_width * k - 1.5).abs() < 1e-12);
			assert_eq!(scaled.node_radius, 24.0);
		}
	}

	#[test]
	fn clamped_arrow_respects_pixel_bounds() {
		let config = ScaleConfig::default();
		let zoomed_in = ScaledValues::new(&config, 10.0);
		assert!((zoomed_in.arrow_size * 10.0 - 18.0).abs() < 1e-12);
		let zoomed_out = ScaledValues::new(&config, 0.1);
		assert!((zoomed_out.arrow_size * 0.1 - 3.0).abs() < 1e-12);
		assert!(!zoomed_out.cull_arrows);
	}

	#[test]
	fn labels_fade_out_when_zoomed_out() {
		let config = ScaleConfig::default();
		assert_eq!(ScaledValues::new(&config, 0.2).label_alpha, 0.0);
		assert_eq!(ScaledValues::new(&config, 1.0).label_alpha, 1.0);
	}
}
