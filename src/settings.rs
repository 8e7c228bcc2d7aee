use crate::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the turning angle of a step is turned into a cost by
/// [`AstarDirectional`](crate::AstarDirectional)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TurnPenalty {
	/// `turn_cost * angle`
	#[default]
	Linear,
	/// `turn_cost * angle²`. Small corrections stay cheap, sharp turns become very expensive.
	Squared,
}

impl TurnPenalty {
	/// Applies the penalty to an angle in radians
	pub fn apply(self, angle: f32) -> f32 {
		match self {
			TurnPenalty::Linear => angle,
			TurnPenalty::Squared => angle * angle,
		}
	}
}

/// Options for configuring a [`PathFinder`](crate::PathFinder)
///
/// All weights are linear multipliers. Setting a weight to `0.0` removes the influence of its
/// term entirely.
///
/// Default options:
/// ```
/// # use terrain_pathfinding::{PathFindingSettings, TurnPenalty};
/// assert_eq!(
/// 	PathFindingSettings {
/// 		cell_size: 1.0,
/// 		max_iterations: 10_000,
/// 		min_height: f32::NEG_INFINITY,
/// 		max_slope_angle: 45.0,
/// 		use_cache: true,
/// 		cache_capacity: 256,
/// 		distance_cost: 1.0,
/// 		height_cost: 1.0,
/// 		turn_cost: 1.0,
/// 		turn_penalty: TurnPenalty::Linear,
/// 		distance_heuristic: 1.0,
/// 		height_heuristic: 0.0,
/// 		slope_heuristic: 0.0,
/// 	},
/// 	Default::default()
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathFindingSettings {
	/// The edge length of a grid cell (defaults to `1.0`).
	///
	/// Neighbours are sampled at this distance, and a search ends once it comes closer than
	/// this to the goal.
	pub cell_size: f32,
	/// The maximum number of Nodes a search expands before it gives up and connects the goal
	/// to the best candidate so far (defaults to `10_000`).
	pub max_iterations: usize,
	/// Nodes below this height are illegal (defaults to no limit)
	pub min_height: f32,
	/// Nodes on terrain steeper than this many degrees are illegal (defaults to `45.0`)
	pub max_slope_angle: f32,
	/// `true` (default): remember the result of every search by its endpoints.
	///
	/// `false`: every call to `find_path` runs a new search.
	pub use_cache: bool,
	/// The maximum number of remembered Paths (defaults to `256`). The least recently used
	/// entry is dropped first.
	pub cache_capacity: usize,
	/// Cost per unit of horizontal distance
	pub distance_cost: f32,
	/// Cost per unit of height difference between two Nodes
	pub height_cost: f32,
	/// Cost per radian (or radian², see [`turn_penalty`](Self::turn_penalty)) of turning.
	/// Only used by [`AstarDirectional`](crate::AstarDirectional).
	pub turn_cost: f32,
	/// How the turning angle is scaled
	pub turn_penalty: TurnPenalty,
	/// Heuristic weight per unit of horizontal distance to the goal
	pub distance_heuristic: f32,
	/// Heuristic weight per unit of height difference to the goal
	pub height_heuristic: f32,
	/// Heuristic weight per degree of slope at the Node
	pub slope_heuristic: f32,
}

impl PathFindingSettings {
	/// Settings that favour flat, smooth routes over short ones
	///
	/// Values:
	/// ```
	/// # use terrain_pathfinding::{PathFindingSettings, TurnPenalty};
	/// assert_eq!(
	/// 	PathFindingSettings {
	/// 		height_cost: 4.0,
	/// 		turn_cost: 2.0,
	/// 		turn_penalty: TurnPenalty::Squared,
	/// 		height_heuristic: 1.0,
	/// 		slope_heuristic: 0.05,
	/// 		..Default::default()
	/// 	},
	/// 	PathFindingSettings::SMOOTH
	/// );
	/// ```
	pub const SMOOTH: PathFindingSettings = PathFindingSettings {
		cell_size: 1.0,
		max_iterations: 10_000,
		min_height: f32::NEG_INFINITY,
		max_slope_angle: 45.0,
		use_cache: true,
		cache_capacity: 256,
		distance_cost: 1.0,
		height_cost: 4.0,
		turn_cost: 2.0,
		turn_penalty: TurnPenalty::Squared,
		distance_heuristic: 1.0,
		height_heuristic: 1.0,
		slope_heuristic: 0.05,
	};

	/// Settings that trade path quality for fewer expanded Nodes.
	///
	/// The distance heuristic is weighted above the distance cost, which makes the search
	/// greedy towards the goal.
	///
	/// Values:
	/// ```
	/// # use terrain_pathfinding::{PathFindingSettings, TurnPenalty};
	/// assert_eq!(
	/// 	PathFindingSettings {
	/// 		max_iterations: 2_000,
	/// 		height_cost: 0.0,
	/// 		turn_cost: 0.0,
	/// 		distance_heuristic: 2.0,
	/// 		..Default::default()
	/// 	},
	/// 	PathFindingSettings::FAST
	/// );
	/// ```
	pub const FAST: PathFindingSettings = PathFindingSettings {
		cell_size: 1.0,
		max_iterations: 2_000,
		min_height: f32::NEG_INFINITY,
		max_slope_angle: 45.0,
		use_cache: true,
		cache_capacity: 256,
		distance_cost: 1.0,
		height_cost: 0.0,
		turn_cost: 0.0,
		turn_penalty: TurnPenalty::Linear,
		distance_heuristic: 2.0,
		height_heuristic: 0.0,
		slope_heuristic: 0.0,
	};

	/// Creates the default settings with a different [`cell_size`](Self::cell_size)
	pub fn with_cell_size(cell_size: f32) -> PathFindingSettings {
		PathFindingSettings {
			cell_size,
			..Default::default()
		}
	}

	/// Checks that every value can be used by a search.
	///
	/// A [`PathFinder`](crate::PathFinder) calls this whenever it receives new settings, so a
	/// misconfiguration is reported up front instead of silently producing empty Paths.
	///
	/// ## Examples
	/// ```
	/// # use terrain_pathfinding::{PathFindingSettings, Error};
	/// let settings = PathFindingSettings {
	/// 	cell_size: 0.0,
	/// 	..Default::default()
	/// };
	/// assert!(matches!(
	/// 	settings.validate(),
	/// 	Err(Error::InvalidSetting { name: "cell_size", .. })
	/// ));
	/// ```
	pub fn validate(&self) -> Result<(), Error> {
		if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
			return Err(invalid("cell_size", "positive and finite", self.cell_size));
		}
		if self.max_iterations == 0 {
			return Err(Error::InvalidSetting {
				name: "max_iterations",
				expected: "at least 1",
				value: 0.0,
			});
		}
		if self.min_height.is_nan() {
			return Err(invalid("min_height", "a number", self.min_height));
		}
		if self.max_slope_angle.is_nan() {
			return Err(invalid("max_slope_angle", "a number", self.max_slope_angle));
		}
		if self.use_cache && self.cache_capacity == 0 {
			return Err(Error::InvalidSetting {
				name: "cache_capacity",
				expected: "at least 1 while use_cache is set",
				value: 0.0,
			});
		}

		let weights = [
			("distance_cost", self.distance_cost),
			("height_cost", self.height_cost),
			("turn_cost", self.turn_cost),
			("distance_heuristic", self.distance_heuristic),
			("height_heuristic", self.height_heuristic),
			("slope_heuristic", self.slope_heuristic),
		];
		for (name, weight) in weights {
			if !(weight.is_finite() && weight >= 0.0) {
				return Err(invalid(name, "non-negative and finite", weight));
			}
		}
		Ok(())
	}
}

fn invalid(name: &'static str, expected: &'static str, value: f32) -> Error {
	Error::InvalidSetting {
		name,
		expected,
		value: value as f64,
	}
}

impl Default for PathFindingSettings {
	fn default() -> PathFindingSettings {
		PathFindingSettings {
			cell_size: 1.0,
			max_iterations: 10_000,
			min_height: f32::NEG_INFINITY,
			max_slope_angle: 45.0,
			use_cache: true,
			cache_capacity: 256,
			distance_cost: 1.0,
			height_cost: 1.0,
			turn_cost: 1.0,
			turn_penalty: TurnPenalty::Linear,
			distance_heuristic: 1.0,
			height_heuristic: 0.0,
			slope_heuristic: 0.0,
		}
	}
}
