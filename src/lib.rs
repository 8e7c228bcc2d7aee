#![warn(
	missing_docs,
	missing_debug_implementations,
	missing_copy_implementations,
	trivial_casts,
	trivial_numeric_casts,
	unsafe_code,
	unstable_features,
	unused_import_braces,
	unused_qualifications
)]

//! A crate to find Paths across terrain.
//!
//! ## Introduction
//! Terrain in games and simulations is usually continuous: a height and a slope can be sampled
//! at any position, but there is no predefined graph of walkable Nodes. This crate searches
//! such terrain by laying a grid over it on the fly. Starting at the start position, every
//! Node that the search expands samples the 8 cells around it, and only the cells that are
//! legal (high enough, flat enough and within the navigable area) are kept.
//!
//! What makes a Path good is decided by a [`CostModel`]:
//! - [`Astar`]: cost of distance and height changes, with a heuristic towards the goal that can
//! also prefer flat ground
//! - [`AstarDirectional`]: like [`Astar`], but turning costs extra, resulting in smoother Paths
//! - [`Dijkstra`]: like [`Astar`], without any heuristic
//!
//! The heuristics are not required to be admissible. Weighting height and slope in the
//! heuristic makes the search prefer safe routes over the shortest ones.
//!
//! ## Examples
//! ```
//! use terrain_pathfinding::{prelude::*, glam::{Vec2, Vec3}};
//!
//! // a valley along z, with walls that get too steep far away from x = 0
//! let terrain = FnTerrain::new(
//!     |p: Vec3| p.x * p.x * 0.05,
//!     |p: Vec3| (p.x * 0.1).atan().to_degrees() * 4.0,
//! );
//! let bounds = TerrainBounds::new(Vec2::new(-30.0, -30.0), Vec2::new(30.0, 30.0));
//!
//! let mut pathfinder = PathFinder::new(Astar, PathFindingSettings::default()).unwrap();
//!
//! let start = Vec3::new(0.0, 0.0, -20.0);
//! let goal = Vec3::new(0.0, 0.0, 20.0);
//! let path = pathfinder.find_path(start, goal, &terrain, &bounds);
//!
//! assert_eq!(path.status(), PathStatus::Found);
//! assert_eq!(path.end().unwrap().position(), goal);
//!
//! for point in path.world_points() {
//!     // move along the Path
//! #   let _ = point;
//! }
//! ```
//!
//! ### Checkpoints
//! A Path through several points is searched segment by segment:
//! ```
//! # use terrain_pathfinding::{prelude::*, glam::{Vec2, Vec3}};
//! # let terrain = FnTerrain::new(|_| 0.0, |_| 0.0);
//! # let bounds = TerrainBounds::new(Vec2::new(-30.0, -30.0), Vec2::new(30.0, 30.0));
//! # let mut pathfinder = PathFinder::new(Astar, PathFindingSettings::default()).unwrap();
//! let checkpoints = [
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(10.0, 0.0, 0.0),
//!     Vec3::new(10.0, 0.0, 10.0),
//! ];
//! let path = pathfinder.find_path_by_checkpoints(&checkpoints, &terrain, &bounds);
//!
//! assert!((path.length() - 20.0).abs() < 1e-3);
//! ```
//!
//! ### Caching
//! Every searched Path is remembered by its endpoints, so asking for the same Path again
//! is free. The cache does not know about the terrain: when the terrain changes, or when
//! anything else makes old Paths invalid, the cache has to be cleared:
//! ```
//! # use terrain_pathfinding::{prelude::*, glam::{Vec2, Vec3}};
//! # let terrain = FnTerrain::new(|_| 0.0, |_| 0.0);
//! # let bounds = TerrainBounds::new(Vec2::new(-30.0, -30.0), Vec2::new(30.0, 30.0));
//! # let mut pathfinder = PathFinder::new(Astar, PathFindingSettings::default()).unwrap();
//! pathfinder.find_path(Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0), &terrain, &bounds);
//! assert_eq!(pathfinder.cached_paths(), 1);
//!
//! // ... the terrain changed
//! pathfinder.clean_cache();
//! assert_eq!(pathfinder.cached_paths(), 0);
//! ```
//! Changing the settings through [`PathFinder::set_settings`] clears the cache as well.
//!
//! ### Configuration
//! The weights and limits of a search are set through [`PathFindingSettings`]. Besides the
//! default, there are presets for [smooth](PathFindingSettings::SMOOTH) and
//! [fast](PathFindingSettings::FAST) searches:
//! ```
//! # use terrain_pathfinding::prelude::*;
//! let pathfinder = PathFinder::new(
//!     AstarDirectional,
//!     PathFindingSettings {
//!         cell_size: 0.5,
//!         ..PathFindingSettings::SMOOTH
//!     },
//! ).unwrap();
//!
//! assert_eq!(pathfinder.settings().cell_size, 0.5);
//! ```
//!
//! ## Features
//! - `parallel` (default): [`PathFinder::par_find_path_by_checkpoints`] searches the segments
//! of a checkpoint Path on the rayon thread pool
//! - `log`: logs searches and cache activity through the `log` facade
//! - `serde`: `Serialize`/`Deserialize` for [`PathFindingSettings`]

#[cfg(feature = "log")]
macro_rules! log_trace {
	($($arg:tt)*) => { log::trace!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! log_trace {
	($($arg:tt)*) => {{
		if false {
			let _ = format_args!($($arg)*);
		}
	}};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
	($($arg:tt)*) => { log::debug!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! log_debug {
	($($arg:tt)*) => {{
		if false {
			let _ = format_args!($($arg)*);
		}
	}};
}

#[cfg(feature = "log")]
macro_rules! timed {
	($name:expr, $body:expr) => {{
		let timer = std::time::Instant::now();
		let result = $body;
		log::debug!("{} took {:?}", $name, timer.elapsed());
		result
	}};
}
#[cfg(not(feature = "log"))]
macro_rules! timed {
	($name:expr, $body:expr) => {
		$body
	};
}

pub use glam;

/// A Type to represent the Cost of a Path or a step
pub type Cost = f32;

mod error;
pub use self::error::Error;

pub mod node;
pub use self::node::Node;

mod path;
pub use self::path::{Path, PathStatus};

mod settings;
pub use self::settings::{PathFindingSettings, TurnPenalty};

pub mod terrain;

pub mod neighbors;

pub mod cost;
pub use self::cost::{Astar, AstarDirectional, CostModel, Dijkstra};

mod algorithm;
pub use self::algorithm::{
	AstarPathFinder, DijkstraPathFinder, DirectionalPathFinder, PathFinder,
};

/// The prelude for this crate.
pub mod prelude {
	pub use crate::{
		terrain::{Bounds, FnTerrain, HeightField, TerrainBounds, TerrainSampler},
		Astar, AstarDirectional, CostModel, Dijkstra, Node, Path, PathFinder,
		PathFindingSettings, PathStatus, TurnPenalty,
	};
}
