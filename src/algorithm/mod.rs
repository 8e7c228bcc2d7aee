use crate::{
	cost::{Astar, AstarDirectional, CostModel, Dijkstra},
	neighbors,
	node::CellKey,
	terrain::{Bounds, TerrainSampler},
	Error, Node, Path, PathFindingSettings, PathStatus,
};
use glam::{Vec2, Vec3};

mod a_star;

mod cache;
use self::cache::{EndpointKey, PathResultCache};

mod node_list;
use self::node_list::{NodeId, NodeList};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A [`PathFinder`] running plain A*
pub type AstarPathFinder = PathFinder<Astar>;
/// A [`PathFinder`] running A* with a turning cost
pub type DirectionalPathFinder = PathFinder<AstarDirectional>;
/// A [`PathFinder`] running Dijkstra's Algorithm
pub type DijkstraPathFinder = PathFinder<Dijkstra>;

/// Searches Paths across a terrain.
///
/// The PathFinder owns the [`PathFindingSettings`] and a cache of previous results, but not
/// the terrain: the [`TerrainSampler`] and [`Bounds`] are handed to every search. This allows
/// the caller to store the terrain in any format and to keep mutating it. When the terrain
/// changes, call [`clean_cache`](PathFinder::clean_cache) to forget Paths that may no longer be
/// valid.
///
/// The grid that is searched does not exist up front. Starting at the requested start
/// position, every expanded Node samples the 8 cells around it at a distance of
/// [`cell_size`](PathFindingSettings::cell_size), keeping the ones that are legal.
///
/// Searching takes `&mut self`, since results are written to the cache. To share one
/// PathFinder between threads, wrap it in a `Mutex`.
///
/// ## Examples
/// ```
/// use terrain_pathfinding::{prelude::*, glam::{Vec2, Vec3}};
///
/// // gentle hills, with a steep rock in the middle
/// let terrain = FnTerrain::new(
/// 	|p: Vec3| (p.x * 0.3).sin() + (p.z * 0.2).cos(),
/// 	|p: Vec3| if p.distance(Vec3::new(5.0, p.y, 5.0)) < 2.0 { 70.0 } else { 10.0 },
/// );
/// let bounds = TerrainBounds::new(Vec2::new(-20.0, -20.0), Vec2::new(20.0, 20.0));
///
/// let mut pathfinder = PathFinder::new(Astar, PathFindingSettings::default()).unwrap();
///
/// let path = pathfinder.find_path(
/// 	Vec3::new(0.0, 1.0, 0.0),
/// 	Vec3::new(10.0, 1.0, 10.0),
/// 	&terrain,
/// 	&bounds,
/// );
///
/// assert_eq!(path.status(), PathStatus::Found);
/// assert!(path.iter().all(|node| node.slope_angle() <= 45.0));
/// ```
#[derive(Clone, Debug)]
pub struct PathFinder<M: CostModel> {
	model: M,
	settings: PathFindingSettings,
	cache: PathResultCache,
}

impl<M: CostModel> PathFinder<M> {
	/// Creates a new PathFinder.
	///
	/// Fails if the settings are unusable, see [`PathFindingSettings::validate`].
	pub fn new(model: M, settings: PathFindingSettings) -> Result<PathFinder<M>, Error> {
		settings.validate()?;
		Ok(PathFinder {
			model,
			cache: PathResultCache::new(settings.cache_capacity),
			settings,
		})
	}

	/// The settings used for every search
	pub fn settings(&self) -> &PathFindingSettings {
		&self.settings
	}

	/// The cost model
	pub fn model(&self) -> &M {
		&self.model
	}

	/// Replaces the settings.
	///
	/// Since cached Paths were searched with the old weights and limits, the cache is cleared.
	/// Invalid settings are rejected and leave the PathFinder unchanged.
	pub fn set_settings(&mut self, settings: PathFindingSettings) -> Result<(), Error> {
		settings.validate()?;
		self.settings = settings;
		self.cache.set_capacity(settings.cache_capacity);
		self.clean_cache();
		Ok(())
	}

	/// Forgets all cached Paths
	pub fn clean_cache(&mut self) {
		log_trace!("clearing {} cached paths", self.cache.len());
		self.cache.clear();
	}

	/// The number of Paths currently cached
	pub fn cached_paths(&self) -> usize {
		self.cache.len()
	}

	/// Checks if `node` may be part of a Path.
	///
	/// A legal Node is at least [`min_height`](PathFindingSettings::min_height) high, no steeper
	/// than [`max_slope_angle`](PathFindingSettings::max_slope_angle) and within `bounds`.
	///
	/// The result is stored in the Node and returned from there on every further call.
	///
	/// ## Examples
	/// ```
	/// # use terrain_pathfinding::{prelude::*, glam::{Vec2, Vec3}};
	/// let pathfinder = PathFinder::new(Astar, PathFindingSettings {
	/// 	min_height: 0.0,
	/// 	max_slope_angle: 30.0,
	/// 	..Default::default()
	/// }).unwrap();
	/// let bounds = TerrainBounds::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
	///
	/// let mut node = Node::new(Vec3::new(1.0, 2.0, 1.0)).with_slope_angle(20.0);
	/// assert!(pathfinder.is_legal(&mut node, &bounds));
	/// assert_eq!(node.legal(), Some(true));
	///
	/// let mut steep = Node::new(Vec3::new(1.0, 2.0, 1.0)).with_slope_angle(35.0);
	/// assert!(!pathfinder.is_legal(&mut steep, &bounds));
	///
	/// let mut outside = Node::new(Vec3::new(-1.0, 2.0, 1.0));
	/// assert!(!pathfinder.is_legal(&mut outside, &bounds));
	/// ```
	pub fn is_legal<B: Bounds + ?Sized>(&self, node: &mut Node, bounds: &B) -> bool {
		if let Some(legal) = node.legal() {
			return legal;
		}
		let legal_height = node.height() >= self.settings.min_height;
		let legal_slope = node.slope_angle() <= self.settings.max_slope_angle;
		let legal_position = bounds.contains(node.position());

		let legal = legal_height && legal_slope && legal_position;
		node.set_legal(legal);
		legal
	}

	/// Samples the cells around `id`, reusing Nodes the search already created.
	///
	/// Illegal cells are dropped without being remembered. The resulting ids are stored on the
	/// Node as well as returned.
	pub(crate) fn create_neighbours<T, B>(
		&self,
		nodes: &mut NodeList,
		id: NodeId,
		heading: Vec2,
		terrain: &T,
		bounds: &B,
	) -> Vec<NodeId>
	where
		T: TerrainSampler + ?Sized,
		B: Bounds + ?Sized,
	{
		let center = nodes[id].node;
		let size = center.size();
		let mut found = Vec::with_capacity(8);

		for offset in neighbors::offsets(heading, self.model.front_only()) {
			let x = center.position().x + offset.x * size;
			let z = center.position().z + offset.y * size;

			if let Some(existing) = nodes.id_at(CellKey::from_xz(x, z)) {
				found.push(existing);
				continue;
			}

			let probe = Vec3::new(x, center.height(), z);
			let position = Vec3::new(x, terrain.sample_height(probe), z);
			let mut node = Node::new(position)
				.with_slope_angle(terrain.slope_angle(position))
				.with_size(size)
				.with_direction(offset);

			if self.is_legal(&mut node, bounds) {
				found.push(nodes.add_node(node));
			}
		}

		nodes[id].neighbours = Some(found.clone());
		found
	}

	/// Builds the Node of a requested endpoint. The height is kept as given, the slope is
	/// sampled from the terrain.
	fn endpoint<T, B>(&self, position: Vec3, terrain: &T, bounds: &B) -> Node
	where
		T: TerrainSampler + ?Sized,
		B: Bounds + ?Sized,
	{
		let mut node = Node::new(position)
			.with_slope_angle(terrain.slope_angle(position))
			.with_size(self.settings.cell_size);
		self.is_legal(&mut node, bounds);
		node
	}

	fn endpoint_key(start: Vec3, end: Vec3) -> EndpointKey {
		(
			CellKey::from_position(start),
			CellKey::from_position(end),
		)
	}

	fn is_degenerate(&self, start: Vec3, end: Vec3) -> bool {
		Vec2::new(start.x, start.z).distance(Vec2::new(end.x, end.z)) < self.settings.cell_size
	}

	/// Everything `find_path` does except for touching the cache
	fn plan<T, B>(&self, start: Vec3, end: Vec3, terrain: &T, bounds: &B) -> Path
	where
		T: TerrainSampler + ?Sized,
		B: Bounds + ?Sized,
	{
		if self.is_degenerate(start, end) {
			return Path::empty(PathStatus::Degenerate);
		}

		let start = self.endpoint(start, terrain, bounds);
		let end = self.endpoint(end, terrain, bounds);
		if !start.is_legal() || !end.is_legal() {
			log_debug!("illegal endpoint, connecting {} and {} directly", start, end);
			return Path::direct(start, end);
		}

		log_trace!("searching from {} to {} with {:?}", start, end, self.model);
		timed!(
			"search",
			a_star::a_star_search(self, start, end, terrain, bounds)
		)
	}

	/// Calculates the Path from `start` to `end`.
	///
	/// The returned [`Path`] always tells how it was obtained through its
	/// [`status`](Path::status):
	/// - `start` and `end` closer than one cell: an empty Path, [`PathStatus::Degenerate`]
	/// - a cached Path for the same endpoints (when caching is enabled)
	/// - either endpoint illegal: the two endpoints connected directly, [`PathStatus::Direct`].
	/// It is up to the caller to decide whether such a Path is usable.
	/// - the goal was reached: [`PathStatus::Found`]
	/// - [`max_iterations`](PathFindingSettings::max_iterations) Nodes were explored: the goal
	/// is connected to the best candidate so far, [`PathStatus::BudgetExhausted`]
	/// - every reachable Node was explored: an empty Path, [`PathStatus::Unreachable`]
	///
	/// `start` and `end` are used as they are, including their height. The last Node of a
	/// non-empty Path is always exactly at `end`.
	pub fn find_path<T, B>(&mut self, start: Vec3, end: Vec3, terrain: &T, bounds: &B) -> Path
	where
		T: TerrainSampler + ?Sized,
		B: Bounds + ?Sized,
	{
		if self.is_degenerate(start, end) {
			return Path::empty(PathStatus::Degenerate);
		}

		let key = Self::endpoint_key(start, end);
		if self.settings.use_cache {
			let cached = self.cache.get(&key);
			if let Some(path) = cached.and_then(|path| self.reanchor(&path, start, end, bounds)) {
				log_trace!("cache hit for {:?} -> {:?}", key.0, key.1);
				return path;
			}
		}

		let path = self.plan(start, end, terrain, bounds);
		self.remember(key, &path);
		path
	}

	/// Moves the ends of a cached Path onto the requested positions.
	///
	/// The cached endpoints only share a cell with the requested ones, so height and exact
	/// position may differ. The slope is taken from the cached Nodes instead of sampling the
	/// terrain again. Returns `None` if a requested endpoint is illegal, in which case the
	/// cached Path does not apply.
	fn reanchor<B>(&self, path: &Path, start: Vec3, end: Vec3, bounds: &B) -> Option<Path>
	where
		B: Bounds + ?Sized,
	{
		let (first, last) = (path.start()?, path.end()?);
		let mut start = Node::new(start)
			.with_slope_angle(first.slope_angle())
			.with_size(self.settings.cell_size);
		let mut end = Node::new(end)
			.with_slope_angle(last.slope_angle())
			.with_size(self.settings.cell_size);
		if !self.is_legal(&mut start, bounds) || !self.is_legal(&mut end, bounds) {
			return None;
		}
		Some(path.with_endpoints(start, end, |from, heading, to| {
			self.model.cost(from, heading, to, &self.settings)
		}))
	}

	fn remember(&mut self, key: EndpointKey, path: &Path) {
		if self.settings.use_cache && path.status().is_searched() {
			self.cache.insert(key, path.clone());
		}
	}

	/// Calculates a Path that visits all `checkpoints` in order.
	///
	/// Every pair of consecutive checkpoints is searched on its own with
	/// [`find_path`](PathFinder::find_path) and the results are joined. The checkpoints
	/// between the segments appear once in the result.
	///
	/// - fewer than 2 checkpoints: an empty Path, [`PathStatus::Degenerate`]
	/// - consecutive checkpoints within the same cell are skipped
	/// - if any segment is [`PathStatus::Unreachable`], so is the result (an empty Path)
	/// - otherwise the status is the first status among the segments that is not
	/// [`PathStatus::Found`]
	pub fn find_path_by_checkpoints<T, B>(
		&mut self,
		checkpoints: &[Vec3],
		terrain: &T,
		bounds: &B,
	) -> Path
	where
		T: TerrainSampler + ?Sized,
		B: Bounds + ?Sized,
	{
		match checkpoints {
			[] | [_] => Path::empty(PathStatus::Degenerate),
			[start, end] => self.find_path(*start, *end, terrain, bounds),
			_ => {
				let segments = checkpoints
					.windows(2)
					.map(|pair| self.find_path(pair[0], pair[1], terrain, bounds))
					.collect();
				join_segments(segments)
			}
		}
	}

	/// Same as [`find_path_by_checkpoints`](PathFinder::find_path_by_checkpoints), but the
	/// segments are searched in parallel.
	///
	/// Segments are looked up in the cache without affecting its recency. Fresh results are
	/// added to the cache once all searches are done.
	#[cfg(feature = "parallel")]
	pub fn par_find_path_by_checkpoints<T, B>(
		&mut self,
		checkpoints: &[Vec3],
		terrain: &T,
		bounds: &B,
	) -> Path
	where
		M: Sync,
		T: TerrainSampler + Sync + ?Sized,
		B: Bounds + Sync + ?Sized,
	{
		if checkpoints.len() < 2 {
			return Path::empty(PathStatus::Degenerate);
		}

		let this = &*self;
		let segments: Vec<(EndpointKey, Path, bool)> = checkpoints
			.par_windows(2)
			.map(|pair| {
				let key = Self::endpoint_key(pair[0], pair[1]);
				if this.settings.use_cache && !this.is_degenerate(pair[0], pair[1]) {
					let cached = this.cache.peek(&key);
					if let Some(path) =
						cached.and_then(|path| this.reanchor(&path, pair[0], pair[1], bounds))
					{
						return (key, path, false);
					}
				}
				(key, this.plan(pair[0], pair[1], terrain, bounds), true)
			})
			.collect();

		let mut paths = Vec::with_capacity(segments.len());
		for (key, path, fresh) in segments {
			if fresh {
				self.remember(key, &path);
			}
			paths.push(path);
		}
		join_segments(paths)
	}
}

impl PathFinder<Astar> {
	/// Creates a PathFinder running plain A*
	pub fn astar(settings: PathFindingSettings) -> Result<PathFinder<Astar>, Error> {
		PathFinder::new(Astar, settings)
	}
}

impl PathFinder<AstarDirectional> {
	/// Creates a PathFinder running A* with a turning cost
	pub fn directional(
		settings: PathFindingSettings,
	) -> Result<PathFinder<AstarDirectional>, Error> {
		PathFinder::new(AstarDirectional, settings)
	}
}

impl PathFinder<Dijkstra> {
	/// Creates a PathFinder running Dijkstra's Algorithm
	pub fn dijkstra(settings: PathFindingSettings) -> Result<PathFinder<Dijkstra>, Error> {
		PathFinder::new(Dijkstra, settings)
	}
}

fn join_segments(segments: Vec<Path>) -> Path {
	if segments
		.iter()
		.any(|path| path.status() == PathStatus::Unreachable)
	{
		return Path::empty(PathStatus::Unreachable);
	}
	let segments = segments
		.into_iter()
		.filter(|path| path.status() != PathStatus::Degenerate)
		.collect();
	Path::concat(segments)
}
