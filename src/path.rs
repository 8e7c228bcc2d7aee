use crate::{terrain::TerrainBounds, Cost, Node};
use glam::{Vec2, Vec3};

#[cfg(any(not(target_arch = "wasm32"), feature = "parallel"))]
use std::sync::Arc;

#[cfg(all(target_arch = "wasm32", not(feature = "parallel")))]
use std::rc::Rc as Arc;

/// How a [`Path`] came to be
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStatus {
	/// The search reached the goal
	Found,
	/// The search ran into `max_iterations` and connected the goal to the best candidate so far
	BudgetExhausted,
	/// An endpoint is illegal, so no search was possible. The Path is the straight connection
	/// of start and goal. It is up to the caller to decide whether that is usable.
	Direct,
	/// Start and goal are the same location. The Path is empty.
	Degenerate,
	/// Every legal Node reachable from the start was explored without reaching the goal.
	/// The Path is empty.
	Unreachable,
}

impl PathStatus {
	/// `true` for the statuses that are produced by an actual search
	pub fn is_searched(self) -> bool {
		matches!(self, PathStatus::Found | PathStatus::BudgetExhausted)
	}
}

/// A sequence of waypoints from a start to an end.
///
/// Paths are immutable once built. Cloning is cheap, since the Nodes are shared.
///
/// Besides the waypoints, a Path returned by a search carries the Nodes that search explored
/// and the ones still on its frontier when it ended. They are intended for visualizing and
/// debugging a search and are empty for Paths built any other way.
#[derive(Debug, Clone)]
pub struct Path {
	nodes: Arc<[Node]>,
	costs: Arc<[Cost]>,
	explored: Arc<[Node]>,
	open: Arc<[Node]>,
	status: PathStatus,
}

impl Path {
	/// Creates a Path without Nodes
	pub fn empty(status: PathStatus) -> Path {
		Path {
			nodes: Arc::from(Vec::new()),
			costs: Arc::from(Vec::new()),
			explored: Arc::from(Vec::new()),
			open: Arc::from(Vec::new()),
			status,
		}
	}

	/// Creates the straight two-Node connection used when an endpoint is illegal
	pub fn direct(start: Node, end: Node) -> Path {
		let end = end.with_direction(start.direction_to(&end));
		Path::new(
			vec![start, end],
			vec![0.0, start.distance_3d(&end)],
			PathStatus::Direct,
		)
	}

	/// Wraps a sequence of Nodes. The cost of each Node is the 3D distance travelled to reach it.
	///
	/// ## Examples
	/// ```
	/// # use terrain_pathfinding::{Path, Node, glam::Vec3};
	/// let path = Path::from_nodes(vec![
	/// 	Node::new(Vec3::new(0.0, 0.0, 0.0)),
	/// 	Node::new(Vec3::new(3.0, 0.0, 4.0)),
	/// 	Node::new(Vec3::new(3.0, 2.0, 4.0)),
	/// ]);
	///
	/// assert_eq!(path.length(), 7.0);
	/// assert_eq!(path.costs(), &[0.0, 5.0, 7.0]);
	/// ```
	pub fn from_nodes(nodes: Vec<Node>) -> Path {
		let mut costs = Vec::with_capacity(nodes.len());
		let mut total = 0.0;
		for (i, node) in nodes.iter().enumerate() {
			if i > 0 {
				total += nodes[i - 1].distance_3d(node);
			}
			costs.push(total);
		}
		let status = if nodes.is_empty() {
			PathStatus::Degenerate
		} else {
			PathStatus::Found
		};
		Path::new(nodes, costs, status)
	}

	pub(crate) fn new(nodes: Vec<Node>, costs: Vec<Cost>, status: PathStatus) -> Path {
		debug_assert_eq!(nodes.len(), costs.len());
		Path {
			nodes: nodes.into(),
			costs: costs.into(),
			explored: Arc::from(Vec::new()),
			open: Arc::from(Vec::new()),
			status,
		}
	}

	pub(crate) fn with_snapshots(mut self, explored: Vec<Node>, open: Vec<Node>) -> Path {
		self.explored = explored.into();
		self.open = open.into();
		self
	}

	/// Replaces the first and last Node and recalculates the costs with `step_cost`, which
	/// receives the heading of the Node a step starts from.
	///
	/// The snapshots and the status are kept. Paths with fewer than 2 Nodes are returned as they
	/// are.
	pub(crate) fn with_endpoints(
		&self,
		start: Node,
		end: Node,
		mut step_cost: impl FnMut(&Node, Vec2, &Node) -> Cost,
	) -> Path {
		if self.nodes.len() < 2 {
			return self.clone();
		}
		let mut nodes = self.nodes.to_vec();
		let last = nodes.len() - 1;
		nodes[0] = start;
		nodes[last] = end;
		nodes[1] = nodes[1].with_direction(nodes[0].direction_to(&nodes[1]));
		nodes[last] = nodes[last].with_direction(nodes[last - 1].direction_to(&nodes[last]));

		let mut costs = Vec::with_capacity(nodes.len());
		costs.push(0.0);
		for i in 1..nodes.len() {
			let heading = nodes[i - 1].direction();
			costs.push(costs[i - 1] + step_cost(&nodes[i - 1], heading, &nodes[i]));
		}

		Path {
			nodes: nodes.into(),
			costs: costs.into(),
			explored: self.explored.clone(),
			open: self.open.clone(),
			status: self.status,
		}
	}

	/// How this Path was produced
	pub fn status(&self) -> PathStatus {
		self.status
	}

	/// The number of Nodes in the Path
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Same as [`len`](Path::len)
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// `true` if the Path has no Nodes
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// The first Node
	pub fn start(&self) -> Option<&Node> {
		self.nodes.first()
	}

	/// The last Node. For searched Paths this is exactly the requested goal.
	pub fn end(&self) -> Option<&Node> {
		self.nodes.last()
	}

	/// The Nodes from start to end
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// The accumulated cost of reaching each Node, in the same order as [`nodes`](Path::nodes)
	pub fn costs(&self) -> &[Cost] {
		&self.costs
	}

	/// The cost of the whole Path
	pub fn cost(&self) -> Cost {
		self.costs.last().copied().unwrap_or(0.0)
	}

	/// The sum of the world-space distances between consecutive Nodes
	pub fn length(&self) -> f32 {
		self.nodes
			.windows(2)
			.map(|pair| pair[0].distance_3d(&pair[1]))
			.sum()
	}

	/// The world positions of all Nodes
	pub fn world_points(&self) -> Vec<Vec3> {
		self.nodes.iter().map(Node::position).collect()
	}

	/// The horizontal positions of all Nodes, mapped into `[0, 1]²` relative to `extent`.
	///
	/// See [`TerrainBounds::normalize`].
	pub fn normalized_points(&self, extent: &TerrainBounds) -> Vec<Vec2> {
		self.nodes
			.iter()
			.map(|node| extent.normalize(node.position()))
			.collect()
	}

	/// The Nodes the search expanded, in the order they were expanded
	pub fn explored_nodes(&self) -> &[Node] {
		&self.explored
	}

	/// The Nodes that were still waiting on the frontier when the search ended
	pub fn open_nodes(&self) -> &[Node] {
		&self.open
	}

	/// Returns an Iterator over the Nodes of the Path
	pub fn iter(&self) -> std::slice::Iter<'_, Node> {
		self.nodes.iter()
	}

	/// Joins consecutive segments into one Path.
	///
	/// A Node shared by the end of one segment and the start of the next appears once, and the
	/// costs of every segment continue from the total of the previous ones. The status is the
	/// first non-`Found` status among the segments.
	pub(crate) fn concat(paths: Vec<Path>) -> Path {
		let mut nodes: Vec<Node> = Vec::new();
		let mut costs: Vec<Cost> = Vec::new();
		let mut explored = Vec::new();
		let mut open = Vec::new();
		let mut status = PathStatus::Found;

		for path in paths {
			if status == PathStatus::Found && path.status != PathStatus::Found {
				status = path.status;
			}
			let offset = costs.last().copied().unwrap_or(0.0);
			let skip = match (nodes.last(), path.start()) {
				(Some(last), Some(first)) if last == first => 1,
				_ => 0,
			};
			nodes.extend(path.nodes.iter().skip(skip).copied());
			costs.extend(path.costs.iter().skip(skip).map(|cost| cost + offset));
			explored.extend(path.explored.iter().copied());
			open.extend(path.open.iter().copied());
		}

		if nodes.is_empty() {
			return Path::empty(PathStatus::Degenerate);
		}
		Path::new(nodes, costs, status).with_snapshots(explored, open)
	}
}

impl std::ops::Index<usize> for Path {
	type Output = Node;
	fn index(&self, index: usize) -> &Node {
		&self.nodes[index]
	}
}

impl<'a> IntoIterator for &'a Path {
	type Item = &'a Node;
	type IntoIter = std::slice::Iter<'a, Node>;
	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl PartialEq for Path {
	/// Two Paths are equal if they visit the same cells in the same order with the same status
	fn eq(&self, other: &Path) -> bool {
		self.status == other.status && self.nodes == other.nodes
	}
}

use std::fmt;
impl fmt::Display for Path {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		write!(fmt, "Path[Cost = {:.2}]: ", self.cost())?;
		if self.nodes.is_empty() {
			write!(fmt, "<empty>")
		} else {
			write!(fmt, "{}", self.nodes[0])?;
			for node in self.nodes.iter().skip(1) {
				write!(fmt, " -> {}", node)?;
			}
			Ok(())
		}
	}
}
