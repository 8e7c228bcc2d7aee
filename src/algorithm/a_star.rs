use super::node_list::{NodeId, NodeList, NodeState};
use super::PathFinder;
use crate::{
	cost::CostModel,
	terrain::{Bounds, TerrainSampler},
	Cost, Node, Path, PathStatus,
};
use glam::Vec2;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An entry of the frontier. Ordered so that the [`BinaryHeap`] pops the lowest `f`, then the
/// lowest `h`, then the oldest Node.
#[derive(Clone, Copy, Debug)]
struct HeuristicElement {
	id: NodeId,
	g: Cost,
	h: Cost,
}

impl HeuristicElement {
	fn f(&self) -> Cost {
		self.g + self.h
	}
}

impl PartialEq for HeuristicElement {
	fn eq(&self, rhs: &Self) -> bool {
		self.cmp(rhs) == Ordering::Equal
	}
}
impl Eq for HeuristicElement {}
impl PartialOrd for HeuristicElement {
	fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
		Some(self.cmp(rhs))
	}
}
impl Ord for HeuristicElement {
	fn cmp(&self, rhs: &Self) -> Ordering {
		rhs.f()
			.total_cmp(&self.f())
			.then_with(|| rhs.h.total_cmp(&self.h))
			.then_with(|| rhs.id.cmp(&self.id))
	}
}

/// The direction in which `id` was entered: from its parent, or the Node's own direction for
/// the root of the search
fn heading(nodes: &NodeList, id: NodeId) -> Vec2 {
	let node = &nodes[id].node;
	match nodes[id].parent {
		Some(parent) => nodes[parent].node.direction_to(node),
		None => node.direction(),
	}
}

/// Runs the best-first search from `start` to `end`. Both Nodes must already be legal.
pub(super) fn a_star_search<M, T, B>(
	finder: &PathFinder<M>,
	start: Node,
	end: Node,
	terrain: &T,
	bounds: &B,
) -> Path
where
	M: CostModel,
	T: TerrainSampler + ?Sized,
	B: Bounds + ?Sized,
{
	let settings = finder.settings();
	let model = finder.model();

	let size_hint = settings.max_iterations.min(4096);
	let mut nodes = NodeList::with_capacity(size_hint);
	let mut next = BinaryHeap::with_capacity(size_hint / 2);
	let mut explored = Vec::with_capacity(size_hint);

	let start_id = nodes.add_node(start);
	{
		let root = &mut nodes[start_id];
		root.h = model.heuristic(&root.node, &end, settings);
		root.state = NodeState::Open;
		next.push(HeuristicElement {
			id: start_id,
			g: 0.0,
			h: root.h,
		});
	}

	while let Some(HeuristicElement { id: current_id, g, .. }) = next.pop() {
		let current = &nodes[current_id];
		// stale entry of a Node that was re-queued with a lower cost
		if current.state != NodeState::Open || g > current.g {
			continue;
		}
		nodes[current_id].state = NodeState::Explored;
		explored.push(current_id);

		let reached = nodes[current_id].node.collision(&end);
		if reached || explored.len() >= settings.max_iterations {
			let status = if reached {
				PathStatus::Found
			} else {
				PathStatus::BudgetExhausted
			};
			return finish(finder, &nodes, current_id, end, &explored, status);
		}

		let current_heading = heading(&nodes, current_id);
		let neighbours = match nodes[current_id].neighbours.take() {
			Some(neighbours) => neighbours,
			None => finder.create_neighbours(&mut nodes, current_id, current_heading, terrain, bounds),
		};

		let current_cost = nodes[current_id].g;
		for &other_id in neighbours.iter() {
			let other = &nodes[other_id];
			if other.state == NodeState::Explored || !other.node.is_legal() {
				continue;
			}
			let other_cost = current_cost
				+ model.cost(
					&nodes[current_id].node,
					current_heading,
					&other.node,
					settings,
				);

			if other.state == NodeState::Unvisited || other_cost < other.g {
				let h = model.heuristic(&other.node, &end, settings);
				let other = &mut nodes[other_id];
				other.g = other_cost;
				other.h = h;
				other.parent = Some(current_id);
				other.state = NodeState::Open;
				next.push(HeuristicElement {
					id: other_id,
					g: other_cost,
					h,
				});
			}
		}
		nodes[current_id].neighbours = Some(neighbours);
	}

	log_debug!(
		"no path from {} to {} after exploring {} nodes",
		start,
		end,
		explored.len()
	);
	Path::empty(PathStatus::Unreachable)
}

/// Connects `end` to the parent of `current` and walks back to the start.
///
/// `current` is only close to the goal, so the goal itself takes its place. If `current` is the
/// start of the search (iteration budget of 1, or a goal right next to the start), there is no
/// parent and the goal is connected to `current` directly.
fn finish<M: CostModel>(
	finder: &PathFinder<M>,
	nodes: &NodeList,
	current_id: NodeId,
	end: Node,
	explored: &[NodeId],
	status: PathStatus,
) -> Path {
	let settings = finder.settings();
	let anchor = nodes[current_id].parent.unwrap_or(current_id);
	let anchor_node = &nodes[anchor].node;
	let end_cost = nodes[anchor].g
		+ finder
			.model()
			.cost(anchor_node, heading(nodes, anchor), &end, settings);

	let mut steps: Vec<(Node, Cost)> = nodes
		.ancestors(anchor)
		.map(|id| (nodes[id].node, nodes[id].g))
		.collect();
	steps.reverse();
	steps.push((end, end_cost));

	let mut path_nodes = Vec::with_capacity(steps.len());
	let mut costs = Vec::with_capacity(steps.len());
	for (i, (node, cost)) in steps.iter().enumerate() {
		let node = match i {
			0 => *node,
			_ => node.with_direction(steps[i - 1].0.direction_to(node)),
		};
		path_nodes.push(node);
		costs.push(*cost);
	}

	let explored_nodes = explored.iter().map(|&id| nodes[id].node).collect();
	let open_nodes = nodes
		.iter()
		.filter(|(_, entry)| entry.state == NodeState::Open)
		.map(|(_, entry)| entry.node)
		.collect();

	log_debug!(
		"{:?} path of {} nodes ending at f = {:.2}, explored {}, frontier {}, sampled {}",
		status,
		path_nodes.len(),
		nodes[current_id].f(),
		explored.len(),
		nodes.iter().filter(|(_, e)| e.state == NodeState::Open).count(),
		nodes.len()
	);

	Path::new(path_nodes, costs, status).with_snapshots(explored_nodes, open_nodes)
}
