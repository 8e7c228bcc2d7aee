use crate::{node::CellKey, Cost, Node};
use hashbrown::HashMap;

/// Index of a Node within a single search
pub(crate) type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeState {
	Unvisited,
	Open,
	Explored,
}

/// A Node together with everything a search knows about it
#[derive(Clone, Debug)]
pub(crate) struct SearchNode {
	pub node: Node,
	pub g: Cost,
	pub h: Cost,
	pub parent: Option<NodeId>,
	pub state: NodeState,
	pub neighbours: Option<Vec<NodeId>>,
}

impl SearchNode {
	fn new(node: Node) -> SearchNode {
		SearchNode {
			node,
			g: 0.0,
			h: 0.0,
			parent: None,
			state: NodeState::Unvisited,
			neighbours: None,
		}
	}

	pub fn f(&self) -> Cost {
		self.g + self.h
	}
}

/// The scratch space of one search.
///
/// Owns every Node the search creates and makes sure that a cell is represented by exactly one
/// of them: looking up a cell that was already sampled returns the existing entry, so cost
/// updates always converge onto the same [`SearchNode`].
#[derive(Clone, Debug)]
pub(crate) struct NodeList {
	nodes: slab::Slab<SearchNode>,
	pos_map: HashMap<CellKey, NodeId>,
}

impl NodeList {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			nodes: slab::Slab::with_capacity(capacity),
			pos_map: HashMap::with_capacity(capacity),
		}
	}

	pub fn len(&self) -> usize {
		self.pos_map.len()
	}

	/// Adds `node`, or returns the id of the Node already occupying its cell
	pub fn add_node(&mut self, node: Node) -> NodeId {
		if let Some(id) = self.id_at(node.key()) {
			return id;
		}
		let id = self.nodes.insert(SearchNode::new(node));
		self.pos_map.insert(node.key(), id);
		id
	}

	pub fn id_at(&self, key: CellKey) -> Option<NodeId> {
		self.pos_map.get(&key).copied()
	}

	pub fn iter(&self) -> slab::Iter<'_, SearchNode> {
		self.nodes.iter()
	}

	/// Walks the parent links from `id` back to the root of the search
	pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
		Ancestors {
			list: self,
			next: Some(id),
		}
	}
}

pub(crate) struct Ancestors<'a> {
	list: &'a NodeList,
	next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
	type Item = NodeId;
	fn next(&mut self) -> Option<NodeId> {
		let current = self.next?;
		self.next = self.list[current].parent;
		Some(current)
	}
}

use std::ops::{Index, IndexMut};
impl Index<NodeId> for NodeList {
	type Output = SearchNode;
	#[track_caller]
	fn index(&self, index: NodeId) -> &SearchNode {
		&self.nodes[index]
	}
}
impl IndexMut<NodeId> for NodeList {
	#[track_caller]
	fn index_mut(&mut self, index: NodeId) -> &mut SearchNode {
		&mut self.nodes[index]
	}
}
