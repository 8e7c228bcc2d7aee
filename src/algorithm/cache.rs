use crate::{node::CellKey, Path};
use hashbrown::HashMap;

/// The endpoints a cached Path was searched for
pub(crate) type EndpointKey = (CellKey, CellKey);

/// Remembers search results by their endpoints, dropping the least recently used entry once
/// `capacity` is exceeded.
#[derive(Clone, Debug)]
pub(crate) struct PathResultCache {
	entries: HashMap<EndpointKey, (Path, u64)>,
	capacity: usize,
	clock: u64,
}

impl PathResultCache {
	pub fn new(capacity: usize) -> Self {
		Self {
			entries: HashMap::new(),
			capacity,
			clock: 0,
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns the cached Path and marks it as recently used
	pub fn get(&mut self, key: &EndpointKey) -> Option<Path> {
		self.clock += 1;
		let clock = self.clock;
		self.entries.get_mut(key).map(|(path, used)| {
			*used = clock;
			path.clone()
		})
	}

	/// Returns the cached Path without touching its recency
	#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
	pub fn peek(&self, key: &EndpointKey) -> Option<Path> {
		self.entries.get(key).map(|(path, _)| path.clone())
	}

	pub fn insert(&mut self, key: EndpointKey, path: Path) {
		if self.capacity == 0 {
			return;
		}
		self.clock += 1;
		if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
			self.evict();
		}
		self.entries.insert(key, (path, self.clock));
	}

	fn evict(&mut self) {
		let oldest = self
			.entries
			.iter()
			.min_by_key(|(_, (_, used))| *used)
			.map(|(key, _)| *key);
		if let Some(key) = oldest {
			log_trace!("evicting cached path {:?} -> {:?}", key.0, key.1);
			self.entries.remove(&key);
		}
	}

	/// Changes the capacity, evicting entries if there are now too many
	pub fn set_capacity(&mut self, capacity: usize) {
		self.capacity = capacity;
		while self.entries.len() > self.capacity {
			self.evict();
		}
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}
}
