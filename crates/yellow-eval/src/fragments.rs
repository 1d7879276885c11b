//! Memory fragments kept by `remember` and retrieved by `manifest`.

use crate::value::Value;
use std::collections::{BTreeMap, VecDeque};

/// Bounded history of remembered values, per name.
///
/// Fragments outlive `forget` and scope exits; only an engine reset clears them.
#[derive(Debug, Clone, Default)]
pub struct Fragments {
    by_name: BTreeMap<String, VecDeque<Value>>,
}

impl Fragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `name`, keeping at most `capacity` fragments
    /// and evicting the oldest first.
    pub fn remember(&mut self, name: &str, value: Value, capacity: usize) {
        if capacity == 0 {
            return;
        }
        let queue = self.by_name.entry(name.to_string()).or_default();
        queue.push_back(value);
        while queue.len() > capacity {
            queue.pop_front();
        }
    }

    /// Take the newest fragment of `name`.
    pub fn manifest(&mut self, name: &str) -> Option<Value> {
        let queue = self.by_name.get_mut(name)?;
        let value = queue.pop_back();
        if queue.is_empty() {
            self.by_name.remove(name);
        }
        value
    }

    pub fn count(&self, name: &str) -> usize {
        self.by_name.get(name).map_or(0, VecDeque::len)
    }

    pub fn clear(&mut self) {
        self.by_name.clear();
    }
}
