//! Agent memory placeholder: an append-only history kept in process memory.
//! A SQLite or vector-backed store can replace it without changing callers.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryItem {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct AgentMemory {
    history: Vec<MemoryItem>,
}

impl AgentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, role: impl Into<String>, content: impl Into<String>) {
        self.history.push(MemoryItem {
            role: role.into(),
            content: content.into(),
        });
    }

    /// The last `n` items in insertion order (fewer if the history is shorter).
    pub fn last_n(&self, n: usize) -> &[MemoryItem] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// The last [`DEFAULT_HISTORY_WINDOW`] items.
    pub fn recent(&self) -> &[MemoryItem] {
        self.last_n(DEFAULT_HISTORY_WINDOW)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_n_keeps_order() {
        let mut memory = AgentMemory::new();
        memory.add("user", "a");
        memory.add("assistant", "b");
        memory.add("user", "c");

        let last: Vec<&str> = memory.last_n(2).iter().map(|m| m.content.as_str()).collect();
        assert_eq!(last, vec!["b", "c"]);
        assert_eq!(memory.last_n(10).len(), 3);
        assert!(memory.last_n(0).is_empty());
    }

    #[test]
    fn test_recent_window() {
        let mut memory = AgentMemory::new();
        for i in 0..15 {
            memory.add("user", i.to_string());
        }
        assert_eq!(memory.recent().len(), DEFAULT_HISTORY_WINDOW);
        assert_eq!(memory.recent()[0].content, "5");
    }
}
