//! Outcome ledgers keyed by task id.

use indexmap::IndexMap;

use super::task::TaskId;

/// Final outcomes recorded by the scheduler, in the order they were recorded.
#[derive(Debug, Clone)]
pub struct Ledger<V> {
    entries: IndexMap<TaskId, V>,
}

impl<V> Ledger<V> {
    /// Create an empty ledger.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Record `value` for `id`.
    ///
    /// Each id is recorded at most once; a second record for the same id
    /// would break the scheduler's partition of ids.
    pub(crate) fn record(
        &mut self,
        id: TaskId,
        value: V,
    ) {
        let previous = self.entries.insert(id, value);
        debug_assert!(previous.is_none(), "{} recorded twice", id);
    }

    /// Look up the value recorded for `id`.
    #[inline]
    pub fn get(
        &self,
        id: TaskId,
    ) -> Option<&V> {
        self.entries.get(&id)
    }

    /// Whether `id` has an entry.
    #[inline]
    pub fn contains(
        &self,
        id: TaskId,
    ) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of recorded entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded ids, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.entries.keys().copied()
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &V)> + '_ {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    /// Remove and return the value for `id`.
    pub fn take(
        &mut self,
        id: TaskId,
    ) -> Option<V> {
        self.entries.shift_remove(&id)
    }
}

impl<V> Default for Ledger<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IntoIterator for Ledger<V> {
    type Item = (TaskId, V);
    type IntoIter = indexmap::map::IntoIter<TaskId, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
