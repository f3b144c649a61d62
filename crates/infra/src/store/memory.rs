//! Shared building block of the in-memory adapters: a lock-protected table
//! with a monotonic id sequence.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::StoreError;

#[derive(Debug)]
pub struct TableState<V> {
    pub rows: BTreeMap<u64, V>,
    last_id: u64,
}

impl<V> TableState<V> {
    /// Reserve the next id. Ids are never reused, even after deletes.
    pub fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug)]
pub struct Table<V> {
    inner: RwLock<TableState<V>>,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(TableState {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

impl<V> Table<V> {
    pub fn read(&self) -> Result<RwLockReadGuard<'_, TableState<V>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, TableState<V>>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl<V: Clone> Table<V> {
    pub fn get(&self, id: u64) -> Result<Option<V>, StoreError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    pub fn filter(&self, predicate: &dyn Fn(&V) -> bool) -> Result<Vec<V>, StoreError> {
        Ok(self.read()?.rows.values().filter(|v| predicate(v)).cloned().collect())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn ids_are_monotonic_and_not_reused() {
        let table: Table<&str> = Table::default();
        let mut state = table.write().unwrap();
        let a = state.next_id();
        state.rows.insert(a, "a");
        state.rows.remove(&a);
        let b = state.next_id();
        assert_eq!((a, b), (1, 2));
    }

    #[test]
    fn filter_returns_matching_rows_in_id_order() {
        let table: Table<u32> = Table::default();
        {
            let mut state = table.write().unwrap();
            for v in [5, 2, 8] {
                let id = state.next_id();
                state.rows.insert(id, v);
            }
        }
        assert_eq!(table.filter(&|v| *v > 3).unwrap(), vec![5, 8]);
        assert_eq!(table.len().unwrap(), 3);
    }

    proptest! {
        #[test]
        fn ids_stay_unique_under_inserts_and_deletes(ops in prop::collection::vec(any::<bool>(), 1..60)) {
            let table: Table<()> = Table::default();
            let mut state = table.write().unwrap();
            let mut issued = Vec::new();
            for insert in ops {
                if insert || state.rows.is_empty() {
                    let id = state.next_id();
                    prop_assert!(!issued.contains(&id));
                    issued.push(id);
                    state.rows.insert(id, ());
                } else {
                    let last = state.rows.keys().next_back().copied();
                    if let Some(last) = last {
                        state.rows.remove(&last);
                    }
                }
            }
            prop_assert!(issued.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
