//! Keyed memoization with single-flight initialization.
//!
//! The map lock is held only long enough to fetch (or insert) the per-key cell; the value is
//! computed outside it, so distinct keys initialize in parallel while concurrent requests
//! for the same key block on that key's cell and observe one computation. Failed
//! initializations are not stored and the next request retries.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

#[derive(Debug)]
pub struct SingleFlight<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for SingleFlight<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `key`, running `init` if no value is stored yet.
    pub fn get_or_try_init<E>(&self, key: &K, init: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        let cell = {
            let mut cells = self.cells.lock();
            match cells.get(key) {
                Some(cell) => Arc::clone(cell),
                None => {
                    let cell = Arc::new(OnceCell::new());
                    cells.insert(key.clone(), Arc::clone(&cell));
                    cell
                }
            }
        };
        cell.get_or_try_init(init).cloned()
    }

    /// Number of keys holding an initialized value.
    pub fn len(&self) -> usize {
        self.cells
            .lock()
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }
}
