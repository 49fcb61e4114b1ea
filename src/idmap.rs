use ahash::HashMap;

pub(crate) trait IdIndex<T> {
    fn to_id(index: usize) -> T;
    fn from_id(id: T) -> usize;
}

/// Interning table: values are stored once and addressed by a small
/// copyable id. Lookup by value and by id are both O(1).
pub(crate) struct IdMap<K: Copy + IdIndex<K>, V: Eq + std::hash::Hash + Clone> {
    by_id: Vec<V>,
    by_value: HashMap<V, K>,
}

impl<K: Copy + IdIndex<K>, V: Eq + std::hash::Hash + Clone> IdMap<K, V> {
    pub(crate) fn new() -> Self {
        IdMap {
            by_id: Vec::new(),
            by_value: HashMap::default(),
        }
    }

    /// Intern a value, returning the existing id if already present.
    pub(crate) fn intern(&mut self, value: V) -> K {
        if let Some(id) = self.by_value.get(&value) {
            *id
        } else {
            let id = K::to_id(self.by_id.len());
            self.by_value.insert(value.clone(), id);
            self.by_id.push(value);
            id
        }
    }

    pub(crate) fn lookup(&self, value: &V) -> Option<K> {
        self.by_value.get(value).copied()
    }

    #[inline]
    pub(crate) fn resolve(&self, id: K) -> &V {
        &self.by_id[K::from_id(id)]
    }
}
