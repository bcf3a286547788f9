use std::{collections::HashMap, hash::Hash, sync::Arc};

use tokio::sync::Mutex;
use tracing::trace;

/// A fixed-capacity cache with least-recently-used eviction.
///
/// `get` and `put` are both O(1) and both count as a use. Values are
/// handed out as `Arc`s, so an evicted value stays alive for as long
/// as some caller still holds it.
///
/// All operations go through one internal lock, so the cache may be
/// shared freely between tasks.
pub struct LruCache<K, V> {
    capacity: usize,
    inner: Mutex<Inner<K, V>>,
}

type SlotId = usize;

/// Sentinel slots anchoring the recency list. `HEAD.next` is the most
/// recently used entry, `TAIL.prev` the least.
const HEAD: SlotId = 0;
const TAIL: SlotId = 1;

/// The recency list, laid out as a slot arena. Links are slot indexes
/// instead of pointers, so no unsafe is needed for the doubly-linked
/// structure.
struct Inner<K, V> {
    index: HashMap<K, SlotId>,
    slots: Vec<Slot<K, V>>,
    free: Vec<SlotId>,
}

struct Slot<K, V> {
    entry: Option<(K, Arc<V>)>,
    prev: SlotId,
    next: SlotId,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
    /// Creates a new cache which holds up to `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> LruCache<K, V> {
        assert!(capacity >= 1, "cache capacity must be at least 1");
        let slots = vec![
            Slot {
                entry: None,
                prev: HEAD,
                next: TAIL,
            },
            Slot {
                entry: None,
                prev: HEAD,
                next: TAIL,
            },
        ];
        LruCache {
            capacity,
            inner: Mutex::new(Inner {
                index: HashMap::with_capacity(capacity),
                slots,
                free: Vec::new(),
            }),
        }
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.index.len()
    }

    /// Returns whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns the value cached under the given key, marking it as the
    /// most recently used.
    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut inner = self.inner.lock().await;
        let slot = *inner.index.get(key)?;
        inner.unlink(slot);
        inner.push_front(slot);
        inner.slots[slot].entry.as_ref().map(|(_, value)| Arc::clone(value))
    }

    /// Caches a value under the given key, marking it as the most
    /// recently used.
    ///
    /// A put over an existing key replaces its value. A put of a new
    /// key into a full cache first evicts the least recently used
    /// entry.
    pub async fn put(&self, key: K, value: V) {
        let value = Arc::new(value);
        let mut inner = self.inner.lock().await;

        if let Some(&slot) = inner.index.get(&key) {
            inner.slots[slot].entry = Some((key, value));
            inner.unlink(slot);
            inner.push_front(slot);
            return;
        }

        if inner.index.len() == self.capacity {
            let victim = inner.slots[TAIL].prev;
            debug_assert_ne!(victim, HEAD);
            if let Some((victim_key, _)) = inner.slots[victim].entry.take() {
                trace!("evicting least recently used entry");
                inner.index.remove(&victim_key);
            }
            inner.unlink(victim);
            inner.free.push(victim);
        }

        let slot = match inner.free.pop() {
            Some(slot) => slot,
            None => {
                inner.slots.push(Slot {
                    entry: None,
                    prev: HEAD,
                    next: TAIL,
                });
                inner.slots.len() - 1
            }
        };
        inner.index.insert(key.clone(), slot);
        inner.slots[slot].entry = Some((key, value));
        inner.push_front(slot);
        debug_assert!(inner.index.len() <= self.capacity);
    }
}

impl<K, V> Inner<K, V> {
    /// Detaches the slot from the recency list.
    fn unlink(&mut self, slot: SlotId) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    /// Attaches the slot right after the head sentinel.
    fn push_front(&mut self, slot: SlotId) {
        let first = self.slots[HEAD].next;
        self.slots[slot].prev = HEAD;
        self.slots[slot].next = first;
        self.slots[first].prev = slot;
        self.slots[HEAD].next = slot;
    }
}
