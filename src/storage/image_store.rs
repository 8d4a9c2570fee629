use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;
use chrono::{DateTime, Utc};

pub const PNG_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub key: String,
    pub collection: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
    pub created_at: DateTime<Utc>,
}

/// Key-value storage for generated images.
///
/// Keys are unique across collections. Listing and positional deletion
/// follow insertion order within one collection.
pub trait ImageStore: Send + Sync {
    /// Stores PNG bytes and returns the key they are retrievable under.
    fn put(&self, collection: &str, bytes: Bytes) -> String;

    fn get(&self, key: &str) -> Option<StoredImage>;

    fn remove(&self, key: &str) -> bool;

    /// Keys of one collection in insertion order.
    fn keys(&self, collection: &str) -> Vec<String>;

    /// Every collection with its keys in insertion order.
    fn collections(&self) -> BTreeMap<String, Vec<String>>;

    /// Removes the keys at positions `start..=end` of `collection`, clipped to
    /// the collection length, and returns them.
    fn delete_range(&self, collection: &str, start: usize, end: usize) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn image_path(key: &str) -> String {
    format!("/image/{}", key)
}

#[derive(Debug, Default)]
struct Entries {
    next_id: u64,
    by_id: BTreeMap<u64, StoredImage>,
    ids: HashMap<String, u64>,
}

impl Entries {
    fn remove_key(&mut self, key: &str) -> bool {
        match self.ids.remove(key) {
            Some(id) => self.by_id.remove(&id).is_some(),
            None => false,
        }
    }
}

/// Process-local store. One mutex guards the map and the key counter, so
/// concurrent requests never hand out the same key.
#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    entries: Mutex<Entries>,
    capacity: Option<usize>,
}

impl InMemoryImageStore {
    /// `capacity` bounds the total number of entries; the oldest entry is
    /// evicted first once it is reached.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            capacity: capacity.filter(|c| *c > 0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ImageStore for InMemoryImageStore {
    fn put(&self, collection: &str, bytes: Bytes) -> String {
        let mut entries = self.lock();

        if let Some(capacity) = self.capacity {
            while entries.by_id.len() >= capacity {
                let Some((_, oldest)) = entries.by_id.pop_first() else {
                    break;
                };
                entries.ids.remove(&oldest.key);
                tracing::info!(key = %oldest.key, capacity, "Evicted oldest image");
            }
        }

        entries.next_id += 1;
        let id = entries.next_id;
        let key = format!("image_{}.png", id);
        entries.ids.insert(key.clone(), id);
        entries.by_id.insert(
            id,
            StoredImage {
                key: key.clone(),
                collection: collection.to_string(),
                content_type: PNG_CONTENT_TYPE,
                bytes,
                created_at: Utc::now(),
            },
        );
        key
    }

    fn get(&self, key: &str) -> Option<StoredImage> {
        let entries = self.lock();
        let id = entries.ids.get(key)?;
        entries.by_id.get(id).cloned()
    }

    fn remove(&self, key: &str) -> bool {
        self.lock().remove_key(key)
    }

    fn keys(&self, collection: &str) -> Vec<String> {
        self.lock()
            .by_id
            .values()
            .filter(|img| img.collection == collection)
            .map(|img| img.key.clone())
            .collect()
    }

    fn collections(&self) -> BTreeMap<String, Vec<String>> {
        let entries = self.lock();
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for img in entries.by_id.values() {
            grouped
                .entry(img.collection.clone())
                .or_default()
                .push(img.key.clone());
        }
        grouped
    }

    fn delete_range(&self, collection: &str, start: usize, end: usize) -> Vec<String> {
        let mut entries = self.lock();
        let doomed: Vec<String> = entries
            .by_id
            .values()
            .filter(|img| img.collection == collection)
            .skip(start)
            .take(end.saturating_sub(start).saturating_add(1))
            .map(|img| img.key.clone())
            .collect();
        for key in &doomed {
            entries.remove_key(key);
        }
        doomed
    }

    fn len(&self) -> usize {
        self.lock().by_id.len()
    }
}
