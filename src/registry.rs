//! Keyed collections of effect records.

/// A record stored in a [`Registry`].
pub trait RegionRecord {
    fn id(&self) -> &str;
}

/// Effect records in creation order with ids of the form `{prefix}-{n}`.
///
/// The counter is never reset, so ids stay unique even across [`clear`](Self::clear).
#[derive(Debug, Clone)]
pub struct Registry<T> {
    prefix: &'static str,
    next_id: u64,
    entries: Vec<T>,
}

impl<T: RegionRecord + Clone> Registry<T> {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Reserve the id for the next record.
    pub fn allocate_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next_id);
        self.next_id += 1;
        id
    }

    /// Store a record, returning a copy of it.
    pub fn insert(&mut self, record: T) -> T {
        log::debug!("Registered {}", record.id());
        self.entries.push(record.clone());
        record
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.iter().find(|r| r.id() == id)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
