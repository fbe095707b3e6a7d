use crate::domain::request::InboundRequest;

/// A priority-merged name→value parameter map.
///
/// Entries keep insertion order, and `insert` is first-occurrence-wins:
/// a name already present is never overwritten by a later source. This is
/// what makes the bag's contents deterministic for identical requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBag {
    entries: Vec<(String, String)>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges every parameter source of the request into one bag, scanning
    /// in fixed priority order: primary payload first, then the metadata
    /// flat bag, then the nested method bag. Duplicate names in a later
    /// source are ignored.
    pub fn from_request(request: &InboundRequest) -> Self {
        let mut bag = Self::new();

        if let Some(payload) = &request.payload {
            for pair in &payload.parameters {
                bag.insert(&pair.name, &pair.value);
            }
        }

        if let Some(metadata) = &request.metadata {
            for pair in &metadata.parameters {
                bag.insert(&pair.name, &pair.value);
            }
            if let Some(method) = &metadata.method {
                for pair in &method.parameters {
                    bag.insert(&pair.name, &pair.value);
                }
            }
        }

        bag
    }

    /// Adds an entry unless the name is already present. Returns whether
    /// the entry was added.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value.into()));
        true
    }

    /// Adds or replaces an entry. Reserved for stages that deliberately
    /// override caller input, such as dependent-call identifier injection.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
