/// What [`Blackwood::insert`](crate::Blackwood::insert) does with a key that is already stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Leave the tree untouched and return [`BlackwoodError::DuplicateKey`](crate::BlackwoodError::DuplicateKey).
    #[default]
    Reject,
    /// Overwrite the stored value and hand back the previous one.
    Replace,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlackwoodConfig {
    pub initial_capacity: usize,
    pub duplicates: DuplicatePolicy,
}

impl BlackwoodConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    #[must_use]
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reject_duplicates() {
        let config = BlackwoodConfig::new();

        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert_eq!(config.initial_capacity, 0);
    }

    #[test]
    fn builder_overrides() {
        let config = BlackwoodConfig::new()
            .initial_capacity(64)
            .duplicates(DuplicatePolicy::Replace);

        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.duplicates, DuplicatePolicy::Replace);
    }
}
