use std::collections::BTreeSet;

/// Named capabilities the engine's test-selection predicate consults.
///
/// A test that declares `requires: x` runs only when `x` is present here.
/// The set is additive for the duration of one configuration run; nothing
/// removes a feature once enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    names: BTreeSet<String>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Feature names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureSet;

    #[test]
    fn enable_is_idempotent() {
        let mut features = FeatureSet::new();
        features.enable("fir");
        features.enable("fir");
        assert!(features.is_enabled("fir"));
        assert_eq!(features.iter().count(), 1);
    }

    #[test]
    fn absent_features_read_as_disabled() {
        let features = FeatureSet::new();
        assert!(!features.is_enabled("fir"));
        assert!(features.is_empty());
    }
}
