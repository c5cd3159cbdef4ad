//! Panel configuration collaborator
//!
//! The policy core reads a handful of values from the panel's key-value
//! configuration: the three port-family bases and the topology role flag.
//! The source is injected as a trait so the core never reaches into a
//! process-wide settings table.

use std::collections::HashMap;
use std::fmt;

/// Configuration keys consumed by the policy core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Base port for the hysteria2 family
    HysteriaPort,
    /// Base port for the tuic family
    TuicPort,
    /// Base port for the reality family
    RealityPort,
    /// Whether this instance runs in the parent topology role
    IsParent,
}

impl ConfigKey {
    /// Get the canonical key string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HysteriaPort => "hysteria_port",
            Self::TuicPort => "tuic_port",
            Self::RealityPort => "reality_port",
            Self::IsParent => "is_parent",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read access to panel configuration
pub trait ConfigSource: Send + Sync {
    /// Integer-valued key, `None` when unset
    fn get_int(&self, key: ConfigKey) -> Option<i64>;

    /// Boolean-valued key, `None` when unset
    fn get_bool(&self, key: ConfigKey) -> Option<bool>;
}

/// Fixed in-memory configuration, primarily for tests
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    ints: HashMap<ConfigKey, i64>,
    bools: HashMap<ConfigKey, bool>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_int(mut self, key: ConfigKey, value: i64) -> Self {
        self.ints.insert(key, value);
        self
    }

    pub fn with_bool(mut self, key: ConfigKey, value: bool) -> Self {
        self.bools.insert(key, value);
        self
    }
}

impl ConfigSource for StaticConfig {
    fn get_int(&self, key: ConfigKey) -> Option<i64> {
        self.ints.get(&key).copied()
    }

    fn get_bool(&self, key: ConfigKey) -> Option<bool> {
        self.bools.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_config_lookup() {
        let cfg = StaticConfig::new()
            .with_int(ConfigKey::HysteriaPort, 20000)
            .with_bool(ConfigKey::IsParent, true);

        assert_eq!(cfg.get_int(ConfigKey::HysteriaPort), Some(20000));
        assert_eq!(cfg.get_int(ConfigKey::TuicPort), None);
        assert_eq!(cfg.get_bool(ConfigKey::IsParent), Some(true));
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(ConfigKey::HysteriaPort.as_str(), "hysteria_port");
        assert_eq!(ConfigKey::IsParent.as_str(), "is_parent");
    }
}
