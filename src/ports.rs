//! Internal Port Derivation
//!
//! Each record occupies a disjoint port within a protocol family by adding
//! its own ordinal id to a shared configured base. Ids are unique and
//! monotonically assigned, so no two records of the same family collide and
//! no separate port-allocation table is needed. Derivation is a pure
//! function of (mode, ordinal, bases) and never fails: modes outside a
//! family simply yield 0.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigKey, ConfigSource};
use crate::domain::mode::DomainMode;
use crate::errors::{DomainPolicyError, PolicyResult};

/// Configured base ports for the three protocol families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBases {
    pub hysteria2: u16,
    pub tuic: u16,
    pub reality: u16,
}

impl PortBases {
    /// Load the three base ports from panel configuration
    pub fn from_config(config: &dyn ConfigSource) -> PolicyResult<Self> {
        Ok(Self {
            hysteria2: Self::port(config, ConfigKey::HysteriaPort)?,
            tuic: Self::port(config, ConfigKey::TuicPort)?,
            reality: Self::port(config, ConfigKey::RealityPort)?,
        })
    }

    fn port(config: &dyn ConfigSource, key: ConfigKey) -> PolicyResult<u16> {
        let value = config
            .get_int(key)
            .ok_or_else(|| DomainPolicyError::Config(key.as_str().to_string()))?;
        u16::try_from(value).map_err(|_| DomainPolicyError::Config(key.as_str().to_string()))
    }
}

/// Derived per-record port assignment and TLS requirement
///
/// Serializes with the exact field names the proxy-config consumers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAssignment {
    pub internal_port_hysteria2: u32,
    pub internal_port_tuic: u32,
    pub internal_port_reality: u32,
    pub need_valid_ssl: bool,
}

impl PortAssignment {
    /// Derive the port assignment for a record's mode and ordinal id
    ///
    /// Sums are widened to u32 and saturate: wrapping into the reserved
    /// port range would be worse than exceeding 65535. Ordinals outside
    /// the u32 range contribute no offset.
    pub fn derive(mode: DomainMode, ordinal: i64, bases: &PortBases) -> Self {
        let offset = u32::try_from(ordinal).unwrap_or(0);
        let udp = mode.udp_port_eligible();

        Self {
            internal_port_hysteria2: if udp {
                (bases.hysteria2 as u32).saturating_add(offset)
            } else {
                0
            },
            internal_port_tuic: if udp {
                (bases.tuic as u32).saturating_add(offset)
            } else {
                0
            },
            internal_port_reality: if mode.reality_port_eligible() {
                (bases.reality as u32).saturating_add(offset)
            } else {
                0
            },
            need_valid_ssl: mode.needs_valid_ssl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;

    fn bases() -> PortBases {
        PortBases {
            hysteria2: 20000,
            tuic: 30000,
            reality: 40000,
        }
    }

    #[test]
    fn test_direct_mode_gets_udp_ports() {
        let ports = PortAssignment::derive(DomainMode::Direct, 7, &bases());
        assert_eq!(ports.internal_port_hysteria2, 20007);
        assert_eq!(ports.internal_port_tuic, 30007);
        assert_eq!(ports.internal_port_reality, 0);
        assert!(ports.need_valid_ssl);
    }

    #[test]
    fn test_cdn_mode_gets_no_ports() {
        let ports = PortAssignment::derive(DomainMode::Cdn, 7, &bases());
        assert_eq!(ports.internal_port_hysteria2, 0);
        assert_eq!(ports.internal_port_tuic, 0);
        assert_eq!(ports.internal_port_reality, 0);
        assert!(ports.need_valid_ssl);
    }

    #[test]
    fn test_reality_mode_gets_reality_port_only() {
        let ports = PortAssignment::derive(DomainMode::Reality, 3, &bases());
        assert_eq!(ports.internal_port_hysteria2, 0);
        assert_eq!(ports.internal_port_tuic, 0);
        assert_eq!(ports.internal_port_reality, 40003);
        assert!(!ports.need_valid_ssl);
    }

    #[test]
    fn test_fake_mode_occupies_udp_families() {
        let ports = PortAssignment::derive(DomainMode::Fake, 2, &bases());
        assert_eq!(ports.internal_port_hysteria2, 20002);
        assert_eq!(ports.internal_port_tuic, 30002);
        assert!(!ports.need_valid_ssl);
    }

    #[test]
    fn test_transient_ordinal_zero() {
        let ports = PortAssignment::derive(DomainMode::Direct, 0, &bases());
        assert_eq!(ports.internal_port_hysteria2, 20000);
    }

    #[test]
    fn test_extreme_ordinals_never_panic() {
        let ports = PortAssignment::derive(DomainMode::Direct, i64::MAX, &bases());
        assert_eq!(ports.internal_port_hysteria2, 20000);

        let ports = PortAssignment::derive(DomainMode::Direct, -5, &bases());
        assert_eq!(ports.internal_port_hysteria2, 20000);

        let ports = PortAssignment::derive(DomainMode::Direct, u32::MAX as i64, &bases());
        assert_eq!(ports.internal_port_hysteria2, u32::MAX);
        assert_eq!(ports.internal_port_tuic, u32::MAX);
    }

    #[test]
    fn test_bases_from_config() {
        let cfg = StaticConfig::new()
            .with_int(ConfigKey::HysteriaPort, 20000)
            .with_int(ConfigKey::TuicPort, 30000)
            .with_int(ConfigKey::RealityPort, 40000);

        let bases = PortBases::from_config(&cfg).unwrap();
        assert_eq!(bases.hysteria2, 20000);
        assert_eq!(bases.tuic, 30000);
        assert_eq!(bases.reality, 40000);
    }

    #[test]
    fn test_missing_base_is_config_error() {
        let cfg = StaticConfig::new().with_int(ConfigKey::HysteriaPort, 20000);
        assert!(PortBases::from_config(&cfg).is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let ports = PortAssignment::derive(DomainMode::Direct, 1, &bases());
        let value = serde_json::to_value(ports).unwrap();
        assert_eq!(value["internal_port_hysteria2"], 20001);
        assert_eq!(value["internal_port_tuic"], 30001);
        assert_eq!(value["internal_port_reality"], 0);
        assert_eq!(value["need_valid_ssl"], true);
    }
}
