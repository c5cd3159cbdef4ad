//! Domain Operating Mode Model
//!
//! Defines the closed set of operating strategies a domain record can run
//! under. The mode decides which internal port families a record occupies
//! and whether its TLS certificate must be valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainPolicyError;

/// Operating mode of a domain record
///
/// Closed enumeration: unknown strings are rejected at the boundary rather
/// than mapped to a catch-all variant, so stored records can never carry a
/// mode the port derivation does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainMode {
    /// Direct connection to the node
    Direct,
    /// Domain used only inside subscription links
    SubLinkOnly,
    /// Traffic fronted by a CDN
    Cdn,
    /// CDN with automatically discovered edge IPs
    AutoCdnIp,
    /// Relay through another node
    Relay,
    /// REALITY TLS camouflage
    Reality,
    /// Legacy XTLS direct connection
    OldXtlsDirect,
    /// Serverless worker front
    Worker,
    /// Decoy domain, never served for real
    Fake,
}

impl DomainMode {
    /// All modes, in declaration order
    pub const ALL: [DomainMode; 9] = [
        Self::Direct,
        Self::SubLinkOnly,
        Self::Cdn,
        Self::AutoCdnIp,
        Self::Relay,
        Self::Reality,
        Self::OldXtlsDirect,
        Self::Worker,
        Self::Fake,
    ];

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::SubLinkOnly => "sub_link_only",
            Self::Cdn => "cdn",
            Self::AutoCdnIp => "auto_cdn_ip",
            Self::Relay => "relay",
            Self::Reality => "reality",
            Self::OldXtlsDirect => "old_xtls_direct",
            Self::Worker => "worker",
            Self::Fake => "fake",
        }
    }

    /// Whether the domain must present a valid TLS certificate
    ///
    /// True for every mode except `reality` (self-signed camouflage) and
    /// `fake` (never actually served).
    pub fn needs_valid_ssl(&self) -> bool {
        matches!(
            self,
            Self::Direct
                | Self::Cdn
                | Self::Worker
                | Self::Relay
                | Self::AutoCdnIp
                | Self::OldXtlsDirect
                | Self::SubLinkOnly
        )
    }

    /// Whether the record occupies the hysteria2/tuic UDP port families
    pub fn udp_port_eligible(&self) -> bool {
        matches!(self, Self::Direct | Self::Relay | Self::Fake)
    }

    /// Whether the record occupies the reality port family
    pub fn reality_port_eligible(&self) -> bool {
        matches!(self, Self::Reality)
    }

    /// Whether the domain may appear in the panel's all-domains fallback
    ///
    /// Fake and reality domains are never advertised to clients directly.
    pub fn panel_visible(&self) -> bool {
        !matches!(self, Self::Fake | Self::Reality)
    }
}

impl Default for DomainMode {
    fn default() -> Self {
        Self::Direct
    }
}

impl fmt::Display for DomainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DomainMode {
    type Err = DomainPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "sub_link_only" => Ok(Self::SubLinkOnly),
            "cdn" => Ok(Self::Cdn),
            "auto_cdn_ip" => Ok(Self::AutoCdnIp),
            "relay" => Ok(Self::Relay),
            "reality" => Ok(Self::Reality),
            "old_xtls_direct" => Ok(Self::OldXtlsDirect),
            "worker" => Ok(Self::Worker),
            "fake" => Ok(Self::Fake),
            other => Err(DomainPolicyError::UnknownMode(other.to_string())),
        }
    }
}
