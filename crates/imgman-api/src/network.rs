//! Deployment networks a policy operation can address.

use std::fmt::{self, Display, Formatter};

/// A single deployment network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Staging network.
    Staging,
    /// Production network.
    Production,
}

impl Network {
    /// Lowercase identifier used in REST paths and result keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Uppercase heading printed above per-network output.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Staging => "STAGING:",
            Self::Production => "PRODUCTION:",
        }
    }
}

impl Display for Network {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Network selector accepted by operations that can span both networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkTarget {
    /// Staging only.
    Staging,
    /// Production only.
    Production,
    /// Staging, then production.
    Both,
}

impl NetworkTarget {
    /// Networks addressed by this target, staging first.
    #[must_use]
    pub const fn networks(self) -> &'static [Network] {
        match self {
            Self::Staging => &[Network::Staging],
            Self::Production => &[Network::Production],
            Self::Both => &[Network::Staging, Network::Production],
        }
    }

    /// Lowercase identifier for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Both => "both",
        }
    }
}

impl From<Network> for NetworkTarget {
    fn from(network: Network) -> Self {
        match network {
            Network::Staging => Self::Staging,
            Network::Production => Self::Production,
        }
    }
}

impl Display for NetworkTarget {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_expands_to_staging_then_production() {
        assert_eq!(
            NetworkTarget::Both.networks(),
            &[Network::Staging, Network::Production]
        );
        assert_eq!(NetworkTarget::Staging.networks(), &[Network::Staging]);
        assert_eq!(NetworkTarget::Production.networks(), &[Network::Production]);
    }

    #[test]
    fn single_network_converts_to_matching_target() {
        assert_eq!(NetworkTarget::from(Network::Staging), NetworkTarget::Staging);
        assert_eq!(NetworkTarget::from(Network::Production).to_string(), "production");
        assert_eq!(NetworkTarget::Both.to_string(), "both");
    }

    #[test]
    fn headings_match_network() {
        assert_eq!(Network::Staging.heading(), "STAGING:");
        assert_eq!(Network::Production.heading(), "PRODUCTION:");
        assert_eq!(Network::Production.to_string(), "production");
    }
}
