//! # Policy Registry
//!
//! Maps each network environment to the policy id handles are minted under.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Err;
use crate::{Result, tracerr};

/// Policy id of handle tokens on mainnet.
pub const MAINNET_POLICY_ID: &str = "f0ff48bbb7bbe9d59a40f1ce90e9e9d0ff5002ec48f232b49ca0fb9a";

/// Policy id of handle tokens on the test networks (testnet, preview and
/// preprod).
pub const TESTNET_POLICY_ID: &str = "8d18d786e92776c824607fd8e193ec535c79dc61ea2405ddf3b09fe3";

/// Cardano network environments supported.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Cardano mainnet.
    #[default]
    Mainnet,

    /// Legacy public testnet.
    Testnet,

    /// Preview test network.
    Preview,

    /// Pre-production test network.
    Preprod,
}

impl Environment {
    /// Every supported environment.
    pub const ALL: [Self; 4] = [Self::Mainnet, Self::Testnet, Self::Preview, Self::Preprod];

    /// The policy id handles are minted under in this environment.
    #[must_use]
    pub const fn policy_id(self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_POLICY_ID,
            Self::Testnet | Self::Preview | Self::Preprod => TESTNET_POLICY_ID,
        }
    }

    /// Lowercase network name, as used in project id prefixes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Preview => "preview",
            Self::Preprod => "preprod",
        }
    }
}

impl FromStr for Environment {
    type Err = crate::Error;

    /// Parse a lowercase network name into an [`Environment`].
    ///
    /// # Errors
    ///
    /// Returns [`Err::InvalidEnvironment`] for any other value.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "preview" => Ok(Self::Preview),
            "preprod" => Ok(Self::Preprod),
            _ => tracerr!(Err::InvalidEnvironment, "invalid environment: {s}"),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up the policy id for an environment given by name.
///
/// # Errors
///
/// Returns [`Err::InvalidEnvironment`] when `env` does not name a supported
/// environment. Unknown names are never mapped to a default policy.
pub fn policy_id(env: &str) -> Result<&'static str> {
    let env = Environment::from_str(env)?;
    Ok(env.policy_id())
}
