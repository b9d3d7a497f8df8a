pub mod params;

pub use params::{MAINNET_PARAMS, MAX_MIN_WAIT_TIME, NetworkType, OverrideParams, Params, REGTEST_PARAMS, TESTNET_PARAMS};

use crate::result::Result;
use bitcann_consensus_core::tx::TokenCategory;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A registry deployment: the token category all of its tokens share and the
/// parameters its covenants were instantiated with. Derefs into [`Params`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    pub params: Params,
    pub category: TokenCategory,
}

/// On-disk form of [`RegistryConfig`]:
///
/// ```toml
/// network = "testnet"
/// category = "<token category hex>"
///
/// [params]
/// fee_rate = 2
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RegistryConfigFile {
    #[serde(default)]
    network: NetworkType,
    category: TokenCategory,
    #[serde(default)]
    params: OverrideParams,
}

impl RegistryConfig {
    pub fn new(params: Params, category: TokenCategory) -> Self {
        Self { params, category }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let file: RegistryConfigFile = toml::from_str(toml_str)?;
        let params = Params::from(file.network).override_params(file.params);
        params.validate()?;
        Ok(Self { params, category: file.category })
    }
}

impl AsRef<Params> for RegistryConfig {
    fn as_ref(&self) -> &Params {
        &self.params
    }
}

impl Deref for RegistryConfig {
    type Target = Params;

    fn deref(&self) -> &Self::Target {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcann_addresses::Prefix;

    const CATEGORY: &str = "8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3af";

    #[test]
    fn test_from_toml_str() {
        let config = RegistryConfig::from_toml_str(&format!(
            r#"
            network = "testnet"
            category = "{CATEGORY}"

            [params]
            fee_rate = 2
            max_resolution_hops = 50
            "#
        ))
        .unwrap();
        assert_eq!(config.prefix(), Prefix::Testnet);
        assert_eq!(config.category.to_string(), CATEGORY);
        assert_eq!(config.fee_rate, 2);
        assert_eq!(config.max_resolution_hops, 50);
        assert_eq!(config.min_starting_bid, MAINNET_PARAMS.min_starting_bid);
    }

    #[test]
    fn test_from_toml_str_defaults() {
        let config = RegistryConfig::from_toml_str(&format!("category = \"{CATEGORY}\"")).unwrap();
        assert_eq!(config.params, MAINNET_PARAMS);

        assert!(RegistryConfig::from_toml_str("network = \"mainnet\"").is_err());
        assert!(RegistryConfig::from_toml_str("category = \"abcd\"").is_err());
        let wait = RegistryConfig::from_toml_str(&format!("category = \"{CATEGORY}\"\n[params]\nmin_wait_time = 4194304"));
        assert!(matches!(wait, Err(crate::error::Error::InvalidParams(_))));
    }
}
