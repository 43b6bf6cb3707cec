//! Compile-time settings for the page.
//!
//! The target network is fixed. Nothing here is read at runtime; the serde
//! derives only let the values be embedded or inspected as data.

use serde::{Deserialize, Serialize};

pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// ENS registry, same address on mainnet and Sepolia.
pub const ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    /// Shown in a blocking alert when the wallet sits on another chain.
    pub wrong_network_alert: String,
    pub ens_registry: String,
}

impl NetworkConfig {
    pub fn sepolia() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
            name: "sepolia".into(),
            wrong_network_alert: "Change the network to sepolia".into(),
            ens_registry: ENS_REGISTRY.into(),
        }
    }

    pub fn accepts(&self, chain_id: u64) -> bool {
        self.chain_id == chain_id
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::sepolia()
    }
}

/// Static texts and assets of the greeting page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub title: String,
    pub greeting_prefix: String,
    pub blurb: String,
    pub image: String,
    pub footer: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "ENS Dapp".into(),
            greeting_prefix: "Welcome to LearnWeb3 Punks".into(),
            blurb: "It's an NFT collection for LearnWeb3 Punks.".into(),
            image: "/images/learnweb3punks.png".into(),
            footer: "Made with \u{2764} by LearnWeb3 Punks".into(),
        }
    }
}

pub fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_network_is_sepolia() {
        let network = NetworkConfig::default();
        assert_eq!(network.chain_id, 11155111);
        assert!(network.accepts(11155111));
        assert!(!network.accepts(1));
        assert!(!network.accepts(5));
    }

    #[test]
    fn network_config_from_json() {
        let json = r#"{
            "chain_id": 1,
            "name": "mainnet",
            "wrong_network_alert": "Change the network to mainnet",
            "ens_registry": "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e"
        }"#;
        let network: NetworkConfig = serde_json::from_str(json).unwrap();
        assert!(network.accepts(1));
        assert_eq!(network.ens_registry, ENS_REGISTRY);
    }

    #[test]
    fn app_config_survives_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.title, "ENS Dapp");
    }
}
