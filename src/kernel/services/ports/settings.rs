use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    // Editor
    pub font_size: u8,
    pub word_wrap: WordWrap,
    pub minimap: bool,
    pub tab_size: u8,
    // Compiler
    pub auto_compile: bool,
    pub enable_optimization: bool,
    // Network
    pub network: Network,
    pub wasm_optimization: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            font_size: 14,
            word_wrap: WordWrap::On,
            minimap: false,
            tab_size: 4,
            auto_compile: false,
            enable_optimization: true,
            network: Network::Testnet,
            wasm_optimization: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordWrap {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
    Nctl,
    Local,
}

impl Network {
    pub fn label(self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
            Self::Nctl => "nctl",
            Self::Local => "local",
        }
    }

    pub fn chain_name(self) -> &'static str {
        match self {
            Self::Testnet => "casper-test",
            Self::Mainnet => "casper",
            Self::Nctl | Self::Local => "casper-net-1",
        }
    }

    pub fn rpc_url(self) -> &'static str {
        match self {
            Self::Testnet => "https://node-clarity-testnet.make.services/rpc",
            Self::Mainnet => "https://node-clarity-mainnet.make.services/rpc",
            Self::Nctl => "http://localhost:11101/rpc",
            Self::Local => "http://localhost:7777/rpc",
        }
    }
}
