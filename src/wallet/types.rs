//! Chain-specific types and error definitions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// EIP-1193 / EIP-3085 code for "unrecognized chain ID".
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// EIP-1193 code for "user rejected the request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Chain ID type for strong typing.
///
/// Serialized as the `0x`-prefixed hex string wallets expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Hex form used by `wallet_switchEthereumChain` (no leading zeros).
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }

    /// Parse a `0x`-prefixed hex chain id, case-insensitive.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
        u64::from_str_radix(digits, 16).ok().map(Self)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex chain id '{raw}'")))
    }
}

/// Native currency block of an `wallet_addEthereumChain` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Static description of the target network, in EIP-3085 shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

/// Errors reported by a wallet provider.
#[derive(Debug, Clone, Error)]
pub enum WalletError {
    /// The wallet answered with a JSON-RPC error object.
    #[error("wallet error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request never reached the wallet or the connection broke.
    #[error("transport error: {0}")]
    Transport(String),

    /// The wallet did not answer in time.
    #[error("wallet request timed out after {0} seconds")]
    Timeout(u64),

    /// The wallet answered with something we could not interpret.
    #[error("invalid wallet response: {0}")]
    InvalidResponse(String),
}

impl WalletError {
    /// Numeric EIP-1193 code, when the wallet supplied one.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the wallet does not know the requested chain.
    pub fn is_unrecognized_chain(&self) -> bool {
        self.code() == Some(UNRECOGNIZED_CHAIN_CODE)
    }

    /// Whether the user dismissed the wallet prompt.
    pub fn is_user_rejection(&self) -> bool {
        self.code() == Some(USER_REJECTED_CODE)
    }
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_hex() {
        assert_eq!(ChainId(11_155_111).to_hex(), "0xaa36a7");
        assert_eq!(ChainId::from_hex("0xAA36A7"), Some(ChainId(11_155_111)));
        assert_eq!(ChainId::from_hex("aa36a7"), None);
        assert_eq!(ChainId(1).to_hex(), "0x1");
    }

    #[test]
    fn test_descriptor_wire_shape() {
        let descriptor = NetworkDescriptor {
            chain_id: ChainId(11_155_111),
            chain_name: "Sepolia".to_string(),
            rpc_urls: vec!["https://sepolia.infura.io".to_string()],
            native_currency: NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            block_explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["chainId"], "0xaa36a7");
        assert_eq!(json["chainName"], "Sepolia");
        assert_eq!(json["rpcUrls"][0], "https://sepolia.infura.io");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["blockExplorerUrls"][0], "https://sepolia.etherscan.io");
    }

    #[test]
    fn test_error_codes() {
        let err = WalletError::Rpc {
            code: 4902,
            message: "Unrecognized chain ID".to_string(),
        };
        assert!(err.is_unrecognized_chain());
        assert!(!err.is_user_rejection());
        assert_eq!(err.to_string(), "wallet error 4902: Unrecognized chain ID");

        assert_eq!(WalletError::Timeout(5).code(), None);
        assert!(!WalletError::Transport("refused".into()).is_unrecognized_chain());
    }
}
