//! Ethereum provider abstraction and Alloy implementation
//!
//! The tool needs `eth_call`, plus `eth_getCode` to explain an empty
//! return. Dialing picks the transport from the endpoint string.

#[cfg(unix)]
use std::path::PathBuf;

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};
use tracing::debug;

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Pick a transport from an endpoint string.
    ///
    /// `ws://`/`wss://` select WebSocket, a bare filesystem path selects IPC
    /// on Unix, everything else is treated as HTTP.
    pub fn from_endpoint(endpoint: &str) -> Self {
        let lower = endpoint.to_ascii_lowercase();
        if lower.starts_with("ws://") || lower.starts_with("wss://") {
            return ProviderConfig::WebSocket(endpoint.to_string());
        }
        #[cfg(unix)]
        {
            if !lower.contains("://") && (endpoint.starts_with('/') || endpoint.ends_with(".ipc")) {
                return ProviderConfig::Ipc(PathBuf::from(endpoint));
            }
        }
        ProviderConfig::Http(endpoint.to_string())
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

/// Abstract Ethereum provider trait
#[async_trait::async_trait]
pub trait EthereumProvider: Send + Sync + 'static {
    /// Execute a call (eth_call) against the latest block
    async fn call(&self, request: TransactionRequest) -> Result<Bytes>;

    /// Deployed bytecode at `address` (eth_getCode, latest block)
    async fn get_code_at(&self, address: Address) -> Result<Bytes>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

type FilledProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Alloy-backed provider over any of the supported transports
struct AlloyProvider {
    provider: FilledProvider,
    endpoint: String,
}

/// Create a provider from configuration
pub async fn create_provider(config: ProviderConfig) -> Result<Box<dyn EthereumProvider>> {
    let endpoint = config.display();
    debug!(endpoint = %endpoint, ?config, "dialing rpc endpoint");

    let provider = match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            ProviderBuilder::new().connect_http(rpc_url)
        }
        ProviderConfig::WebSocket(url) => ProviderBuilder::new()
            .connect(&url)
            .await
            .context("Failed to create WebSocket provider")?,
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc = IpcConnect::new(path.to_string_lossy().to_string());
            ProviderBuilder::new()
                .connect_ipc(ipc)
                .await
                .context("Failed to create IPC provider")?
        }
    };

    Ok(Box::new(AlloyProvider { provider, endpoint }))
}

#[async_trait::async_trait]
impl EthereumProvider for AlloyProvider {
    async fn call(&self, request: TransactionRequest) -> Result<Bytes> {
        Ok(self.provider.call(request).await?)
    }

    async fn get_code_at(&self, address: Address) -> Result<Bytes> {
        Ok(self.provider.get_code_at(address).await?)
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}
