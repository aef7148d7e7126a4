//! JSON-RPC chain client implementation for EVM nodes.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use alloy::primitives::{Address, Bytes, B256};

use crate::domain::{CallRequest, ChainClient, ChainError, TxLog, TxReceipt};

use super::abi::decode_revert_reason;

/// Configuration for the RPC client
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub poll_interval: Duration,
    pub confirmation_timeout: Duration,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            poll_interval: Duration::from_millis(500),
            confirmation_timeout: Duration::from_secs(60),
        }
    }
}

/// EVM JSON-RPC chain client
pub struct RpcChainClient {
    http_client: Client,
    rpc_url: String,
    config: RpcClientConfig,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: String,
    params: T,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    /// Revert payload for `execution reverted` errors.
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RpcLog {
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: B256,
    status: String,
    block_number: Option<String>,
    logs: Vec<RpcLog>,
}

fn parse_quantity_u64(value: &str) -> Result<u64, ChainError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(stripped, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("bad quantity '{value}': {e}")))
}

fn parse_quantity_u128(value: &str) -> Result<u128, ChainError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    u128::from_str_radix(stripped, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("bad quantity '{value}': {e}")))
}

impl TryFrom<RpcReceipt> for TxReceipt {
    type Error = ChainError;

    fn try_from(raw: RpcReceipt) -> Result<Self, ChainError> {
        let block_number = raw
            .block_number
            .as_deref()
            .map(parse_quantity_u64)
            .transpose()?;
        Ok(TxReceipt {
            transaction_hash: raw.transaction_hash,
            status: parse_quantity_u64(&raw.status)? == 1,
            block_number,
            logs: raw
                .logs
                .into_iter()
                .map(|l| TxLog {
                    address: l.address,
                    topics: l.topics,
                    data: l.data,
                })
                .collect(),
        })
    }
}

impl RpcChainClient {
    /// Create a new RPC chain client with custom configuration
    pub fn new(rpc_url: &str, config: RpcClientConfig) -> Result<Self, ChainError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChainError::Transport(e.to_string()))?;
        info!(rpc_url = %rpc_url, "Created chain client");
        Ok(Self {
            http_client,
            rpc_url: rpc_url.to_string(),
            config,
        })
    }

    /// Create a new RPC chain client with default configuration
    pub fn with_defaults(rpc_url: &str) -> Result<Self, ChainError> {
        Self::new(rpc_url, RpcClientConfig::default())
    }

    /// Make an RPC call with retries
    #[instrument(skip(self, params))]
    async fn rpc_call<P: Serialize + Sync, R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, ChainError> {
        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.config.retry_delay).await;
            }
            match self.do_rpc_call(method, &params).await {
                Ok(result) => return Ok(result),
                // Node-side rejections are deterministic; retrying only
                // delays the failure.
                Err(e @ (ChainError::Rpc { .. } | ChainError::Reverted { .. })) => return Err(e),
                Err(e) => {
                    warn!(attempt = attempt, error = ?e, method = %method, "RPC call failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| ChainError::InvalidResponse("Unknown error".to_string())))
    }

    /// Execute a single RPC call
    async fn do_rpc_call<P: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R, ChainError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: method.to_string(),
            params,
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChainError::Timeout(e.to_string())
                } else {
                    ChainError::Transport(e.to_string())
                }
            })?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            return Err(map_rpc_error(error));
        }

        rpc_response
            .result
            .ok_or_else(|| ChainError::InvalidResponse("Empty response".to_string()))
    }

    fn call_params(request: &CallRequest) -> serde_json::Value {
        let mut obj = json!({
            "to": request.to,
            "data": request.data,
        });
        if let Some(from) = request.from {
            obj["from"] = json!(from);
        }
        if !request.value.is_zero() {
            obj["value"] = json!(format!("{:#x}", request.value));
        }
        obj
    }
}

fn map_rpc_error(error: JsonRpcError) -> ChainError {
    // EVM nodes report reverts as an error with the ABI-encoded revert
    // payload in `data`; code 3 is the standardized revert code.
    if error.code == 3 || error.message.to_lowercase().contains("execution reverted") {
        let reason = error
            .data
            .as_ref()
            .and_then(revert_payload_hex)
            .and_then(|hex| decode_revert_reason(&hex));
        return ChainError::Reverted { reason };
    }
    ChainError::Rpc {
        code: error.code,
        message: error.message,
    }
}

/// Extracts the hex revert payload from the `data` field, which nodes
/// emit either as a bare string or nested under `data`.
fn revert_payload_hex(data: &serde_json::Value) -> Option<String> {
    match data {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => map
            .get("data")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), ChainError> {
        let _: String = self.rpc_call("eth_blockNumber", Vec::<()>::new()).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn chain_id(&self) -> Result<u64, ChainError> {
        let hex: String = self.rpc_call("eth_chainId", Vec::<()>::new()).await?;
        parse_quantity_u64(&hex)
    }

    #[instrument(skip(self, request))]
    async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError> {
        self.rpc_call("eth_call", json!([Self::call_params(request), "latest"]))
            .await
    }

    #[instrument(skip(self, request))]
    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError> {
        let result: Result<String, ChainError> = self
            .rpc_call("eth_estimateGas", json!([Self::call_params(request)]))
            .await;
        match result {
            Ok(hex) => parse_quantity_u64(&hex),
            // A revert keeps its decoded reason; anything else the node
            // refused becomes an estimation failure.
            Err(e @ ChainError::Reverted { .. }) => Err(e),
            Err(ChainError::Rpc { code, message }) => {
                Err(ChainError::GasEstimation(format!("{code}: {message}")))
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn gas_price(&self) -> Result<u128, ChainError> {
        let hex: String = self.rpc_call("eth_gasPrice", Vec::<()>::new()).await?;
        parse_quantity_u128(&hex)
    }

    #[instrument(skip(self))]
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        let hex: String = self
            .rpc_call("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        parse_quantity_u64(&hex)
    }

    #[instrument(skip(self, raw))]
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, ChainError> {
        let encoded = Bytes::copy_from_slice(raw);
        let hash: B256 = self
            .rpc_call("eth_sendRawTransaction", json!([encoded]))
            .await?;
        info!(hash = %hash, "Transaction sent");
        Ok(hash)
    }

    #[instrument(skip(self))]
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>, ChainError> {
        let raw: Option<RpcReceipt> = self
            .rpc_call("eth_getTransactionReceipt", json!([hash]))
            .await?;
        raw.map(TxReceipt::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt, ChainError> {
        let start = std::time::Instant::now();

        while start.elapsed() < self.config.confirmation_timeout {
            match self.transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    info!(hash = %hash, status = receipt.status, "Transaction mined");
                    return Ok(receipt);
                }
                Ok(None) => {
                    debug!(hash = %hash, "Transaction not yet mined");
                }
                Err(e) => {
                    warn!(hash = %hash, error = ?e, "Error polling for receipt");
                }
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }

        Err(ChainError::Timeout(format!(
            "Transaction {hash:#x} not mined within {}s",
            self.config.confirmation_timeout.as_secs()
        )))
    }
}
