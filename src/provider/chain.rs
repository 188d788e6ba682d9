use serde_json::Value;
use tracing::warn;

use crate::{
    helpers::parse_hex_uint,
    types::{RpcRequest, RpcResponse},
};

use super::HTTP;

/// 4-byte selector of `totalSupply()`.
const TOTAL_SUPPLY_SELECTOR: &str = "0x18160ddd";

impl HTTP {
    /// Reads the collection's `totalSupply()` via `eth_call`. Any failure —
    /// transport, RPC error, unparseable hex — yields `0`, the sentinel that
    /// tells derivation to fall back. A failed contract read never aborts a
    /// refresh.
    pub async fn fetch_total_supply(&self) -> u64 {
        let params = serde_json::json!([
            {
                "to": self.config.collection_address,
                "data": TOTAL_SUPPLY_SELECTOR,
            },
            "latest",
        ]);

        match self.rpc_call("eth_call", params).await {
            Some(result) => parse_hex_uint(&result).unwrap_or(0),
            None => 0,
        }
    }

    /// Chain height at refresh time, for log annotation only.
    pub async fn latest_block_number(&self) -> Option<u64> {
        let result =
            self.rpc_call("eth_blockNumber", serde_json::json!([])).await?;
        parse_hex_uint(&result)
    }

    async fn rpc_call(
        &self,
        method: &'static str,
        params: Value,
    ) -> Option<String> {
        let request = RpcRequest::new(method, params);

        let response = match self
            .client
            .post(&self.config.rpc_host)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("{} request failed: {}", method, err);
                return None;
            },
        };

        if !response.status().is_success() {
            warn!("{} returned {}", method, response.status());
            return None;
        }

        let body = match response.json::<RpcResponse>().await {
            Ok(body) => body,
            Err(err) => {
                warn!("{} body did not parse: {}", method, err);
                return None;
            },
        };

        if let Some(error) = body.error {
            warn!("{} rpc error {}: {}", method, error.code, error.message);
            return None;
        }

        body.result
    }
}
