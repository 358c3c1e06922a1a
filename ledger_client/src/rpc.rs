//! JSON-RPC 2.0 transport over HTTP.
//!
//! Reads and the faucet use the ledger's standard method names. Payer-signed
//! operations go to `devdrop_*` methods and carry an Ed25519 signature per
//! signer over [`signing_message`].

use async_trait::async_trait;
use devdrop_crypto::{sign_message, Keypair};
use devdrop_types::{Account, Commitment, HoldingAccount, Mint, TxSignature};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

use crate::{ClientError, ClientResult, LedgerClient};

/// JSON-RPC "method not found". Returned by clusters without a faucet.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Tuning knobs for [`RpcLedgerClient`].
#[derive(Clone, Debug)]
pub struct RpcClientOptions {
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Delay between signature status polls while confirming.
    pub poll_interval: Duration,
    /// Commitment used for balance reads.
    pub commitment: Commitment,
}

impl Default for RpcClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
            commitment: Commitment::Confirmed,
        }
    }
}

/// HTTP JSON-RPC client for a ledger endpoint.
pub struct RpcLedgerClient {
    http: reqwest::Client,
    endpoint: String,
    options: RpcClientOptions,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `{ "context": ..., "value": T }` wrapper used by ledger read methods.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    #[serde(default)]
    err: Option<Value>,
    #[serde(default)]
    confirmation_status: Option<Commitment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcMint {
    address: Account,
    decimals: u8,
    supply: u64,
    mint_authority: Account,
    freeze_authority: Account,
}

impl From<RpcMint> for Mint {
    fn from(m: RpcMint) -> Self {
        Mint {
            address: m.address,
            decimals: m.decimals,
            supply: m.supply,
            mint_authority: m.mint_authority,
            freeze_authority: m.freeze_authority,
        }
    }
}

/// Bytes a signer signs for a payer-signed method: `method || params`.
///
/// `params` is serialized with sorted keys, so both ends agree on the bytes.
pub fn signing_message(method: &str, params: &Value) -> Vec<u8> {
    let mut message = method.as_bytes().to_vec();
    message.extend_from_slice(params.to_string().as_bytes());
    message
}

fn signed_params(method: &str, mut params: Value, signers: &[&Keypair]) -> Value {
    let message = signing_message(method, &params);
    let mut signatures = serde_json::Map::new();
    for signer in signers {
        signatures.insert(
            signer.account().to_string(),
            Value::String(sign_message(&message, signer)),
        );
    }
    if let Some(obj) = params.as_object_mut() {
        obj.insert("signatures".to_string(), Value::Object(signatures));
    }
    params
}

fn map_transport(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout(e.to_string())
    } else {
        ClientError::Transport(e.to_string())
    }
}

impl RpcLedgerClient {
    pub fn new(endpoint: impl Into<String>, options: RpcClientOptions) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            options,
            next_id: AtomicU64::new(1),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one JSON-RPC request and decode its `result`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> ClientResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(method, id, "rpc request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "endpoint returned HTTP {}",
                response.status()
            )));
        }

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("{method}: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(ClientError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = envelope
            .result
            .ok_or_else(|| ClientError::InvalidResponse(format!("{method}: missing result")))?;
        serde_json::from_value(result)
            .map_err(|e| ClientError::InvalidResponse(format!("{method}: {e}")))
    }

    async fn signature_status(&self, signature: &TxSignature) -> ClientResult<Option<SignatureStatus>> {
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.as_str()], { "searchTransactionHistory": true }]),
            )
            .await?;
        Ok(statuses.value.into_iter().next().flatten())
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn get_balance(&self, account: &Account) -> ClientResult<u64> {
        let balance: WithContext<u64> = self
            .call(
                "getBalance",
                json!([account.as_str(), { "commitment": self.options.commitment }]),
            )
            .await?;
        Ok(balance.value)
    }

    async fn get_token_balance(&self, owner: &Account, mint: &Account) -> ClientResult<u64> {
        let balance: WithContext<u64> = self
            .call(
                "devdrop_getTokenBalance",
                json!([owner.as_str(), mint.as_str()]),
            )
            .await?;
        Ok(balance.value)
    }

    async fn request_faucet_funds(
        &self,
        account: &Account,
        lamports: u64,
    ) -> ClientResult<TxSignature> {
        self.call("requestAirdrop", json!([account.as_str(), lamports]))
            .await
            .map_err(|e| match e {
                ClientError::Rpc { code, message } if code == METHOD_NOT_FOUND => {
                    ClientError::FaucetUnavailable(message)
                }
                other => other,
            })
    }

    async fn transfer(
        &self,
        payer: &Keypair,
        recipients: &[(Account, u64)],
    ) -> ClientResult<TxSignature> {
        let method = "devdrop_transfer";
        let recipients: Vec<Value> = recipients
            .iter()
            .map(|(account, lamports)| json!({ "account": account.as_str(), "lamports": lamports }))
            .collect();
        let params = json!({
            "payer": payer.account().as_str(),
            "recipients": recipients,
        });
        self.call(method, signed_params(method, params, &[payer]))
            .await
    }

    async fn confirm_transaction(
        &self,
        signature: &TxSignature,
        commitment: Commitment,
    ) -> ClientResult<()> {
        loop {
            if let Some(status) = self.signature_status(signature).await? {
                if let Some(err) = status.err {
                    return Err(ClientError::TransactionFailed {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    });
                }
                if status
                    .confirmation_status
                    .is_some_and(|observed| observed.satisfies(commitment))
                {
                    debug!(%signature, %commitment, "transaction confirmed");
                    return Ok(());
                }
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    async fn create_mint(
        &self,
        payer: &Keypair,
        mint_authority: &Account,
        freeze_authority: &Account,
        decimals: u8,
    ) -> ClientResult<Account> {
        let method = "devdrop_createMint";
        let params = json!({
            "payer": payer.account().as_str(),
            "mintAuthority": mint_authority.as_str(),
            "freezeAuthority": freeze_authority.as_str(),
            "decimals": decimals,
        });
        self.call(method, signed_params(method, params, &[payer]))
            .await
    }

    async fn get_or_create_holding_account(
        &self,
        payer: &Keypair,
        mint: &Account,
        owner: &Account,
    ) -> ClientResult<HoldingAccount> {
        let method = "devdrop_getOrCreateHoldingAccount";
        let params = json!({
            "payer": payer.account().as_str(),
            "mint": mint.as_str(),
            "owner": owner.as_str(),
        });
        self.call(method, signed_params(method, params, &[payer]))
            .await
    }

    async fn mint_to(
        &self,
        payer: &Keypair,
        mint: &Account,
        destination: &Account,
        mint_authority: &Keypair,
        amount: u64,
    ) -> ClientResult<TxSignature> {
        let method = "devdrop_mintTo";
        let params = json!({
            "payer": payer.account().as_str(),
            "mint": mint.as_str(),
            "destination": destination.as_str(),
            "mintAuthority": mint_authority.account().as_str(),
            "amount": amount,
        });
        self.call(method, signed_params(method, params, &[payer, mint_authority]))
            .await
    }

    async fn get_mint(&self, mint: &Account) -> ClientResult<Mint> {
        let mint: RpcMint = self.call("devdrop_getMint", json!([mint.as_str()])).await?;
        Ok(mint.into())
    }
}
