//! RPC-backed transaction source
//!
//! Wraps the Solana JSON-RPC and websocket clients behind the
//! [`TransactionSource`] contract. Signature listing and transaction fetches
//! go through the nonblocking HTTP client; account-change notifications are
//! forwarded from a websocket subscription owned by a background task, so the
//! subscription can be detached without tearing down the source.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use solana_client::client_error::ClientErrorKind;
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcTransactionConfig};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::UiTransactionEncoding;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{AccountChange, AccountSubscription, SourceError, SwapDecoder, TransactionSource};
use crate::models::SwapDescriptor;

/// Buffered account-change notifications before backpressure
const NOTIFICATION_BUFFER: usize = 64;

/// Transaction source backed by Solana RPC + websocket endpoints
pub struct RpcTransactionSource {
    client: RpcClient,
    ws_url: String,
    decoder: Arc<dyn SwapDecoder>,
}

impl RpcTransactionSource {
    pub fn new(
        http_url: impl Into<String>,
        ws_url: impl Into<String>,
        decoder: Arc<dyn SwapDecoder>,
    ) -> Self {
        Self {
            client: RpcClient::new(http_url.into()),
            ws_url: ws_url.into(),
            decoder,
        }
    }
}

#[async_trait]
impl TransactionSource for RpcTransactionSource {
    async fn fetch_recent_signatures(
        &self,
        account: &str,
        limit: usize,
    ) -> Result<Vec<String>, SourceError> {
        let pubkey = Pubkey::from_str(account)
            .map_err(|e| SourceError::Unavailable(format!("invalid account {account}: {e}")))?;

        let config = GetConfirmedSignaturesForAddress2Config {
            before: None,
            until: None,
            limit: Some(limit),
            commitment: Some(CommitmentConfig::confirmed()),
        };

        let signatures = self
            .client
            .get_signatures_for_address_with_config(&pubkey, config)
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        Ok(signatures.into_iter().map(|s| s.signature).collect())
    }

    async fn resolve_descriptor(
        &self,
        signature: &str,
    ) -> Result<Option<SwapDescriptor>, SourceError> {
        let parsed = Signature::from_str(signature).map_err(|e| SourceError::Decode {
            signature: signature.to_string(),
            reason: format!("invalid signature: {e}"),
        })?;

        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };

        let tx = match self
            .client
            .get_transaction_with_config(&parsed, config)
            .await
        {
            Ok(tx) => tx,
            // The node answered but has nothing usable for this signature;
            // transport failures are transient and worth a retry cycle
            Err(e) => {
                return match e.kind {
                    ClientErrorKind::RpcError(_) => Ok(None),
                    _ => Err(SourceError::Unavailable(e.to_string())),
                };
            }
        };

        let value = serde_json::to_value(&tx).map_err(|e| SourceError::Decode {
            signature: signature.to_string(),
            reason: e.to_string(),
        })?;

        match self.decoder.decode(signature, &value) {
            Some(descriptor) => Ok(Some(descriptor)),
            None => Err(SourceError::Decode {
                signature: signature.to_string(),
                reason: "transaction content unusable".to_string(),
            }),
        }
    }

    async fn subscribe_account_changes(
        &self,
        account: &str,
    ) -> Result<AccountSubscription, SourceError> {
        let pubkey = Pubkey::from_str(account)
            .map_err(|e| SourceError::Unavailable(format!("invalid account {account}: {e}")))?;

        // Connect up-front so an unreachable websocket endpoint surfaces to
        // the caller instead of dying silently inside the forwarding task
        let client = PubsubClient::new(&self.ws_url)
            .await
            .map_err(|e| SourceError::SubscriptionLost(e.to_string()))?;

        let (notify_tx, notify_rx) = mpsc::channel(NOTIFICATION_BUFFER);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            let subscribe_config = RpcAccountInfoConfig {
                commitment: Some(CommitmentConfig::confirmed()),
                ..Default::default()
            };

            let (mut stream, unsubscribe) =
                match client.account_subscribe(&pubkey, Some(subscribe_config)).await {
                    Ok(subscription) => subscription,
                    Err(e) => {
                        // Closing the channel signals the consumer to resubscribe
                        tracing::warn!(error = %e, "Account subscription failed");
                        return;
                    }
                };

            tracing::debug!(account = %pubkey, "Account subscription established");

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    update = stream.next() => match update {
                        Some(update) => {
                            let change = AccountChange {
                                slot: update.context.slot,
                            };
                            if notify_tx.send(change).await.is_err() {
                                break;
                            }
                        }
                        // Websocket dropped; consumer sees a closed channel
                        None => break,
                    }
                }
            }

            drop(stream);
            unsubscribe().await;
            tracing::debug!(account = %pubkey, "Account subscription detached");
        });

        Ok(AccountSubscription::new(notify_rx, cancel))
    }
}
