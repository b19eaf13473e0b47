//! Transaction source abstraction
//!
//! The monitoring pipeline consumes the chain through this narrow contract:
//! recent signature listing, descriptor resolution, and an account-change
//! push channel. The production implementation is RPC-backed (`rpc`);
//! tests substitute scripted sources.

pub mod decoder;
pub mod rpc;

pub use decoder::{ProgramIdDecoder, SwapDecoder};
pub use rpc::RpcTransactionSource;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::models::SwapDescriptor;

/// Transaction source errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transient network/RPC failure
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// A descriptor could not be resolved for a signature
    #[error("Decode failure for {signature}: {reason}")]
    Decode { signature: String, reason: String },

    /// The push channel dropped
    #[error("Subscription lost: {0}")]
    SubscriptionLost(String),
}

/// An account-change notification from the push channel
#[derive(Debug, Clone, Copy)]
pub struct AccountChange {
    /// Slot at which the change was observed
    pub slot: u64,
}

/// Handle to a live account-change subscription
///
/// Notifications arrive on an internal channel fed by a forwarding task that
/// owns the underlying connection. Dropping the handle or calling
/// [`AccountSubscription::unsubscribe`] cancels that task, which detaches the
/// protocol-level subscription before exiting.
pub struct AccountSubscription {
    notifications: mpsc::Receiver<AccountChange>,
    cancel: CancellationToken,
}

impl AccountSubscription {
    /// Build a subscription handle from a notification channel and the token
    /// that stops its feeding task
    pub fn new(notifications: mpsc::Receiver<AccountChange>, cancel: CancellationToken) -> Self {
        Self {
            notifications,
            cancel,
        }
    }

    /// Wait for the next account change
    ///
    /// Returns `None` once the subscription is lost or detached; the caller
    /// decides whether to resubscribe.
    pub async fn next_change(&mut self) -> Option<AccountChange> {
        self.notifications.recv().await
    }

    /// Detach the subscription, releasing the underlying connection
    pub fn unsubscribe(self) {
        self.cancel.cancel();
    }
}

impl Drop for AccountSubscription {
    fn drop(&mut self) {
        // A dropped handle must not leak the forwarding task
        self.cancel.cancel();
    }
}

/// Narrow contract over the chain for the monitoring pipeline
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Most recent transaction signatures for an account, newest first
    async fn fetch_recent_signatures(
        &self,
        account: &str,
        limit: usize,
    ) -> Result<Vec<String>, SourceError>;

    /// Resolve a signature to a swap descriptor
    ///
    /// `Ok(None)` means the transaction is unknown to the source (skipped by
    /// the caller); transient transport failures are `Err(Unavailable)`.
    async fn resolve_descriptor(
        &self,
        signature: &str,
    ) -> Result<Option<SwapDescriptor>, SourceError>;

    /// Open an account-change push subscription
    async fn subscribe_account_changes(
        &self,
        account: &str,
    ) -> Result<AccountSubscription, SourceError>;
}
