//! Wallet-connection session manager for BCH dapps.
//!
//! Wraps a relay-based pairing/session protocol behind the
//! [`SignClient`] trait, drives the connect/approve handshake through a
//! pairing surface ([`Modal`]), keeps a single source-of-truth
//! [`Session`] across reconnects and remote events, and exposes the
//! three request operations (`bch_getAddresses`, `bch_signMessage`,
//! `bch_signTransaction`) over the live session.

mod builder;
mod client;
mod config;
mod error;
mod manager;
mod modal;
mod requests;
mod wallet;

use {
    pin_project_lite::pin_project,
    std::{
        future::Future,
        pin::Pin,
        sync::Once,
        task::{Context, Poll},
    },
    tokio::sync::oneshot,
};
pub use {
    bch_connect_cashaddr as cashaddr,
    bch_connect_domain::*,
    builder::ConnectBuilder,
    client::{
        ClientEvent,
        ClientHandshake,
        ClientInitOptions,
        ClientVariant,
        ConnectRequest,
        DisconnectReason,
        RpcRequest,
        SignClient,
        SignClientFactory,
    },
    config::{Config, ConfigBuilder, DEFAULT_SESSION_TYPE, RELAY_ADDRESS},
    error::Error,
    manager::SessionManager,
    modal::{ConsoleModal, Modal, ModalContext, ModalFactory, ModalSource, ModalTheme},
    requests::{
        SignMessageRequest,
        SignTransactionOptions,
        SignTransactionRequest,
        SignTransactionResponse,
        DEFAULT_REQUEST_EXPIRY_SECS,
    },
    wallet::Wallet,
};

pub type Result<T> = std::result::Result<T, Error>;

static INIT: Once = Once::new();

/// One-shot tracing bootstrap, shared by examples and tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_target(true)
            .with_level(true)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    });
}

pin_project! {
    /// Resolves once the remote wallet approves or rejects a proposal.
    pub struct ProposeFuture<T> {
        #[pin]
        receiver: oneshot::Receiver<T>,
    }
}

impl<T> ProposeFuture<T> {
    #[must_use]
    pub fn new(receiver: oneshot::Receiver<T>) -> Self {
        Self { receiver }
    }
}

impl<T> Future for ProposeFuture<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().receiver.poll(cx) {
            Poll::Ready(Ok(value)) => Poll::Ready(Ok(value)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::ReceiveError)),
            Poll::Pending => Poll::Pending,
        }
    }
}
