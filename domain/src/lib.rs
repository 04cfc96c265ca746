//! Value types shared by the BCH wallet-connection stack: networks and
//! CAIP chain identifiers, RPC method and event names, namespace maps,
//! accounts, sessions and topics.

mod account;
mod chain_id;
mod error;
mod event;
mod metadata;
mod method;
mod name;
mod namespaces;
mod session;
mod topic;

pub use {
    account::{Account, Accounts},
    chain_id::{ChainId, Network},
    error::Error,
    event::{Event, Events},
    metadata::Metadata,
    method::{Method, Methods},
    name::NamespaceName,
    namespaces::{Namespaces, ProposeNamespace, ProposeNamespaces, SettledNamespace},
    session::Session,
    topic::{shorten_topic, ProjectId, SessionTopic, Topic},
};
