use {
    crate::{client::ClientVariant, modal::ModalSource},
    bch_connect_domain::{Metadata, Network, ProjectId},
};

pub const RELAY_ADDRESS: &str = "wss://relay.walletconnect.com";
pub const DEFAULT_SESSION_TYPE: &str = "Wallet Connect V2";

/// Immutable provider configuration. Constructed once via
/// [`Config::builder`]; downstream consumers only read it.
#[derive(Debug, Clone)]
pub struct Config {
    project_id: ProjectId,
    network: Network,
    metadata: Metadata,
    session_type: String,
    modal: ModalSource,
    support_legacy_client: bool,
    debug: bool,
}

impl Config {
    pub fn builder(
        project_id: impl Into<ProjectId>,
        network: Network,
        metadata: Metadata,
    ) -> ConfigBuilder {
        ConfigBuilder {
            project_id: project_id.into(),
            network,
            metadata,
            session_type: String::from(DEFAULT_SESSION_TYPE),
            modal: ModalSource::default(),
            support_legacy_client: true,
            debug: false,
        }
    }

    #[must_use]
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    #[must_use]
    pub fn network(&self) -> Network {
        self.network
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn session_type(&self) -> &str {
        &self.session_type
    }

    #[must_use]
    pub fn support_legacy_client(&self) -> bool {
        self.support_legacy_client
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub fn client_variant(&self) -> ClientVariant {
        if self.support_legacy_client {
            ClientVariant::Legacy
        } else {
            ClientVariant::Modern
        }
    }

    /// Client logger level derived from the debug flag.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    pub(crate) fn modal_source(&self) -> &ModalSource {
        &self.modal
    }
}

pub struct ConfigBuilder {
    project_id: ProjectId,
    network: Network,
    metadata: Metadata,
    session_type: String,
    modal: ModalSource,
    support_legacy_client: bool,
    debug: bool,
}

impl ConfigBuilder {
    #[must_use]
    pub fn session_type(mut self, session_type: impl Into<String>) -> Self {
        self.session_type = session_type.into();
        self
    }

    #[must_use]
    pub fn modal(mut self, modal: ModalSource) -> Self {
        self.modal = modal;
        self
    }

    #[must_use]
    pub fn support_legacy_client(mut self, support: bool) -> Self {
        self.support_legacy_client = support;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn build(self) -> Config {
        Config {
            project_id: self.project_id,
            network: self.network,
            metadata: self.metadata,
            session_type: self.session_type,
            modal: self.modal,
            support_legacy_client: self.support_legacy_client,
            debug: self.debug,
        }
    }
}
