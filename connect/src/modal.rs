use {
    crate::Result,
    async_trait::async_trait,
    bch_connect_domain::{Network, ProjectId},
    std::{
        fmt::{self, Debug, Formatter},
        sync::{Arc, Mutex},
    },
    tracing::{debug, info},
};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ModalTheme {
    Light,
    #[default]
    Dark,
}

/// Visual pairing surface: presents the pairing URI and wallet
/// shortcuts. Reports nothing structured back to this layer.
#[async_trait]
pub trait Modal: Send + Sync + 'static {
    async fn open(&self, uri: &str) -> Result<()>;

    async fn close(&self);

    fn set_uri(&self, uri: &str);

    fn set_theme(&self, theme: ModalTheme);
}

/// Context handed to a modal factory, primarily for surfaces that talk
/// to the relay vendor themselves.
#[derive(Debug, Clone)]
pub struct ModalContext {
    pub project_id: ProjectId,
    pub network: Network,
    pub session_type: String,
}

#[async_trait]
pub trait ModalFactory: Send + Sync + 'static {
    async fn create(&self, context: ModalContext) -> Result<Arc<dyn Modal>>;
}

/// A ready instance or a factory invoked once with context during
/// initialization. Downstream code never re-checks which variant was
/// supplied.
#[derive(Clone)]
pub enum ModalSource {
    Instance(Arc<dyn Modal>),
    Factory(Arc<dyn ModalFactory>),
}

impl Default for ModalSource {
    fn default() -> Self {
        Self::Instance(Arc::new(ConsoleModal::default()))
    }
}

impl Debug for ModalSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => write!(f, "ModalSource::Instance"),
            Self::Factory(_) => write!(f, "ModalSource::Factory"),
        }
    }
}

impl ModalSource {
    pub(crate) async fn resolve(&self, context: ModalContext) -> Result<Arc<dyn Modal>> {
        match self {
            Self::Instance(modal) => Ok(modal.clone()),
            Self::Factory(factory) => factory.create(context).await,
        }
    }
}

/// Default pairing surface for headless hosts: surfaces the pairing
/// URI through the log so it can be rendered or copied by the caller.
#[derive(Default)]
pub struct ConsoleModal {
    uri: Mutex<Option<String>>,
    theme: Mutex<ModalTheme>,
}

impl ConsoleModal {
    #[must_use]
    pub fn uri(&self) -> Option<String> {
        self.uri.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl Modal for ConsoleModal {
    async fn open(&self, uri: &str) -> Result<()> {
        self.set_uri(uri);
        info!("scan or open the pairing URI with a wallet: {uri}");
        Ok(())
    }

    async fn close(&self) {
        debug!("closing pairing surface");
        if let Ok(mut guard) = self.uri.lock() {
            guard.take();
        }
    }

    fn set_uri(&self, uri: &str) {
        if let Ok(mut guard) = self.uri.lock() {
            guard.replace(String::from(uri));
        }
    }

    fn set_theme(&self, theme: ModalTheme) {
        if let Ok(mut guard) = self.theme.lock() {
            *guard = theme;
        }
    }
}
