use {
    crate::{client::SignClientFactory, Config, Error, Result, SessionManager},
    std::sync::Arc,
};

/// Builds an initialized, subscribed [`SessionManager`].
///
/// The protocol client implementations live outside this crate, so a
/// [`SignClientFactory`] must be supplied; everything else comes from
/// the [`Config`].
pub struct ConnectBuilder {
    config: Config,
    factory: Option<Arc<dyn SignClientFactory>>,
}

impl ConnectBuilder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            factory: None,
        }
    }

    #[must_use]
    pub fn client_factory(mut self, factory: Arc<dyn SignClientFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub async fn build(self) -> Result<SessionManager> {
        let factory = self.factory.ok_or_else(|| {
            Error::ClientInit(String::from("no sign client factory configured"))
        })?;
        let manager = SessionManager::new(self.config, factory);
        manager.init().await?;
        manager.subscribe()?;
        Ok(manager)
    }
}
