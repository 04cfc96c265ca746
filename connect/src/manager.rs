use {
    crate::{
        client::{
            ClientEvent,
            ClientInitOptions,
            ConnectRequest,
            DisconnectReason,
            SignClient,
            SignClientFactory,
        },
        config::{Config, RELAY_ADDRESS},
        modal::{Modal, ModalContext},
        Error,
        Result,
    },
    bch_connect_domain::{shorten_topic, ProposeNamespaces, Session},
    once_cell::sync::OnceCell,
    std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
        Mutex,
        Weak,
    },
    tokio::{sync::broadcast, sync::watch, task::JoinHandle},
    tracing::{debug, error, info, warn},
};

/// Owns the protocol client, the pairing surface and the single
/// source-of-truth session. All session mutation flows through the
/// transition handlers here; every other component reads.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

struct Inner {
    config: Config,
    factory: Arc<dyn SignClientFactory>,
    client: OnceCell<Arc<dyn SignClient>>,
    modal: OnceCell<Arc<dyn Modal>>,
    initialized: AtomicBool,
    session: watch::Sender<Option<Session>>,
    connect_error: Mutex<Option<Error>>,
    disconnect_error: Mutex<Option<Error>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.listener.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

impl SessionManager {
    #[must_use]
    pub fn new(config: Config, factory: Arc<dyn SignClientFactory>) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                config,
                factory,
                client: OnceCell::new(),
                modal: OnceCell::new(),
                initialized: AtomicBool::new(false),
                session,
                connect_error: Mutex::new(None),
                disconnect_error: Mutex::new(None),
                listener: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// One-time bootstrap: instantiate the variant-appropriate sign
    /// client, resolve the pairing surface and hydrate any persisted
    /// session. Idempotent against duplicate invocation; a failed run
    /// records the connect error and leaves client and modal unset.
    pub async fn init(&self) -> Result<()> {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            debug!("initialization already ran for this configuration");
            return Ok(());
        }
        match self.try_init().await {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("initialization error: {e}");
                self.set_connect_error(Some(e.clone()));
                Err(e)
            }
        }
    }

    async fn try_init(&self) -> Result<()> {
        let config = &self.inner.config;
        let variant = config.client_variant();
        let client = self
            .inner
            .factory
            .create(variant, ClientInitOptions {
                project_id: config.project_id().clone(),
                relay_url: String::from(RELAY_ADDRESS),
                metadata: config.metadata().clone(),
                log_level: config.log_level(),
            })
            .await?;
        let modal = config
            .modal_source()
            .resolve(ModalContext {
                project_id: config.project_id().clone(),
                network: config.network(),
                session_type: String::from(config.session_type()),
            })
            .await?;

        if let Some(active) = client.sessions().into_iter().next() {
            debug!(topic = %shorten_topic(&active.topic), "active session found");
            self.inner.session.send_replace(Some(active));
        }

        self.inner
            .client
            .set(client)
            .map_err(|_| Error::ClientInit(String::from("sign client already set")))?;
        self.inner
            .modal
            .set(modal)
            .map_err(|_| Error::ModalInit(String::from("pairing surface already set")))?;
        info!("sign client and modal initialized, using {variant} sign client");
        Ok(())
    }

    pub(crate) fn client(&self) -> Result<Arc<dyn SignClient>> {
        self.inner.client.get().cloned().ok_or(Error::NoClient)
    }

    fn modal(&self) -> Result<Arc<dyn Modal>> {
        self.inner.modal.get().cloned().ok_or(Error::NoModal)
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    /// Watch channel over the current session; the address pipeline
    /// re-runs on every change observed here.
    #[must_use]
    pub fn session_watch(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.session.borrow().is_some()
    }

    /// Last connect failure; cleared by the next successful connect.
    #[must_use]
    pub fn connect_error(&self) -> Option<Error> {
        self.inner
            .connect_error
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    /// Last disconnect failure; cleared by the next successful
    /// disconnect.
    #[must_use]
    pub fn disconnect_error(&self) -> Option<Error> {
        self.inner
            .disconnect_error
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    pub(crate) fn client_events(&self) -> Result<broadcast::Receiver<ClientEvent>> {
        Ok(self.client()?.subscribe())
    }

    /// Binds the event pump to the client. Exactly one pump per client
    /// instance: repeated calls are no-ops until [`unsubscribe`].
    ///
    /// [`unsubscribe`]: SessionManager::unsubscribe
    pub fn subscribe(&self) -> Result<()> {
        let mut guard = self.inner.listener.lock().map_err(|_| Error::LockError)?;
        if guard.is_some() {
            return Ok(());
        }
        let rx = self.client()?.subscribe();
        let weak = Arc::downgrade(&self.inner);
        *guard = Some(tokio::spawn(event_pump(weak, rx)));
        Ok(())
    }

    /// Tears down the event pump. Dropping the last manager handle has
    /// the same effect.
    pub fn unsubscribe(&self) {
        if let Ok(mut guard) = self.inner.listener.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }

    /// Runs the pairing handshake: propose, present the URI, await the
    /// wallet's approval. A settled session replaces the current one
    /// and clears the connect error; any failure closes the pairing
    /// surface, records the connect error and leaves existing session
    /// state untouched.
    pub async fn connect(&self) -> Result<Session> {
        let client = self.client()?;
        let modal = self.modal()?;
        let request = ConnectRequest::new(
            self.inner.config.client_variant(),
            ProposeNamespaces::from(self.inner.config.network()),
        );
        match handshake(&client, &modal, request).await {
            Ok(session) => {
                self.adopt_session(session.clone());
                modal.close().await;
                Ok(session)
            }
            Err(e) => {
                error!("error connecting: {e}");
                modal.close().await;
                self.set_connect_error(Some(e.clone()));
                Err(e)
            }
        }
    }

    /// Closes the current session with the fixed user-disconnect
    /// reason. Fails without touching the session if no client or no
    /// session is available, or if the client call fails.
    pub async fn disconnect(&self) -> Result<()> {
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                error!("error disconnecting: {e}");
                self.set_disconnect_error(Some(e.clone()));
                return Err(e);
            }
        };
        let Some(session) = self.session() else {
            let e = Error::NoActiveSession;
            error!("error disconnecting: {e}");
            self.set_disconnect_error(Some(e.clone()));
            return Err(e);
        };
        match client
            .disconnect(session.topic.clone(), DisconnectReason::default())
            .await
        {
            Ok(()) => {
                debug!(topic = %shorten_topic(&session.topic), "disconnected");
                self.inner.session.send_replace(None);
                self.set_disconnect_error(None);
                Ok(())
            }
            Err(e) => {
                error!("error disconnecting: {e}");
                self.set_disconnect_error(Some(e.clone()));
                Err(e)
            }
        }
    }

    async fn handle_client_event(&self, event: ClientEvent) {
        debug!("client event: {event}");
        match event {
            ClientEvent::SessionProposal(value) | ClientEvent::SessionEvent(value) => {
                debug!("informational event payload: {value}");
            }
            ClientEvent::SessionConnect(Some(session)) => {
                self.adopt_session(session);
            }
            ClientEvent::SessionConnect(None) => {}
            ClientEvent::SessionDelete(topic) | ClientEvent::SessionExpire(topic) => {
                debug!(topic = %shorten_topic(&topic), "session ended remotely");
                self.inner.session.send_replace(None);
                self.set_disconnect_error(None);
            }
            ClientEvent::SessionUpdate(topic) => {
                let Ok(client) = self.client() else { return };
                match client.sessions().into_iter().next() {
                    Some(current) if current.topic == topic => {
                        self.inner.session.send_replace(Some(current));
                    }
                    _ => debug!(topic = %shorten_topic(&topic), "stale session update ignored"),
                }
            }
            ClientEvent::ProposalExpire => {
                if let Ok(modal) = self.modal() {
                    modal.close().await;
                }
            }
            // the wallet address pipeline reacts to this one
            ClientEvent::AddressesChanged => {}
        }
    }

    fn adopt_session(&self, session: Session) {
        debug!(topic = %shorten_topic(&session.topic), "new session");
        self.inner.session.send_replace(Some(session));
        self.set_connect_error(None);
    }

    fn set_connect_error(&self, error: Option<Error>) {
        store(&self.inner.connect_error, error, "connect error");
    }

    fn set_disconnect_error(&self, error: Option<Error>) {
        store(&self.inner.disconnect_error, error, "disconnect error");
    }
}

/// Writes a state slot. A poisoned lock drops the update but must not
/// do so silently.
pub(crate) fn store<T>(slot: &Mutex<Option<T>>, value: Option<T>, name: &str) {
    match slot.lock() {
        Ok(mut guard) => *guard = value,
        Err(_) => warn!("{name} slot poisoned, dropping update"),
    }
}

async fn handshake(
    client: &Arc<dyn SignClient>,
    modal: &Arc<dyn Modal>,
    request: ConnectRequest,
) -> Result<Session> {
    let handshake = client.connect(request).await?;
    let uri = handshake.uri.ok_or(Error::NoUri)?;
    debug!("pairing uri: {uri}");
    modal.open(&uri).await?;
    handshake.approval.await??.ok_or(Error::NoSession)
}

async fn event_pump(inner: Weak<Inner>, mut rx: broadcast::Receiver<ClientEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let Some(inner) = inner.upgrade() else { return };
                SessionManager { inner }.handle_client_event(event).await;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("client event stream lagged by {n} events");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("client event stream closed");
                return;
            }
        }
    }
}
