use {
    crate::{client::ClientEvent, manager::store, Error, Result, SessionManager},
    bch_connect_cashaddr as cashaddr,
    bch_connect_domain::Session,
    std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
        Mutex,
        Weak,
    },
    tokio::{sync::broadcast::error::RecvError, task::JoinHandle},
    tracing::{debug, warn},
};

/// Address resolution pipeline over a [`SessionManager`].
///
/// Derives the display address and its token-aware variant from the
/// current session, re-running on every session change, and refetches
/// from the wallet when it signals `addressesChanged`. Reads the
/// manager's state; never mutates it.
#[derive(Clone)]
pub struct Wallet {
    inner: Arc<Inner>,
}

struct Inner {
    manager: SessionManager,
    address: Mutex<Option<String>>,
    token_address: Mutex<Option<String>>,
    address_error: Mutex<Option<Error>>,
    token_address_error: Mutex<Option<Error>>,
    loading: AtomicBool,
    pumps: Mutex<Vec<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.pumps.lock() {
            for handle in guard.drain(..) {
                handle.abort();
            }
        }
    }
}

impl Wallet {
    #[must_use]
    pub fn new(manager: SessionManager) -> Self {
        Self {
            inner: Arc::new(Inner {
                manager,
                address: Mutex::new(None),
                token_address: Mutex::new(None),
                address_error: Mutex::new(None),
                token_address_error: Mutex::new(None),
                loading: AtomicBool::new(false),
                pumps: Mutex::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn manager(&self) -> &SessionManager {
        &self.inner.manager
    }

    /// Binds the pipeline: an immediate sync from the current session,
    /// a pump over session changes and a pump reacting to the wallet's
    /// `addressesChanged` event. Idempotent until [`unsubscribe`].
    ///
    /// [`unsubscribe`]: Wallet::unsubscribe
    pub fn subscribe(&self) -> Result<()> {
        let mut pumps = self.inner.pumps.lock().map_err(|_| Error::LockError)?;
        if !pumps.is_empty() {
            return Ok(());
        }

        let mut sessions = self.inner.manager.session_watch();
        self.sync_from_session(sessions.borrow_and_update().clone());
        let weak = Arc::downgrade(&self.inner);
        pumps.push(tokio::spawn(async move {
            while sessions.changed().await.is_ok() {
                let session = sessions.borrow_and_update().clone();
                let Some(inner) = weak.upgrade() else { return };
                Wallet { inner }.sync_from_session(session);
            }
        }));

        let mut events = self.inner.manager.client_events()?;
        let weak = Arc::downgrade(&self.inner);
        pumps.push(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ClientEvent::AddressesChanged) => {
                        let Some(inner) = weak.upgrade() else { return };
                        Wallet { inner }.refetch_addresses().await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => {
                        warn!("wallet event stream lagged by {n} events");
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        }));
        Ok(())
    }

    pub fn unsubscribe(&self) {
        if let Ok(mut guard) = self.inner.pumps.lock() {
            for handle in guard.drain(..) {
                handle.abort();
            }
        }
    }

    /// Validated payment address from the current session, without the
    /// family prefix.
    #[must_use]
    pub fn address(&self) -> Option<String> {
        self.inner.address.lock().ok().and_then(|g| g.clone())
    }

    /// Token-aware re-encoding of [`address`](Wallet::address).
    #[must_use]
    pub fn token_address(&self) -> Option<String> {
        self.inner.token_address.lock().ok().and_then(|g| g.clone())
    }

    #[must_use]
    pub fn address_error(&self) -> Option<Error> {
        self.inner.address_error.lock().ok().and_then(|g| g.clone())
    }

    #[must_use]
    pub fn token_address_error(&self) -> Option<Error> {
        self.inner
            .token_address_error
            .lock()
            .ok()
            .and_then(|g| g.clone())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.manager.is_connected()
    }

    /// True when any stage of the stack holds an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.inner.manager.connect_error().is_some()
            || self.inner.manager.disconnect_error().is_some()
            || self.address_error().is_some()
            || self.token_address_error().is_some()
    }

    /// Asks the wallet for its current address list and adopts the
    /// first entry. A failed fetch keeps the previously known address
    /// and only records the error: a transient failure must never
    /// blank a known-good address.
    pub async fn refetch_addresses(&self) {
        self.inner.loading.store(true, Ordering::SeqCst);
        match self.inner.manager.get_addresses().await {
            Ok(addresses) => {
                // get_addresses rejects an empty list
                if let Some(first) = addresses.into_iter().next() {
                    self.set_address(Some(first));
                    self.set_address_error(None);
                }
            }
            Err(e) => {
                debug!("address refetch failed, previous address remains: {e}");
                self.set_address_error(Some(e));
            }
        }
        self.inner.loading.store(false, Ordering::SeqCst);
        self.derive_token_address();
    }

    fn sync_from_session(&self, session: Option<Session>) {
        let Some(session) = session else {
            self.set_address(None);
            self.derive_token_address();
            return;
        };
        let Some(account) = session.first_account() else {
            self.set_address(None);
            self.set_address_error(Some(Error::NoSessionAddress));
            self.derive_token_address();
            return;
        };

        let address = account.address.clone();
        debug!("session namespace address: {address}");
        match cashaddr::decode(&address, self.prefix()) {
            Ok(_) => {
                self.set_address(Some(address));
                self.set_address_error(None);
            }
            Err(e) => {
                self.set_address(None);
                self.set_address_error(Some(Error::InvalidSessionAddress {
                    address,
                    source: e,
                }));
            }
        }
        self.derive_token_address();
    }

    /// Re-run after every address change. A derivation failure is
    /// recorded on its own slot and never clears the plain address.
    fn derive_token_address(&self) {
        let Some(address) = self.address() else {
            self.set_token_address(None);
            self.set_token_address_error(None);
            return;
        };
        match cashaddr::to_token_address(&address, self.prefix()) {
            Ok(token_address) => {
                self.set_token_address(Some(token_address));
                self.set_token_address_error(None);
            }
            Err(e) => {
                self.set_token_address(None);
                self.set_token_address_error(Some(e.into()));
            }
        }
    }

    fn prefix(&self) -> &'static str {
        self.inner.manager.config().network().address_prefix()
    }

    fn set_address(&self, address: Option<String>) {
        store(&self.inner.address, address, "address");
    }

    fn set_token_address(&self, address: Option<String>) {
        store(&self.inner.token_address, address, "token address");
    }

    fn set_address_error(&self, error: Option<Error>) {
        store(&self.inner.address_error, error, "address error");
    }

    fn set_token_address_error(&self, error: Option<Error>) {
        store(&self.inner.token_address_error, error, "token address error");
    }
}
