#![allow(dead_code)]

use {
    async_trait::async_trait,
    bch_connect::{
        Account,
        Accounts,
        ClientEvent,
        ClientHandshake,
        ClientInitOptions,
        ClientVariant,
        Config,
        ConnectBuilder,
        ConnectRequest,
        DisconnectReason,
        Error,
        Metadata,
        Modal,
        ModalSource,
        ModalTheme,
        NamespaceName,
        Namespaces,
        Network,
        ProposeFuture,
        Result,
        RpcRequest,
        Session,
        SessionManager,
        SessionTopic,
        SettledNamespace,
        SignClient,
        SignClientFactory,
    },
    serde_json::Value,
    std::{
        collections::{BTreeMap, VecDeque},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
            Mutex,
        },
        time::Duration,
    },
    tokio::sync::{broadcast, oneshot},
};

/// CashAddr specification test vector; valid under the `bitcoincash`
/// prefix.
pub const MAIN_ADDRESS: &str = "qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2";
pub const OTHER_MAIN_ADDRESS: &str = "qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a";

pub async fn yield_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

pub fn metadata() -> Metadata {
    Metadata {
        name: String::from("mock-dapp"),
        description: String::from("bch-connect test dapp"),
        url: String::from("https://example.invalid"),
        icons: vec![],
    }
}

pub fn session(topic: &str, accounts: &[&str]) -> Session {
    Session {
        topic: topic.into(),
        namespaces: Namespaces(BTreeMap::from([(NamespaceName::Bch, SettledNamespace {
            accounts: Accounts(accounts.iter().map(|a| Account::new(*a)).collect()),
            ..Default::default()
        })])),
        expiry: None,
    }
}

#[derive(Default)]
pub struct MockClientState {
    /// URI handed back by `connect`.
    pub uri: Option<String>,
    /// Outcome delivered through the approval future, taken once.
    pub approval: Option<Result<Option<Session>>>,
    pub sessions: Vec<Session>,
    pub connect_requests: Vec<ConnectRequest>,
    pub rpc_requests: Vec<RpcRequest>,
    pub rpc_results: VecDeque<Result<Value>>,
    pub disconnect_calls: Vec<SessionTopic>,
    pub disconnect_error: Option<Error>,
}

pub struct MockClient {
    state: Mutex<MockClientState>,
    events: broadcast::Sender<ClientEvent>,
}

impl MockClient {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(32);
        Arc::new(Self {
            state: Mutex::new(MockClientState::default()),
            events,
        })
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockClientState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl SignClient for MockClient {
    async fn connect(&self, request: ConnectRequest) -> Result<ClientHandshake> {
        let (uri, outcome) = self.with(|state| {
            state.connect_requests.push(request);
            (state.uri.clone(), state.approval.take())
        });
        let (tx, rx) = oneshot::channel();
        tx.send(outcome.unwrap_or(Ok(None))).ok();
        Ok(ClientHandshake {
            uri,
            approval: ProposeFuture::new(rx),
        })
    }

    async fn disconnect(&self, topic: SessionTopic, _reason: DisconnectReason) -> Result<()> {
        self.with(|state| {
            state.disconnect_calls.push(topic.clone());
            match state.disconnect_error.clone() {
                Some(e) => Err(e),
                None => {
                    state.sessions.retain(|s| s.topic != topic);
                    Ok(())
                }
            }
        })
    }

    async fn request(&self, request: RpcRequest) -> Result<Value> {
        self.with(|state| {
            state.rpc_requests.push(request);
            state
                .rpc_results
                .pop_front()
                .unwrap_or_else(|| Err(Error::Client(String::from("no rpc result configured"))))
        })
    }

    fn sessions(&self) -> Vec<Session> {
        self.with(|state| state.sessions.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}

#[derive(Default)]
pub struct MockModal {
    pub opened: Mutex<Vec<String>>,
    pub closed: AtomicUsize,
}

impl MockModal {
    pub fn open_uris(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Modal for MockModal {
    async fn open(&self, uri: &str) -> Result<()> {
        self.opened.lock().unwrap().push(String::from(uri));
        Ok(())
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }

    fn set_uri(&self, _uri: &str) {}

    fn set_theme(&self, _theme: ModalTheme) {}
}

pub struct MockFactory {
    client: Arc<MockClient>,
    pub created: Mutex<Vec<(ClientVariant, ClientInitOptions)>>,
    pub fail: Mutex<Option<Error>>,
}

impl MockFactory {
    pub fn new(client: Arc<MockClient>) -> Arc<Self> {
        Arc::new(Self {
            client,
            created: Mutex::new(Vec::new()),
            fail: Mutex::new(None),
        })
    }

    pub fn created_variants(&self) -> Vec<ClientVariant> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|(variant, _)| *variant)
            .collect()
    }
}

#[async_trait]
impl SignClientFactory for MockFactory {
    async fn create(
        &self,
        variant: ClientVariant,
        options: ClientInitOptions,
    ) -> Result<Arc<dyn SignClient>> {
        if let Some(e) = self.fail.lock().unwrap().clone() {
            return Err(e);
        }
        self.created.lock().unwrap().push((variant, options));
        Ok(self.client.clone())
    }
}

pub struct TestStuff {
    pub manager: SessionManager,
    pub client: Arc<MockClient>,
    pub modal: Arc<MockModal>,
    pub factory: Arc<MockFactory>,
}

pub fn test_config(network: Network, legacy: bool, modal: Arc<MockModal>) -> Config {
    Config::builder("987f2292c12194ae69ddb6c52ceb1d62", network, metadata())
        .modal(ModalSource::Instance(modal))
        .support_legacy_client(legacy)
        .build()
}

/// Builds an initialized, subscribed manager over fresh mocks.
pub async fn init_components(network: Network, legacy: bool) -> anyhow::Result<TestStuff> {
    bch_connect::init_tracing();
    let client = MockClient::new();
    let modal = Arc::new(MockModal::default());
    let factory = MockFactory::new(client.clone());
    let manager = ConnectBuilder::new(test_config(network, legacy, modal.clone()))
        .client_factory(factory.clone())
        .build()
        .await?;
    Ok(TestStuff {
        manager,
        client,
        modal,
        factory,
    })
}

/// Same as [`init_components`] but with a session already persisted by
/// the client, exercising startup hydration.
pub async fn connected_components(network: Network, legacy: bool) -> anyhow::Result<TestStuff> {
    bch_connect::init_tracing();
    let client = MockClient::new();
    client.with(|state| state.sessions.push(session("t1", &[MAIN_ADDRESS])));
    let modal = Arc::new(MockModal::default());
    let factory = MockFactory::new(client.clone());
    let manager = ConnectBuilder::new(test_config(network, legacy, modal.clone()))
        .client_factory(factory.clone())
        .build()
        .await?;
    Ok(TestStuff {
        manager,
        client,
        modal,
        factory,
    })
}
