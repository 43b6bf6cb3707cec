//! Wallet connection lifecycle.
//!
//! [`ConnectionController`] owns the one live [`WalletHandle`] of the page
//! session and runs the connect sequence:
//! broker connect, chain id check, signer address, reverse name lookup.
//! Either every step succeeds and the page becomes connected, or the attempt
//! is logged and the page stays where it was.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use log::{debug, error, info, warn};

use crate::config::NetworkConfig;
use crate::error::{ConnectError, Result};
use crate::resolution::{resolve_display_name, ReverseResolver};
use crate::state::{ConnectionState, DisplayIdentity, Phase, Signer};

/// Gateway to the user's wallet. Connecting may prompt the user.
#[async_trait(?Send)]
pub trait WalletBroker {
    async fn connect(&self) -> Result<Box<dyn ChainProvider>>;
}

/// A chain connection obtained through the wallet.
#[async_trait(?Send)]
pub trait ChainProvider: ReverseResolver {
    async fn chain_id(&self) -> Result<u64>;

    /// Address of the account the wallet signs for.
    async fn signer_address(&self) -> Result<String>;
}

/// Blocking user-facing notice.
pub trait Alerter {
    fn alert(&self, message: &str);
}

/// Builds a fresh broker for the target network on every reinitialization.
pub trait BrokerFactory {
    fn create(&self, network: &NetworkConfig) -> Rc<dyn WalletBroker>;
}

impl<F> BrokerFactory for F
where
    F: Fn(&NetworkConfig) -> Rc<dyn WalletBroker>,
{
    fn create(&self, network: &NetworkConfig) -> Rc<dyn WalletBroker> {
        self(network)
    }
}

#[derive(Clone)]
pub struct WalletHandle {
    generation: u64,
    broker: Rc<dyn WalletBroker>,
}

impl WalletHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for WalletHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletHandle")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The page was mounted with a fresh state.
    Mounted,
}

/// A completed connect sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub signer: Signer,
    pub identity: DisplayIdentity,
}

struct Inner {
    network: NetworkConfig,
    factory: Box<dyn BrokerFactory>,
    alerter: Box<dyn Alerter>,
    handle: RefCell<Option<WalletHandle>>,
    generation: Cell<u64>,
    in_flight: Cell<bool>,
}

/// Cheap to clone; clones share the same handle and in-flight guard.
#[derive(Clone)]
pub struct ConnectionController {
    inner: Rc<Inner>,
}

impl PartialEq for ConnectionController {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl ConnectionController {
    pub fn new(
        network: NetworkConfig,
        factory: impl BrokerFactory + 'static,
        alerter: impl Alerter + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                network,
                factory: Box::new(factory),
                alerter: Box::new(alerter),
                handle: RefCell::new(None),
                generation: Cell::new(0),
                in_flight: Cell::new(false),
            }),
        }
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.inner.network
    }

    pub fn handle(&self) -> Option<WalletHandle> {
        self.inner.handle.borrow().clone()
    }

    /// Drops the current handle, if any, and installs a new one.
    pub fn reinitialize(&self) -> WalletHandle {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        let handle = WalletHandle {
            generation,
            broker: self.inner.factory.create(&self.inner.network),
        };
        debug!("wallet handle #{generation} created for {}", self.inner.network.name);
        *self.inner.handle.borrow_mut() = Some(handle.clone());
        handle
    }

    /// Applies a lifecycle event. Returns whether a connect attempt should
    /// follow.
    pub fn handle_event(&self, event: LifecycleEvent, state: &ConnectionState) -> bool {
        match (event, state.phase()) {
            (LifecycleEvent::Mounted, Phase::Disconnected) => {
                self.reinitialize();
                true
            }
            (LifecycleEvent::Mounted, Phase::Connected) => false,
        }
    }

    /// Runs the full connect sequence once.
    pub async fn connect(&self) -> Result<Connection> {
        let handle = match self.handle() {
            Some(handle) => handle,
            None => self.reinitialize(),
        };
        debug!("connecting through wallet handle #{}", handle.generation);
        let provider = handle.broker.connect().await?;

        let network = &self.inner.network;
        let chain_id = provider.chain_id().await?;
        if !network.accepts(chain_id) {
            warn!("wallet is on chain {chain_id}, {} is {}", network.name, network.chain_id);
            self.inner.alerter.alert(&network.wrong_network_alert);
            return Err(ConnectError::WrongNetwork {
                expected: network.chain_id,
                actual: chain_id,
            });
        }

        let signer = Signer {
            address: provider.signer_address().await?,
        };
        let identity = resolve_display_name(&signer.address, &*provider).await?;
        Ok(Connection { signer, identity })
    }

    /// Connects and returns the next state. Failures are logged and leave
    /// `current` untouched; a call while another attempt is running is
    /// skipped.
    pub async fn connect_wallet(&self, current: &ConnectionState) -> ConnectionState {
        if current.connected {
            return current.clone();
        }
        if self.inner.in_flight.replace(true) {
            debug!("connect attempt already running, skipping");
            return current.clone();
        }
        let _in_flight = InFlight(&self.inner.in_flight);

        match self.connect().await {
            Ok(connection) => {
                info!("wallet connected as {}", connection.signer.address);
                ConnectionState::connected(connection.identity)
            }
            Err(err) => {
                error!("{err}");
                current.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::channel::oneshot;
    use futures::executor::block_on;

    use super::*;
    use crate::config::SEPOLIA_CHAIN_ID;

    const ADDRESS: &str = "0xABC0000000000000000000000000000000000001";

    #[derive(Clone)]
    struct FakeProvider {
        chain_id: u64,
        address: String,
        name: Result<Option<String>>,
    }

    #[async_trait(?Send)]
    impl ReverseResolver for FakeProvider {
        async fn lookup_address(&self, _address: &str) -> Result<Option<String>> {
            self.name.clone()
        }
    }

    #[async_trait(?Send)]
    impl ChainProvider for FakeProvider {
        async fn chain_id(&self) -> Result<u64> {
            Ok(self.chain_id)
        }

        async fn signer_address(&self) -> Result<String> {
            Ok(self.address.clone())
        }
    }

    struct FakeBroker {
        provider: Result<FakeProvider>,
        connects: Rc<Cell<usize>>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait(?Send)]
    impl WalletBroker for FakeBroker {
        async fn connect(&self) -> Result<Box<dyn ChainProvider>> {
            self.connects.set(self.connects.get() + 1);
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.provider
                .clone()
                .map(|p| Box::new(p) as Box<dyn ChainProvider>)
        }
    }

    #[derive(Clone, Default)]
    struct Alerts(Rc<RefCell<Vec<String>>>);

    impl Alerter for Alerts {
        fn alert(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    struct Harness {
        controller: ConnectionController,
        alerts: Alerts,
        connects: Rc<Cell<usize>>,
        brokers_built: Rc<Cell<usize>>,
    }

    fn harness(provider: Result<FakeProvider>) -> Harness {
        harness_gated(provider, None)
    }

    fn harness_gated(provider: Result<FakeProvider>, gate: Option<oneshot::Receiver<()>>) -> Harness {
        let alerts = Alerts::default();
        let connects = Rc::new(Cell::new(0));
        let brokers_built = Rc::new(Cell::new(0));
        let gate = RefCell::new(gate);
        let factory = {
            let connects = connects.clone();
            let brokers_built = brokers_built.clone();
            move |_: &NetworkConfig| -> Rc<dyn WalletBroker> {
                brokers_built.set(brokers_built.get() + 1);
                Rc::new(FakeBroker {
                    provider: provider.clone(),
                    connects: connects.clone(),
                    gate: RefCell::new(gate.borrow_mut().take()),
                })
            }
        };
        Harness {
            controller: ConnectionController::new(NetworkConfig::sepolia(), factory, alerts.clone()),
            alerts,
            connects,
            brokers_built,
        }
    }

    fn provider(chain_id: u64, name: Result<Option<String>>) -> FakeProvider {
        FakeProvider {
            chain_id,
            address: ADDRESS.into(),
            name,
        }
    }

    #[test]
    fn named_account_connects_with_display_name() {
        let h = harness(Ok(provider(SEPOLIA_CHAIN_ID, Ok(Some("alice.eth".into())))));
        let state = block_on(h.controller.connect_wallet(&ConnectionState::default()));
        assert_eq!(
            state,
            ConnectionState {
                connected: true,
                display_name: "alice.eth".into(),
                raw_address: String::new(),
            }
        );
        assert!(h.alerts.0.borrow().is_empty());
    }

    #[test]
    fn unnamed_account_connects_with_raw_address() {
        let h = harness(Ok(provider(SEPOLIA_CHAIN_ID, Ok(None))));
        let state = block_on(h.controller.connect_wallet(&ConnectionState::default()));
        assert_eq!(
            state,
            ConnectionState {
                connected: true,
                display_name: String::new(),
                raw_address: ADDRESS.into(),
            }
        );
    }

    #[test]
    fn wrong_network_alerts_once_and_stays_disconnected() {
        let h = harness(Ok(provider(1, Ok(Some("alice.eth".into())))));
        let err = block_on(h.controller.connect()).unwrap_err();
        assert_eq!(
            err,
            ConnectError::WrongNetwork {
                expected: SEPOLIA_CHAIN_ID,
                actual: 1
            }
        );
        assert_eq!(*h.alerts.0.borrow(), vec!["Change the network to sepolia".to_string()]);

        let state = block_on(h.controller.connect_wallet(&ConnectionState::default()));
        assert!(!state.connected);
        assert_eq!(h.alerts.0.borrow().len(), 2);
    }

    #[test]
    fn resolution_failure_leaves_state_disconnected() {
        let h = harness(Ok(provider(
            SEPOLIA_CHAIN_ID,
            Err(ConnectError::Resolution("rpc down".into())),
        )));
        let state = block_on(h.controller.connect_wallet(&ConnectionState::default()));
        assert_eq!(state, ConnectionState::default());
        assert!(h.alerts.0.borrow().is_empty());
    }

    #[test]
    fn provider_failure_leaves_state_disconnected() {
        let h = harness(Err(ConnectError::ProviderConnection("user rejected".into())));
        let state = block_on(h.controller.connect_wallet(&ConnectionState::default()));
        assert!(!state.connected);
        assert_eq!(h.connects.get(), 1);
    }

    #[test]
    fn retry_after_failure_runs_full_sequence_again() {
        let h = harness(Ok(provider(1, Ok(None))));
        let initial = ConnectionState::default();
        for attempt in 1..=3 {
            let state = block_on(h.controller.connect_wallet(&initial));
            assert!(!state.connected);
            assert_eq!(h.connects.get(), attempt);
            assert_eq!(h.alerts.0.borrow().len(), attempt);
        }
    }

    #[test]
    fn connected_state_is_terminal() {
        let h = harness(Ok(provider(SEPOLIA_CHAIN_ID, Ok(None))));
        let connected = ConnectionState::connected(DisplayIdentity::named("bob.eth"));
        let state = block_on(h.controller.connect_wallet(&connected));
        assert_eq!(state, connected);
        assert_eq!(h.connects.get(), 0);
        assert!(!h.controller.handle_event(LifecycleEvent::Mounted, &connected));
        assert!(h.controller.handle().is_none());
    }

    #[test]
    fn mount_reinitializes_single_handle() {
        let h = harness(Ok(provider(SEPOLIA_CHAIN_ID, Ok(None))));
        let initial = ConnectionState::default();
        assert!(h.controller.handle().is_none());

        assert!(h.controller.handle_event(LifecycleEvent::Mounted, &initial));
        assert_eq!(h.controller.handle().map(|h| h.generation()), Some(1));

        assert!(h.controller.handle_event(LifecycleEvent::Mounted, &initial));
        assert_eq!(h.controller.handle().map(|h| h.generation()), Some(2));
        assert_eq!(h.brokers_built.get(), 2);
    }

    #[test]
    fn connect_reuses_existing_handle() {
        let h = harness(Ok(provider(1, Ok(None))));
        h.controller.reinitialize();
        let initial = ConnectionState::default();
        block_on(h.controller.connect_wallet(&initial));
        block_on(h.controller.connect_wallet(&initial));
        assert_eq!(h.brokers_built.get(), 1);
        assert_eq!(h.connects.get(), 2);
    }

    #[test]
    fn overlapping_trigger_is_skipped() {
        let (release, gate) = oneshot::channel();
        let h = harness_gated(Ok(provider(SEPOLIA_CHAIN_ID, Ok(None))), Some(gate));
        let initial = ConnectionState::default();

        let (first, second) = block_on(async {
            let first = h.controller.connect_wallet(&initial);
            let second = async {
                let state = h.controller.connect_wallet(&initial).await;
                let _ = release.send(());
                state
            };
            futures::join!(first, second)
        });

        assert!(first.connected);
        assert!(!second.connected);
        assert_eq!(h.connects.get(), 1);

        // guard is released once the first attempt finished
        let again = block_on(h.controller.connect_wallet(&initial));
        assert!(again.connected);
        assert_eq!(h.connects.get(), 2);
    }
}
