//! Browser side of the wallet connection: the injected EIP-1193 provider,
//! `window.alert`, and the document title.

use std::rc::Rc;

use async_trait::async_trait;
use log::{debug, error};
use wasm_bindgen::{JsCast, JsValue};
use web3::transports::eip_1193::{Eip1193, Provider};
use web3::types::{Bytes, CallRequest, H160, U256};
use web3::Web3;

use crate::address::Address;
use crate::config::{self, NetworkConfig};
use crate::controller::{Alerter, ChainProvider, ConnectionController, WalletBroker};
use crate::ens::EthCall;
use crate::error::{ConnectError, Result};
use crate::resolution::{EnsResolver, ReverseResolver};

pub fn init_logging() {
    wasm_logger::init(wasm_logger::Config::new(config::log_level()));
}

/// Controller wired to the injected wallet and `window.alert`.
pub fn controller(network: NetworkConfig) -> ConnectionController {
    ConnectionController::new(
        network,
        |network: &NetworkConfig| -> Rc<dyn WalletBroker> { Rc::new(InjectedWallet::new(network)) },
        WindowAlert,
    )
}

pub fn set_document_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|window| window.document()) {
        document.set_title(title);
    }
}

fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

pub struct WindowAlert;

impl Alerter for WindowAlert {
    fn alert(&self, message: &str) {
        let Some(window) = web_sys::window() else {
            error!("no window to alert: {message}");
            return;
        };
        if let Err(err) = window.alert_with_message(message) {
            error!("alert failed: {}", js_error_message(&err));
        }
    }
}

/// The wallet injected at `window.ethereum`.
pub struct InjectedWallet {
    ens_registry: String,
}

impl InjectedWallet {
    pub fn new(network: &NetworkConfig) -> Self {
        Self {
            ens_registry: network.ens_registry.clone(),
        }
    }
}

#[async_trait(?Send)]
impl WalletBroker for InjectedWallet {
    async fn connect(&self) -> Result<Box<dyn ChainProvider>> {
        let provider = Provider::default()
            .map_err(|err| ConnectError::ProviderConnection(js_error_message(&err)))?
            .ok_or_else(|| ConnectError::ProviderConnection("no injected ethereum provider".into()))?;
        let registry: Address = self.ens_registry.parse()?;
        let web3 = Web3::new(Eip1193::new(provider));

        let accounts = web3
            .eth()
            .request_accounts()
            .await
            .map_err(|err| ConnectError::ProviderConnection(err.to_string()))?;
        debug!("wallet exposed {} account(s)", accounts.len());

        Ok(Box::new(Web3Chain {
            web3,
            accounts,
            registry,
        }))
    }
}

pub struct Web3Chain {
    web3: Web3<Eip1193>,
    accounts: Vec<H160>,
    registry: Address,
}

#[async_trait(?Send)]
impl ChainProvider for Web3Chain {
    async fn chain_id(&self) -> Result<u64> {
        let id = self
            .web3
            .eth()
            .chain_id()
            .await
            .map_err(|err| ConnectError::ProviderConnection(err.to_string()))?;
        if id > U256::from(u64::MAX) {
            return Err(ConnectError::ProviderConnection(format!("chain id {id} out of range")));
        }
        Ok(id.low_u64())
    }

    async fn signer_address(&self) -> Result<String> {
        let account = self.accounts.first().ok_or(ConnectError::NoAccount)?;
        Ok(Address(account.0).to_checksum())
    }
}

#[async_trait(?Send)]
impl EthCall for Web3Chain {
    async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let request = CallRequest {
            to: Some(H160(to.0)),
            data: Some(Bytes(data)),
            ..Default::default()
        };
        let output = self
            .web3
            .eth()
            .call(request, None)
            .await
            .map_err(|err| ConnectError::Resolution(err.to_string()))?;
        Ok(output.0)
    }
}

#[async_trait(?Send)]
impl ReverseResolver for Web3Chain {
    async fn lookup_address(&self, address: &str) -> Result<Option<String>> {
        EnsResolver::new(self, self.registry)
            .lookup_address(address)
            .await
    }
}
