pub mod address;
pub mod components;
pub mod config;
pub mod controller;
pub mod ens;
pub mod error;
pub mod hooks;
pub mod resolution;
pub mod state;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use components::{App, AppProps};
pub use controller::ConnectionController;
pub use error::{ConnectError, Result};
pub use state::ConnectionState;
