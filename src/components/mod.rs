mod account_label;
mod app;
mod connect_button;
mod connection_provider;
mod home;

pub use account_label::AccountLabel;
pub use app::{App, AppProps};
pub use connect_button::{ConnectButton, ConnectButtonProps};
pub use connection_provider::{ConnectionProvider, ConnectionProviderProps};
pub use home::{greeting, Home};
