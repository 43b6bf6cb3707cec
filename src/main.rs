#[cfg(target_arch = "wasm32")]
fn main() {
    use ens_dapp::browser;
    use ens_dapp::config::{AppConfig, NetworkConfig};
    use ens_dapp::{App, AppProps};

    browser::init_logging();
    browser::set_document_title(&AppConfig::default().title);

    let controller = browser::controller(NetworkConfig::sepolia());
    yew::Renderer::<App>::with_props(AppProps { controller }).render();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("ens-dapp runs in the browser, build it for wasm32 with `trunk serve`");
}
