use yew::prelude::*;

use super::{AccountLabel, ConnectButton};
use crate::config::AppConfig;
use crate::hooks::UseConnectionHandle;
use crate::state::ConnectionState;

/// Heading text. Disconnected pages greet nobody in particular.
pub fn greeting(prefix: &str, state: &ConnectionState) -> String {
    format!("{prefix} {}!", state.greeting_name())
}

#[function_component]
pub fn Home() -> Html {
    let connection = use_context::<UseConnectionHandle>().expect(
        "no connection found. you must wrap your components in a <ConnectionProvider/>",
    );
    let config = use_memo(|_| AppConfig::default(), ());

    let on_connect = {
        let connection = connection.clone();
        Callback::from(move |_: ()| connection.connect())
    };

    html! {
        <div>
            <div class="main">
                <div>
                    <h1 class="title">
                        {greeting(&config.greeting_prefix, connection.state())}
                    </h1>
                    <div class="description">
                        {config.blurb.clone()}
                    </div>
                    <ConnectButton connected={connection.connected()} {on_connect} />
                </div>
                <div>
                    <img class="image" src={config.image.clone()} />
                </div>
            </div>

            <footer class="footer">
                {config.footer.clone()}
                <AccountLabel />
            </footer>
        </div>
    }
}
