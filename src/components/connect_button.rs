use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ConnectButtonProps {
    pub connected: bool,
    pub on_connect: Callback<()>,
}

#[function_component]
pub fn ConnectButton(props: &ConnectButtonProps) -> Html {
    if props.connected {
        return html! {
            <div class="status">{"Wallet connected"}</div>
        };
    }

    let onclick = props.on_connect.reform(|_: MouseEvent| ());
    html! {
        <button {onclick} class="button">
            {"Connect your wallet"}
        </button>
    }
}
