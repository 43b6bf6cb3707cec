use yew::prelude::*;

use super::{ConnectionProvider, Home};
use crate::controller::ConnectionController;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub controller: ConnectionController,
}

#[function_component]
pub fn App(props: &AppProps) -> Html {
    html! {
        <ConnectionProvider controller={props.controller.clone()}>
            <Home />
        </ConnectionProvider>
    }
}
