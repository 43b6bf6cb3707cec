use yew::prelude::*;

use crate::controller::ConnectionController;
use crate::hooks::{use_connection, UseConnectionHandle};

#[derive(Properties, PartialEq)]
pub struct ConnectionProviderProps {
    pub controller: ConnectionController,
    #[prop_or_default]
    pub children: Children,
}

/// Runs the connection lifecycle and shares it with every child.
#[function_component]
pub fn ConnectionProvider(props: &ConnectionProviderProps) -> Html {
    let connection = use_connection(props.controller.clone());

    html! {
        <ContextProvider<UseConnectionHandle> context={connection}>
            {props.children.clone()}
        </ContextProvider<UseConnectionHandle>>
    }
}
