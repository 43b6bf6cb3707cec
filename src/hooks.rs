use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::controller::{ConnectionController, LifecycleEvent};
use crate::state::ConnectionState;

#[derive(Clone, PartialEq)]
pub struct UseConnectionHandle {
    controller: ConnectionController,
    state: UseStateHandle<ConnectionState>,
}

impl UseConnectionHandle {
    pub(crate) fn new(controller: ConnectionController, state: UseStateHandle<ConnectionState>) -> Self {
        Self { controller, state }
    }

    pub fn connected(&self) -> bool {
        self.state.connected
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn display_name(&self) -> String {
        self.state.greeting_name().to_string()
    }

    /// Starts a connect attempt in the background. The state only changes if
    /// the attempt succeeds.
    pub fn connect(&self) {
        let controller = self.controller.clone();
        let state = self.state.clone();
        spawn_local(async move {
            let next = controller.connect_wallet(&state).await;
            if next != *state {
                state.set(next);
            }
        });
    }
}

#[hook]
pub fn use_connection(controller: ConnectionController) -> UseConnectionHandle {
    let state = use_state(ConnectionState::default);

    {
        let handle = UseConnectionHandle::new(controller.clone(), state.clone());
        use_effect_with_deps(
            move |_| {
                if handle
                    .controller
                    .handle_event(LifecycleEvent::Mounted, handle.state())
                {
                    handle.connect();
                }
                || ()
            },
            (),
        );
    }

    UseConnectionHandle::new(controller, state)
}
