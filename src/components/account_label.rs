use crate::hooks::UseConnectionHandle;
use yew::prelude::*;

#[function_component]
pub fn AccountLabel() -> Html {
    let connection = use_context::<UseConnectionHandle>().expect(
        "no connection found. you must wrap your components in a <ConnectionProvider/>",
    );

    html! {
        <div class="account">
            if connection.connected() {
                {connection.display_name()}
            } else {
                {"Disconnected"}
            }
        </div>
    }
}
