/// What name resolution produced for an account. Exactly one side is filled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayIdentity {
    display_name: String,
    raw_address: String,
}

impl DisplayIdentity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            display_name: name.into(),
            raw_address: String::new(),
        }
    }

    pub fn unnamed(address: impl Into<String>) -> Self {
        Self {
            display_name: String::new(),
            raw_address: address.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn raw_address(&self) -> &str {
        &self.raw_address
    }
}

/// The signing identity of the connected account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signer {
    pub address: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connected,
}

/// Page-session connection state. Starts empty and is only ever replaced by
/// the result of a complete connect attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub connected: bool,
    pub display_name: String,
    pub raw_address: String,
}

impl ConnectionState {
    pub fn connected(identity: DisplayIdentity) -> Self {
        Self {
            connected: true,
            display_name: identity.display_name,
            raw_address: identity.raw_address,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.connected {
            Phase::Connected
        } else {
            Phase::Disconnected
        }
    }

    /// The name to greet: ENS name when there is one, else the address.
    pub fn greeting_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.raw_address
        } else {
            &self.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_empty_and_disconnected() {
        let state = ConnectionState::default();
        assert!(!state.connected);
        assert_eq!(state.phase(), Phase::Disconnected);
        assert_eq!(state.greeting_name(), "");
    }

    #[test]
    fn connected_with_name() {
        let state = ConnectionState::connected(DisplayIdentity::named("alice.eth"));
        assert_eq!(state.phase(), Phase::Connected);
        assert_eq!(state.display_name, "alice.eth");
        assert_eq!(state.raw_address, "");
        assert_eq!(state.greeting_name(), "alice.eth");
    }

    #[test]
    fn connected_without_name_greets_address() {
        let state = ConnectionState::connected(DisplayIdentity::unnamed("0xABC"));
        assert_eq!(state.display_name, "");
        assert_eq!(state.raw_address, "0xABC");
        assert_eq!(state.greeting_name(), "0xABC");
    }
}
