use async_trait::async_trait;
use log::debug;

use crate::address::Address;
use crate::ens::{self, EthCall};
use crate::error::{ConnectError, Result};
use crate::state::DisplayIdentity;

/// Turns an address into its registered name, if it has one.
#[async_trait(?Send)]
pub trait ReverseResolver {
    async fn lookup_address(&self, address: &str) -> Result<Option<String>>;
}

/// ENS reverse resolution on top of any [`EthCall`] client.
pub struct EnsResolver<'a, C: ?Sized> {
    client: &'a C,
    registry: Address,
}

impl<'a, C: EthCall + ?Sized> EnsResolver<'a, C> {
    pub fn new(client: &'a C, registry: Address) -> Self {
        Self { client, registry }
    }
}

#[async_trait(?Send)]
impl<'a, C: EthCall + ?Sized> ReverseResolver for EnsResolver<'a, C> {
    async fn lookup_address(&self, address: &str) -> Result<Option<String>> {
        let address: Address = address.parse()?;
        ens::lookup_address(self.client, self.registry, address).await
    }
}

/// One reverse lookup, no caching and no retry.
///
/// A name wins over the address; without one the input address is kept as
/// the raw label. Lookup failures come back as [`ConnectError::Resolution`].
pub async fn resolve_display_name<R: ReverseResolver + ?Sized>(
    address: &str,
    provider: &R,
) -> Result<DisplayIdentity> {
    let name = provider.lookup_address(address).await.map_err(|e| match e {
        ConnectError::Resolution(_) => e,
        other => ConnectError::Resolution(other.to_string()),
    })?;

    match name {
        Some(name) if !name.is_empty() => {
            debug!("{address} resolved to {name}");
            Ok(DisplayIdentity::named(name))
        }
        _ => {
            debug!("{address} has no name, showing the address");
            Ok(DisplayIdentity::unnamed(address))
        }
    }
}
