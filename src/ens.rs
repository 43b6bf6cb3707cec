//! ENS reverse resolution over plain `eth_call`.
//!
//! A reverse lookup walks three contracts:
//! 1. the registry, for the resolver of `<addr>.addr.reverse`;
//! 2. that resolver, for `name(node)`;
//! 3. the forward resolver of the returned name, for `addr(node)`.
//!
//! A name only counts when step 3 points back at the address we started from.

use async_trait::async_trait;
use log::debug;
use sha3::{Digest, Keccak256};

use crate::address::Address;
use crate::error::{ConnectError, Result};

/// `resolver(bytes32)`
pub const RESOLVER_SELECTOR: [u8; 4] = [0x01, 0x78, 0xb8, 0xbf];
/// `name(bytes32)`
pub const NAME_SELECTOR: [u8; 4] = [0x69, 0x1f, 0x34, 0x31];
/// `addr(bytes32)`
pub const ADDR_SELECTOR: [u8; 4] = [0x3b, 0x3b, 0x57, 0xde];

/// Read-only contract call against the connected chain.
#[async_trait(?Send)]
pub trait EthCall {
    async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>>;
}

/// EIP-137 namehash.
pub fn namehash(name: &str) -> [u8; 32] {
    let mut node = [0u8; 32];
    for label in name.rsplit('.').filter(|label| !label.is_empty()) {
        let label_hash = Keccak256::digest(label.as_bytes());
        let mut combined = [0u8; 64];
        combined[..32].copy_from_slice(&node);
        combined[32..].copy_from_slice(&label_hash);
        node = Keccak256::digest(combined).into();
    }
    node
}

/// UTS-46 maps a name to the form its records are registered under
/// (`Alice.ETH` becomes `alice.eth`).
pub fn normalize(name: &str) -> Result<String> {
    let (normalized, checked) = idna::Config::default()
        .use_std3_ascii_rules(false)
        .transitional_processing(false)
        .check_hyphens(false)
        .to_unicode(name);
    checked.map_err(|e| ConnectError::Resolution(format!("cannot normalize {name:?}: {e:?}")))?;
    Ok(normalized)
}

pub fn reverse_name(address: &Address) -> String {
    format!("{}.addr.reverse", address.to_hex_lower())
}

pub fn encode_node_call(selector: [u8; 4], node: &[u8; 32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&selector);
    data.extend_from_slice(node);
    data
}

/// Decodes a single `address` return value. An empty return, which is what a
/// call to an account without code yields, reads as the zero address.
pub fn decode_address(data: &[u8]) -> Result<Address> {
    if data.is_empty() {
        return Ok(Address::ZERO);
    }
    let word: &[u8; 32] = data
        .get(..32)
        .and_then(|w| w.try_into().ok())
        .ok_or_else(|| ConnectError::Resolution(format!("short address return: {} bytes", data.len())))?;
    Ok(Address::from_word(word))
}

/// Decodes a single dynamic `string` return value. Empty return data reads as
/// an empty string.
pub fn decode_string(data: &[u8]) -> Result<String> {
    if data.is_empty() {
        return Ok(String::new());
    }
    let offset = read_usize(data, 0)?;
    let len = read_usize(data, offset)?;
    let start = offset
        .checked_add(32)
        .ok_or_else(|| ConnectError::Resolution("string offset overflow".into()))?;
    let bytes = start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| ConnectError::Resolution(format!("string of {len} bytes runs past return data")))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ConnectError::Resolution(format!("name is not utf-8: {e}")))
}

fn read_usize(data: &[u8], at: usize) -> Result<usize> {
    let word = at
        .checked_add(32)
        .and_then(|end| data.get(at..end))
        .ok_or_else(|| ConnectError::Resolution(format!("no abi word at offset {at}")))?;
    if word[..24].iter().any(|b| *b != 0) {
        return Err(ConnectError::Resolution(format!("abi word at offset {at} out of range")));
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(low))
        .map_err(|_| ConnectError::Resolution(format!("abi word at offset {at} out of range")))
}

async fn resolver_of<C: EthCall + ?Sized>(client: &C, registry: Address, node: &[u8; 32]) -> Result<Address> {
    let raw = client
        .eth_call(registry, encode_node_call(RESOLVER_SELECTOR, node))
        .await?;
    decode_address(&raw)
}

/// Reverse-resolves `address` to its primary ENS name.
///
/// `Ok(None)` covers every "no name" outcome: no reverse resolver, an empty
/// name, a name that does not normalize, or a name whose forward record
/// points elsewhere. The forward check runs on the normalized name; the name
/// is returned as the reverse record spells it.
pub async fn lookup_address<C: EthCall + ?Sized>(
    client: &C,
    registry: Address,
    address: Address,
) -> Result<Option<String>> {
    let reverse_node = namehash(&reverse_name(&address));
    let resolver = resolver_of(client, registry, &reverse_node).await?;
    if resolver.is_zero() {
        debug!("no reverse resolver for {address}");
        return Ok(None);
    }

    let raw = client
        .eth_call(resolver, encode_node_call(NAME_SELECTOR, &reverse_node))
        .await?;
    let name = decode_string(&raw)?;
    if name.is_empty() {
        debug!("empty reverse record for {address}");
        return Ok(None);
    }

    let normalized = match normalize(&name) {
        Ok(normalized) => normalized,
        Err(err) => {
            debug!("reverse record for {address} is not a valid name: {err}");
            return Ok(None);
        }
    };
    let forward_node = namehash(&normalized);
    let forward_resolver = resolver_of(client, registry, &forward_node).await?;
    if forward_resolver.is_zero() {
        debug!("{name} has no forward resolver");
        return Ok(None);
    }
    let raw = client
        .eth_call(forward_resolver, encode_node_call(ADDR_SELECTOR, &forward_node))
        .await?;
    let forward = decode_address(&raw)?;
    if forward != address {
        debug!("{name} resolves to {forward}, not {address}");
        return Ok(None);
    }

    Ok(Some(name))
}
