use crate::encoding::MAX_MACHINE_ID;
use crate::error::{BoxDynError, Error};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::debug;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A strategy for identifying this host with a 10-bit machine ID.
///
/// The built-in strategy hashes the host's private address
/// ([`PrivateIpMachineId`]). A fixed value ([`StaticMachineId`]) or any closure
/// returning `Result<u16, BoxDynError>` can be plugged in instead.
pub trait MachineIdSource {
    fn derive(&self) -> Result<u16, Error>;
}

impl<F> MachineIdSource for F
where
    F: Fn() -> Result<u16, BoxDynError>,
{
    fn derive(&self) -> Result<u16, Error> {
        self().map_err(Error::MachineIdFailed)
    }
}

/// A machine ID assigned from configuration or an external registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticMachineId(pub u16);

impl MachineIdSource for StaticMachineId {
    fn derive(&self) -> Result<u16, Error> {
        Ok(self.0)
    }
}

/// Derives the machine ID by hashing the first private address found on an
/// active, non-loopback interface.
///
/// Interface order is decided by the OS, so a host with several private
/// addresses may derive a different ID after a reboot. With only 1024
/// buckets, two hosts of a large fleet can also land on the same ID.
#[cfg(feature = "ip-fallback")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateIpMachineId;

#[cfg(feature = "ip-fallback")]
impl MachineIdSource for PrivateIpMachineId {
    fn derive(&self) -> Result<u16, Error> {
        machine_id_from_addrs(interface_addrs())
    }
}

/// Addresses of all interfaces that are up, in enumeration order.
#[cfg(feature = "ip-fallback")]
pub fn interface_addrs() -> Vec<IpAddr> {
    pnet_datalink::interfaces()
        .iter()
        .filter(|iface| iface.is_up() && !iface.is_loopback())
        .flat_map(|iface| iface.ips.iter().map(|network| network.ip()))
        .collect()
}

/// Pick the first private, non-loopback address out of `addrs` and hash it to
/// a machine ID.
pub fn machine_id_from_addrs<I>(addrs: I) -> Result<u16, Error>
where
    I: IntoIterator<Item = IpAddr>,
{
    let ip = first_private_ip(addrs).ok_or(Error::MachineIdUnavailable)?;
    let hash = fnv1a_32(ip.to_string().as_bytes());
    let machine_id = (hash % (u32::from(MAX_MACHINE_ID) + 1)) as u16;
    debug!(%ip, hash, machine_id, "derived machine id from private address");
    Ok(machine_id)
}

/// The first private address, skipping loopback entries.
pub fn first_private_ip<I>(addrs: I) -> Option<IpAddr>
where
    I: IntoIterator<Item = IpAddr>,
{
    addrs
        .into_iter()
        .find(|ip| !ip.is_loopback() && is_private_ip(ip))
}

pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_private_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_private_ipv6(ipv6),
    }
}

// 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    let octets = ip.octets();
    matches!(octets[0], 10)
        || (octets[0] == 172 && (16..=31).contains(&octets[1]))
        || (octets[0] == 192 && octets[1] == 168)
}

// fc00::/7 (Unique Local Address)
fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

/// 32-bit FNV-1a.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
