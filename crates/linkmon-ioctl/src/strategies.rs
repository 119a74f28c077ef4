// The four link queries, in fallback order.
//
// Each query returns `Ok(link)` when the kernel answered and the raw
// kernel error otherwise; the chain in `linkmon_core::detection` decides
// what to do with either.

use crate::socket::ControlSocket;
use crate::sys::{
    BMSR_LSTATUS, ETH_ALEN, ETHTOOL_GLINK, EthtoolValue, IFF_RUNNING, IfReq, MII_BMSR,
    SIOCETHTOOL, SIOCGIFFLAGS, SIOCGIWAP, SIOCGMIIPHY, SIOCGMIIREG,
};
use linkmon_core::{DetectionMethod, Strategy};
use std::io;

pub(crate) const CHAIN: [Strategy<ControlSocket>; 4] = [
    Strategy::new(DetectionMethod::Ethtool, ethtool_link),
    Strategy::new(DetectionMethod::Mii, mii_link),
    Strategy::new(DetectionMethod::Wireless, wireless_link),
    Strategy::new(DetectionMethod::InterfaceFlags, flags_link),
];

fn ethtool_link(socket: &ControlSocket, interface: &str) -> io::Result<bool> {
    let mut edata = EthtoolValue {
        cmd: ETHTOOL_GLINK,
        data: 0,
    };
    let mut req = IfReq::new(interface)?;
    req.ifru.data = (&mut edata as *mut EthtoolValue).cast();

    socket.ioctl(SIOCETHTOOL, &mut req)?;
    Ok(edata.data != 0)
}

fn mii_link(socket: &ControlSocket, interface: &str) -> io::Result<bool> {
    let mut req = IfReq::new(interface)?;

    // fills in phy_id
    socket.ioctl(SIOCGMIIPHY, &mut req)?;

    // SAFETY: SIOCGMIIPHY succeeded, so the union holds mii_ioctl_data
    let mut mii = unsafe { req.ifru.mii };
    mii.reg_num = MII_BMSR;
    req.ifru.mii = mii;

    socket.ioctl(SIOCGMIIREG, &mut req)?;

    // SAFETY: as above, SIOCGMIIREG wrote val_out
    let bmsr = unsafe { req.ifru.mii }.val_out;
    Ok(bmsr & BMSR_LSTATUS != 0)
}

fn wireless_link(socket: &ControlSocket, interface: &str) -> io::Result<bool> {
    let mut req = IfReq::new(interface)?;
    socket.ioctl(SIOCGIWAP, &mut req)?;

    // SAFETY: SIOCGIWAP stores the AP address as a sockaddr
    let ap_addr = unsafe { req.ifru.hwaddr };
    let mut mac = [0u8; ETH_ALEN];
    for (dst, src) in mac.iter_mut().zip(ap_addr.sa_data.iter()) {
        *dst = *src as u8;
    }

    Ok(is_associated(&mac))
}

fn flags_link(socket: &ControlSocket, interface: &str) -> io::Result<bool> {
    let mut req = IfReq::new(interface)?;
    socket.ioctl(SIOCGIFFLAGS, &mut req)?;

    // SAFETY: SIOCGIFFLAGS stores ifr_flags
    let flags = unsafe { req.ifru.flags };
    Ok(flags & IFF_RUNNING != 0)
}

/// Whether an access point address denotes a real association
///
/// Drivers report 00:00:00:00:00:00, FF:FF:FF:FF:FF:FF or
/// 44:44:44:44:44:44 when not associated.
pub(crate) fn is_associated(mac: &[u8; ETH_ALEN]) -> bool {
    let uniform = mac.iter().all(|b| *b == mac[0]);
    !uniform || !matches!(mac[0], 0x00 | 0xFF | 0x44)
}
