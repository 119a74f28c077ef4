// Kernel structures and request numbers for the link queries.
//
// Layouts mirror <linux/if.h>, <linux/ethtool.h>, <linux/mii.h> and
// <linux/wireless.h>. `struct iwreq` shares its first 32 bytes with
// `struct ifreq` (name followed by a 16-byte sockaddr for SIOCGIWAP), so a
// single request type serves all four queries.

use libc::{IFNAMSIZ, c_char, c_short, c_void, sockaddr};
use std::io;

pub(crate) const SIOCGIFFLAGS: u32 = 0x8913;
pub(crate) const SIOCETHTOOL: u32 = 0x8946;
pub(crate) const SIOCGMIIPHY: u32 = 0x8947;
pub(crate) const SIOCGMIIREG: u32 = 0x8948;
pub(crate) const SIOCGIWAP: u32 = 0x8B15;

/// Get link status (`struct ethtool_value`)
pub(crate) const ETHTOOL_GLINK: u32 = 0x0000_000a;

/// Basic mode status register
pub(crate) const MII_BMSR: u16 = 0x01;
/// Link status bit of `MII_BMSR`
pub(crate) const BMSR_LSTATUS: u16 = 0x0004;

/// Driver signals operational state (carrier)
pub(crate) const IFF_RUNNING: c_short = 0x40;

pub(crate) const ETH_ALEN: usize = 6;

/// `struct ethtool_value`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EthtoolValue {
    pub cmd: u32,
    pub data: u32,
}

/// `struct mii_ioctl_data`, overlaid on the ifreq union
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MiiIoctlData {
    pub phy_id: u16,
    pub reg_num: u16,
    pub val_in: u16,
    pub val_out: u16,
}

/// The `ifr_ifru` union of `struct ifreq`
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) union IfrIfru {
    pub flags: c_short,
    pub data: *mut c_void,
    pub hwaddr: sockaddr,
    pub mii: MiiIoctlData,
    // largest member is struct ifmap
    raw: [u8; 24],
}

/// `struct ifreq`
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct IfReq {
    pub name: [c_char; IFNAMSIZ],
    pub ifru: IfrIfru,
}

impl IfReq {
    /// Zeroed request addressed to `interface`
    pub(crate) fn new(interface: &str) -> io::Result<Self> {
        let bytes = interface.as_bytes();
        if bytes.is_empty() || bytes.len() >= IFNAMSIZ || bytes.contains(&0) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid interface name '{}'", interface),
            ));
        }

        let mut req = IfReq {
            name: [0; IFNAMSIZ],
            ifru: IfrIfru { raw: [0; 24] },
        };
        for (dst, src) in req.name.iter_mut().zip(bytes) {
            *dst = *src as c_char;
        }

        Ok(req)
    }
}
