// Scoped control channel for interface ioctls.
//
// One socket is opened per probe call and closed when the `ControlSocket`
// is dropped, whichever strategy answered or failed.

use crate::sys::IfReq;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

pub(crate) struct ControlSocket {
    fd: OwnedFd,
}

impl ControlSocket {
    /// Open an `AF_INET` datagram socket to carry interface ioctls
    pub(crate) fn open() -> io::Result<Self> {
        // SAFETY: plain socket(2) call, no pointers involved
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: fd was just returned by socket(2) and has no other owner
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { fd })
    }

    /// Issue `request` against `req`
    pub(crate) fn ioctl(&self, request: u32, req: &mut IfReq) -> io::Result<()> {
        // SAFETY: req is a live, correctly sized ifreq for the duration of
        // the call; any pointer stored in it outlives the call as well
        let rc = unsafe { libc::ioctl(self.fd.as_raw_fd(), request as _, req as *mut IfReq) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}
