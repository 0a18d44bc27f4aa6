/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::fmt;
use std::os::fd::{AsFd, AsRawFd, FromRawFd, OwnedFd};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::select::{select, FdSet};
use nix::sys::stat::Mode;
use nix::sys::time::TimeVal;
use nix::{ioctl_read, ioctl_readwrite};

use ipmi_macros::{DataAccess, MemberOffsets};

use crate::error::{IpmiError, IpmiResult};
use crate::helper::{buf2str, hexbuf};
use crate::ipmi::intf::IpmiIntf;
use crate::ipmi::ipmi::{IpmiRq, IpmiRs, IPMI_BUF_SIZE, IPMI_MAX_MSG_LENGTH};
use crate::logging::is_debug_enabled;
use crate::{debug2, debug3, debug5};

// Constants
pub const IPMI_MAX_ADDR_SIZE: usize = 0x20;
pub const IPMI_BMC_CHANNEL: u8 = 0xf;
pub const IPMI_SYSTEM_INTERFACE_ADDR_TYPE: i32 = 0x0c;

pub const IPMI_OPENIPMI_READ_TIMEOUT: Duration = Duration::from_secs(15);

static CURR_SEQ: AtomicI64 = AtomicI64::new(0);
fn next_seq() -> i64 {
    CURR_SEQ.fetch_add(1, Ordering::SeqCst)
}

/// Receive side address buffer, large enough for any address the driver
/// hands back.
#[repr(C)]
pub struct IpmiAddr {
    pub addr_type: i32,
    pub channel: i16,
    pub data: [u8; IPMI_MAX_ADDR_SIZE],
}

impl Default for IpmiAddr {
    fn default() -> Self {
        Self {
            addr_type: 0,
            channel: 0,
            data: [0; IPMI_MAX_ADDR_SIZE],
        }
    }
}

#[derive(DataAccess, MemberOffsets)]
#[repr(C)]
pub struct IpmiMsg {
    pub netfn: u8,
    pub cmd: u8,
    pub data_len: u16,
    pub data: *mut u8,
}

impl Default for IpmiMsg {
    fn default() -> Self {
        Self {
            netfn: 0,
            cmd: 0,
            data_len: 0,
            data: std::ptr::null_mut(),
        }
    }
}

#[derive(MemberOffsets)]
#[repr(C)]
pub struct IpmiReq {
    pub addr: *mut u8,
    pub addr_len: u32,
    pub msgid: i64,
    pub msg: IpmiMsg,
}

impl Default for IpmiReq {
    fn default() -> Self {
        Self {
            addr: std::ptr::null_mut(),
            addr_len: 0,
            msgid: 0,
            msg: IpmiMsg::default(),
        }
    }
}

#[derive(MemberOffsets)]
#[repr(C)]
pub struct IpmiRecv {
    pub recv_type: i32,
    pub addr: *mut u8,
    pub addr_len: u32,
    pub msgid: i64,
    pub msg: IpmiMsg,
}

impl Default for IpmiRecv {
    fn default() -> Self {
        Self {
            recv_type: 0,
            addr: std::ptr::null_mut(),
            addr_len: 0,
            msgid: 0,
            msg: IpmiMsg::default(),
        }
    }
}

#[derive(Default, MemberOffsets)]
#[repr(C)]
pub struct IpmiSystemInterfaceAddr {
    pub addr_type: i32,
    pub channel: i16,
    pub lun: u8,
}

// IOC commands
pub const IPMI_IOC_MAGIC: u8 = b'i';
pub const IPMICTL_RECEIVE_MSG: u8 = 12;
//只有RECEIVE是_IOWR，SEND是_IOR
pub const IPMICTL_SEND_COMMAND: u8 = 13;

ioctl_readwrite!(
    ipmi_ioctl_receive_msg,
    IPMI_IOC_MAGIC,
    IPMICTL_RECEIVE_MSG,
    IpmiRecv
);

ioctl_read!(
    ipmi_ioctl_send_command,
    IPMI_IOC_MAGIC,
    IPMICTL_SEND_COMMAND,
    IpmiReq
);

/// The three device calls of one exchange. The real device is an `OwnedFd`
/// on the OpenIPMI node.
trait IpmiDevice: fmt::Debug + Send {
    fn send_command(&mut self, req: &mut IpmiReq) -> nix::Result<()>;
    /// A single readiness wait; `Ok(false)` when `timeout` passes first.
    fn poll_readable(&mut self, timeout: Duration) -> nix::Result<bool>;
    fn receive_msg(&mut self, recv: &mut IpmiRecv) -> nix::Result<()>;
}

impl IpmiDevice for OwnedFd {
    fn send_command(&mut self, req: &mut IpmiReq) -> nix::Result<()> {
        // SAFETY: req and everything it points at outlive the ioctl.
        unsafe { ipmi_ioctl_send_command(self.as_raw_fd(), req) }.map(drop)
    }

    fn poll_readable(&mut self, timeout: Duration) -> nix::Result<bool> {
        let mut timeval = TimeVal::new(timeout.as_secs() as _, timeout.subsec_micros() as _);
        let mut fd_set = FdSet::new();
        fd_set.insert(self.as_fd());

        let n = select(
            self.as_raw_fd() + 1,
            &mut fd_set,
            None,
            None,
            Some(&mut timeval),
        )?;
        Ok(n > 0 && fd_set.contains(self.as_fd()))
    }

    fn receive_msg(&mut self, recv: &mut IpmiRecv) -> nix::Result<()> {
        // SAFETY: recv points at buffers owned by the caller for the whole call.
        unsafe { ipmi_ioctl_receive_msg(self.as_raw_fd(), recv) }.map(drop)
    }
}

/// Blocks until the device is readable or `timeout` has passed in total.
/// EINTR restarts the wait with whatever time is left.
fn wait_for_response<D: IpmiDevice + ?Sized>(dev: &mut D, timeout: Duration) -> IpmiResult<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(false);
        }
        match dev.poll_readable(remaining) {
            Ok(ready) => return Ok(ready),
            Err(Errno::EINTR) => continue,
            Err(errno) => {
                return Err(IpmiError::Transport {
                    op: "wait for response",
                    errno,
                })
            }
        }
    }
}

/// Submits `req` under `msgid` and collects the matching response.
fn exchange<D: IpmiDevice + ?Sized>(dev: &mut D, req: &IpmiRq, msgid: i64) -> IpmiResult<IpmiRs> {
    debug3!("OpenIPMI Request Message Header:");
    debug3!("  netfn     = 0x{:x}", req.msg.netfn());
    debug3!("  cmd       = 0x{:x}", req.msg.cmd);
    if !req.msg.data().is_empty() && is_debug_enabled(3) {
        debug3!(
            "{}",
            hexbuf(req.msg.data(), "OpenIPMI Request Message Data")
        );
    }

    // Everything the kernel reads through a pointer lives until the end of this call.
    let mut bmc_addr = IpmiSystemInterfaceAddr {
        addr_type: IPMI_SYSTEM_INTERFACE_ADDR_TYPE,
        channel: IPMI_BMC_CHANNEL as i16,
        lun: req.msg.lun(),
    };
    let mut payload = req.msg.data().to_vec();

    let mut ireq = IpmiReq {
        addr: &mut bmc_addr as *mut _ as *mut u8,
        addr_len: std::mem::size_of::<IpmiSystemInterfaceAddr>() as u32,
        msgid,
        msg: IpmiMsg {
            netfn: req.msg.netfn(),
            cmd: req.msg.cmd,
            ..Default::default()
        },
    };
    ireq.msg.attach(&mut payload);

    if let Err(errno) = dev.send_command(&mut ireq) {
        log::error!("Unable to send command: {}", errno);
        return Err(IpmiError::Transport {
            op: "send command",
            errno,
        });
    }

    let mut addr = IpmiAddr::default();
    let mut buf = vec![0u8; IPMI_BUF_SIZE];
    let mut recv = IpmiRecv::default();

    loop {
        if !wait_for_response(dev, IPMI_OPENIPMI_READ_TIMEOUT)? {
            log::warn!(
                "No data available after {}s, trying to receive anyway",
                IPMI_OPENIPMI_READ_TIMEOUT.as_secs()
            );
        }

        recv.addr = &mut addr as *mut _ as *mut u8;
        recv.addr_len = std::mem::size_of::<IpmiAddr>() as u32;
        recv.msg.attach(&mut buf);

        if let Err(errno) = dev.receive_msg(&mut recv) {
            log::error!("Unable to receive msg: {}", errno);
            return Err(IpmiError::Transport {
                op: "receive msg",
                errno,
            });
        }

        if recv.msgid == msgid {
            break;
        }
        log::warn!(
            "Received a response with unexpected ID {} vs. {}",
            recv.msgid,
            msgid
        );
    }

    let len = (recv.msg.data_len as usize).min(buf.len());
    buf.truncate(len);

    debug5!("Got message:");
    debug5!("  type      = {}", recv.recv_type);
    debug5!("  channel   = {:#x}", addr.channel);
    debug5!("  msgid     = {}", recv.msgid);
    debug5!("  netfn     = {:#x}", recv.msg.netfn);
    debug5!("  cmd       = {:#x}", recv.msg.cmd);
    debug5!("  data_len  = {}", buf.len());
    if is_debug_enabled(5) {
        debug5!("  data      = {}", buf2str(&buf));
    }

    Ok(IpmiRs {
        recv_type: recv.recv_type,
        netfn: recv.msg.netfn,
        cmd: recv.msg.cmd,
        data: buf,
    })
}

/// Linux OpenIPMI character device interface.
///
/// The device node is opened on first use and closed on `close()` or drop.
#[derive(Debug, Default)]
pub struct OpenIntf {
    pub devnum: u8,
    dev: Option<Box<dyn IpmiDevice>>,
}

impl OpenIntf {
    pub fn new(devnum: u8) -> Self {
        Self { devnum, dev: None }
    }

    pub fn is_open(&self) -> bool {
        self.dev.is_some()
    }

    pub fn dev_paths(&self) -> [String; 3] {
        [
            format!("/dev/ipmi{}", self.devnum),
            format!("/dev/ipmi/{}", self.devnum),
            format!("/dev/ipmidev/{}", self.devnum),
        ]
    }
}

impl IpmiIntf for OpenIntf {
    fn open(&mut self) -> IpmiResult<()> {
        if self.dev.is_some() {
            return Ok(());
        }

        debug2!("Using ipmi device {}", self.devnum);
        let mut last_err = Errno::ENOENT;
        for path in self.dev_paths() {
            match open(path.as_str(), OFlag::O_RDWR, Mode::empty()) {
                Ok(raw) => {
                    // SAFETY: open() just returned this descriptor and nothing else owns it.
                    self.dev = Some(Box::new(unsafe { OwnedFd::from_raw_fd(raw) }));
                    debug2!("Opened {}", path);
                    return Ok(());
                }
                Err(e) => last_err = e,
            }
        }

        Err(IpmiError::System(format!(
            "Could not open device at /dev/ipmi{0} or /dev/ipmi/{0} or /dev/ipmidev/{0}: {1}",
            self.devnum,
            last_err.desc()
        )))
    }

    fn close(&mut self) {
        // OwnedFd closes on drop
        self.dev = None;
    }

    fn sendrecv(&mut self, req: &IpmiRq) -> IpmiResult<IpmiRs> {
        if req.msg.data_len() > IPMI_MAX_MSG_LENGTH {
            return Err(IpmiError::InvalidInput(format!(
                "Request data length {} exceeds {} bytes",
                req.msg.data_len(),
                IPMI_MAX_MSG_LENGTH
            )));
        }

        if self.dev.is_none() {
            self.open()?;
        }
        let dev = self
            .dev
            .as_deref_mut()
            .ok_or_else(|| IpmiError::System("IPMI device is not open".to_string()))?;
        exchange(dev, req, next_seq())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Write;
    use std::mem::size_of;
    use std::os::unix::net::UnixStream;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn kernel_struct_layout() {
        assert_eq!(size_of::<IpmiMsg>(), 16);
        assert_eq!(size_of::<IpmiReq>(), 40);
        assert_eq!(size_of::<IpmiRecv>(), 48);
        assert_eq!(size_of::<IpmiSystemInterfaceAddr>(), 8);

        assert_eq!(IpmiMsg::offset_of_member("data_len"), Some(2));
        assert_eq!(IpmiMsg::offset_of_member("data"), Some(8));
        assert_eq!(IpmiReq::offset_of_member("msgid"), Some(16));
        assert_eq!(IpmiReq::offset_of_member("msg"), Some(24));
        assert_eq!(IpmiRecv::offset_of_member("addr"), Some(8));
        assert_eq!(IpmiRecv::offset_of_member("msgid"), Some(24));
        assert_eq!(IpmiRecv::offset_of_member("msg"), Some(32));
        assert_eq!(IpmiSystemInterfaceAddr::offset_of_member("lun"), Some(6));
    }

    #[test]
    fn ioctl_request_codes() {
        // _IOR('i', 13, struct ipmi_req) and _IOWR('i', 12, struct ipmi_recv)
        #[cfg(target_pointer_width = "64")]
        {
            assert_eq!(
                nix::request_code_read!(IPMI_IOC_MAGIC, IPMICTL_SEND_COMMAND, size_of::<IpmiReq>())
                    as u32,
                0x8028_690d
            );
            assert_eq!(
                nix::request_code_readwrite!(
                    IPMI_IOC_MAGIC,
                    IPMICTL_RECEIVE_MSG,
                    size_of::<IpmiRecv>()
                ) as u32,
                0xc030_690c
            );
        }
    }

    #[test]
    fn attach_points_message_at_buffer() {
        let mut buf = vec![1u8, 2, 3];
        let mut msg = IpmiMsg::default();
        assert!(unsafe { msg.data() }.is_none());
        msg.attach(&mut buf);
        assert_eq!(msg.data_len, 3);
        assert_eq!(unsafe { msg.data() }, Some(&[1u8, 2, 3][..]));
        msg.detach();
        assert!(msg.data.is_null());
    }

    #[test]
    fn device_paths_follow_devnum() {
        let intf = OpenIntf::new(2);
        assert_eq!(
            intf.dev_paths(),
            [
                "/dev/ipmi2".to_string(),
                "/dev/ipmi/2".to_string(),
                "/dev/ipmidev/2".to_string()
            ]
        );
        assert!(!intf.is_open());
    }

    #[test]
    fn oversized_payload_rejected_before_open() {
        let mut intf = OpenIntf::new(250);
        let req = IpmiRq::new(0x06, 0x01).with_data(vec![0u8; IPMI_MAX_MSG_LENGTH + 1]);
        assert!(matches!(
            intf.sendrecv(&req),
            Err(IpmiError::InvalidInput(_))
        ));
        assert!(!intf.is_open());
    }

    /// Scripted device. Waits pop from `waits` (ready when empty); each
    /// receive pops a `(msgid offset, bytes)` reply relative to the last sent id.
    #[derive(Debug, Default)]
    struct FakeDevice {
        fail_send: Option<Errno>,
        waits: VecDeque<nix::Result<bool>>,
        replies: VecDeque<(i64, Vec<u8>)>,
        sent: Vec<(u8, u8, Vec<u8>)>,
        sent_msgid: i64,
        timeouts: Vec<Duration>,
        recv_capacity: Vec<usize>,
    }

    impl FakeDevice {
        fn reply(mut self, offset: i64, data: &[u8]) -> Self {
            self.replies.push_back((offset, data.to_vec()));
            self
        }

        fn wait(mut self, result: nix::Result<bool>) -> Self {
            self.waits.push_back(result);
            self
        }
    }

    impl IpmiDevice for FakeDevice {
        fn send_command(&mut self, req: &mut IpmiReq) -> nix::Result<()> {
            if let Some(errno) = self.fail_send {
                return Err(errno);
            }
            let data = unsafe { req.msg.data() }.unwrap_or(&[]).to_vec();
            self.sent.push((req.msg.netfn, req.msg.cmd, data));
            self.sent_msgid = req.msgid;
            Ok(())
        }

        fn poll_readable(&mut self, timeout: Duration) -> nix::Result<bool> {
            self.timeouts.push(timeout);
            self.waits.pop_front().unwrap_or(Ok(true))
        }

        fn receive_msg(&mut self, recv: &mut IpmiRecv) -> nix::Result<()> {
            let (offset, data) = self.replies.pop_front().ok_or(Errno::EAGAIN)?;
            let capacity = recv.msg.data_len as usize;
            self.recv_capacity.push(capacity);

            let n = data.len().min(capacity);
            unsafe { std::ptr::copy_nonoverlapping(data.as_ptr(), recv.msg.data, n) };
            recv.recv_type = 1;
            recv.msgid = self.sent_msgid + offset;
            recv.msg.netfn = self.sent.last().map_or(0, |s| s.0 + 1);
            recv.msg.cmd = self.sent.last().map_or(0, |s| s.1);
            recv.msg.data_len = n as u16;
            Ok(())
        }
    }

    #[test]
    fn exchange_truncates_to_reported_length() {
        let mut dev = FakeDevice::default().reply(0, &[0x00, 0x20, 0x01]);
        let req = IpmiRq::new(0x06, 0x01).with_data(vec![0xaa, 0xbb]);

        let rsp = exchange(&mut dev, &req, 41).unwrap();
        assert_eq!(rsp.data, vec![0x00, 0x20, 0x01]);
        assert_eq!(rsp.netfn, 0x07);
        assert_eq!(rsp.cmd, 0x01);
        assert_eq!(rsp.recv_type, 1);

        assert_eq!(dev.sent, vec![(0x06, 0x01, vec![0xaa, 0xbb])]);
        assert_eq!(dev.sent_msgid, 41);
        assert_eq!(dev.recv_capacity, vec![IPMI_BUF_SIZE]);
    }

    #[test]
    fn exchange_receives_after_wait_timeout() {
        let mut dev = FakeDevice::default().wait(Ok(false)).reply(0, &[0x00, 0x01]);
        let req = IpmiRq::new(0x00, 0x01);

        let rsp = exchange(&mut dev, &req, 7).unwrap();
        assert_eq!(rsp.data, vec![0x00, 0x01]);
        assert_eq!(dev.timeouts.len(), 1);
        assert!(dev.replies.is_empty());
    }

    #[test]
    fn exchange_skips_response_with_other_msgid() {
        let mut dev = FakeDevice::default().reply(-1, &[0xc1]).reply(0, &[0x00, 0x55]);
        let req = IpmiRq::new(0x0a, 0x40);

        let rsp = exchange(&mut dev, &req, 100).unwrap();
        assert_eq!(rsp.data, vec![0x00, 0x55]);
        // one wait per receive attempt
        assert_eq!(dev.timeouts.len(), 2);
        assert_eq!(dev.recv_capacity.len(), 2);
    }

    #[test]
    fn wait_restarts_after_eintr_with_remaining_time() {
        let mut dev = FakeDevice::default()
            .wait(Err(Errno::EINTR))
            .wait(Err(Errno::EINTR))
            .wait(Ok(true));

        assert!(wait_for_response(&mut dev, IPMI_OPENIPMI_READ_TIMEOUT).unwrap());
        assert_eq!(dev.timeouts.len(), 3);
        assert!(dev.timeouts[0] <= IPMI_OPENIPMI_READ_TIMEOUT);
        assert!(dev.timeouts[1] <= dev.timeouts[0]);
        assert!(dev.timeouts[2] <= dev.timeouts[1]);
    }

    #[test]
    fn wait_without_time_left_is_a_timeout() {
        let mut dev = FakeDevice::default();
        assert!(!wait_for_response(&mut dev, Duration::ZERO).unwrap());
        assert!(dev.timeouts.is_empty());
    }

    #[test]
    fn exchange_transport_errors() {
        let mut dev = FakeDevice {
            fail_send: Some(Errno::EIO),
            ..Default::default()
        };
        assert_eq!(
            exchange(&mut dev, &IpmiRq::new(0x06, 0x01), 1),
            Err(IpmiError::Transport {
                op: "send command",
                errno: Errno::EIO
            })
        );
        assert!(dev.timeouts.is_empty());

        let mut dev = FakeDevice::default().wait(Err(Errno::EBADF));
        assert_eq!(
            exchange(&mut dev, &IpmiRq::new(0x06, 0x01), 2),
            Err(IpmiError::Transport {
                op: "wait for response",
                errno: Errno::EBADF
            })
        );
        assert!(dev.recv_capacity.is_empty());

        let mut dev = FakeDevice::default();
        assert_eq!(
            exchange(&mut dev, &IpmiRq::new(0x06, 0x01), 3),
            Err(IpmiError::Transport {
                op: "receive msg",
                errno: Errno::EAGAIN
            })
        );
    }

    #[test]
    fn owned_fd_wait_reports_readiness() {
        let (mut tx, rx) = UnixStream::pair().unwrap();
        let mut rx = OwnedFd::from(rx);

        assert!(!rx.poll_readable(Duration::from_millis(10)).unwrap());
        tx.write_all(&[0x00]).unwrap();
        assert!(rx.poll_readable(Duration::from_secs(1)).unwrap());
    }

    #[test]
    fn sendrecv_uses_open_device() {
        let dev = FakeDevice::default().reply(0, &[0x00, 0x41, 0x10, 0x01, 0x30]);
        let mut intf = OpenIntf {
            devnum: 0,
            dev: Some(Box::new(dev)),
        };
        assert!(intf.is_open());

        let rsp = intf.sendrecv(&IpmiRq::new(0x00, 0x01)).unwrap();
        assert_eq!(rsp.data, vec![0x00, 0x41, 0x10, 0x01, 0x30]);

        intf.close();
        assert!(!intf.is_open());
    }
}
