/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::sync::Mutex;

use super::ipmi::{IpmiRq, IpmiRs};
use crate::error::{IpmiError, IpmiResult};

/// A channel to the BMC that can carry one command at a time.
///
/// `sendrecv` performs a whole submit, wait, receive cycle and returns the
/// raw response (completion code first). Implementations do not retry.
pub trait IpmiIntf: Send {
    fn open(&mut self) -> IpmiResult<()>;
    fn close(&mut self);
    fn sendrecv(&mut self, req: &IpmiRq) -> IpmiResult<IpmiRs>;
}

impl<T: IpmiIntf + ?Sized> IpmiIntf for Box<T> {
    fn open(&mut self) -> IpmiResult<()> {
        (**self).open()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn sendrecv(&mut self, req: &IpmiRq) -> IpmiResult<IpmiRs> {
        (**self).sendrecv(req)
    }
}

/// Command facade over an [`IpmiIntf`].
///
/// The driver keeps a single response slot per handle, so every exchange
/// holds the interface lock from submit to receive. Commands built from
/// several exchanges (`enable_sel`, `set_system_fw_version`) take the lock
/// once per exchange.
///
/// The command methods live next to their codecs under `crate::commands`.
pub struct Ipmi<I: IpmiIntf> {
    intf: Mutex<I>,
}

impl<I: IpmiIntf> Ipmi<I> {
    pub fn new(intf: I) -> Self {
        Self {
            intf: Mutex::new(intf),
        }
    }

    /// Runs one exchange under the interface lock.
    pub fn sendrecv(&self, req: &IpmiRq) -> IpmiResult<IpmiRs> {
        let mut intf = self
            .intf
            .lock()
            .map_err(|_| IpmiError::System("IPMI interface lock poisoned".to_string()))?;
        intf.sendrecv(req)
    }

    /// Gives direct access to the interface, e.g. to open it eagerly.
    pub fn with_intf<F, R>(&self, f: F) -> IpmiResult<R>
    where
        F: FnOnce(&mut I) -> R,
    {
        let mut intf = self
            .intf
            .lock()
            .map_err(|_| IpmiError::System("IPMI interface lock poisoned".to_string()))?;
        Ok(f(&mut intf))
    }

    pub fn into_inner(self) -> I {
        match self.intf.into_inner() {
            Ok(intf) => intf,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::mock::MockIntf;
    use crate::ipmi::ipmi::IPMI_NETFN_APP;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn facade_is_shareable_across_threads() {
        let mut mock = MockIntf::new();
        for _ in 0..8 {
            mock.push_data(&[0x00, 0x01]);
        }
        let ipmi = Arc::new(Ipmi::new(mock));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ipmi = Arc::clone(&ipmi);
                thread::spawn(move || ipmi.sendrecv(&IpmiRq::new(IPMI_NETFN_APP, 0x01)))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().unwrap().data, vec![0x00, 0x01]);
        }

        let mock = Arc::try_unwrap(ipmi).ok().unwrap().into_inner();
        assert_eq!(mock.requests().len(), 8);
    }

    #[test]
    fn boxed_interfaces_forward() {
        let mut mock = MockIntf::new();
        mock.push_data(&[0x00]);
        let boxed: Box<dyn IpmiIntf> = Box::new(mock);
        let ipmi = Ipmi::new(boxed);
        assert!(ipmi.sendrecv(&IpmiRq::new(IPMI_NETFN_APP, 0x01)).is_ok());
    }
}
