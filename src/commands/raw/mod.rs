/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use crate::error::{IpmiError, IpmiResult};
use crate::ipmi::intf::{Ipmi, IpmiIntf};
use crate::ipmi::ipmi::IpmiRq;

impl<I: IpmiIntf> Ipmi<I> {
    /// Sends `[netfn, cmd, data...]` as is and returns the raw response,
    /// completion code first.
    pub fn raw_cmd(&self, param: &[u8]) -> IpmiResult<Vec<u8>> {
        let [netfn, cmd, data @ ..] = param else {
            return Err(IpmiError::InvalidInput(
                "Not enough parameters given".to_string(),
            ));
        };

        let req = IpmiRq::new(*netfn, *cmd).with_data(data);
        Ok(self.sendrecv(&req)?.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::mock::MockIntf;

    #[test]
    fn raw_cmd_needs_netfn_and_cmd() {
        let ipmi = Ipmi::new(MockIntf::new());
        assert!(matches!(
            ipmi.raw_cmd(&[0x06]),
            Err(IpmiError::InvalidInput(_))
        ));
        assert!(matches!(ipmi.raw_cmd(&[]), Err(IpmiError::InvalidInput(_))));
        assert!(ipmi.into_inner().requests().is_empty());
    }

    #[test]
    fn raw_cmd_passes_bytes_through() {
        let mut mock = MockIntf::new();
        mock.push_data(&[0x00, 0x20, 0x81]);
        mock.push_data(&[0xc1]);
        let ipmi = Ipmi::new(mock);

        assert_eq!(ipmi.raw_cmd(&[0x06, 0x01]).unwrap(), vec![0x00, 0x20, 0x81]);
        assert_eq!(ipmi.raw_cmd(&[0x2e, 0x55, 1, 2, 3]).unwrap(), vec![0xc1]);

        let mock = ipmi.into_inner();
        assert_eq!(mock.requests()[0].msg.netfn(), 0x06);
        assert_eq!(mock.requests()[0].msg.cmd, 0x01);
        assert!(mock.requests()[0].msg.data().is_empty());
        assert_eq!(mock.requests()[1].msg.netfn(), 0x2e);
        assert_eq!(mock.requests()[1].msg.cmd, 0x55);
        assert_eq!(mock.requests()[1].msg.data(), &[1, 2, 3]);
    }
}
