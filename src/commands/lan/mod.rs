/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use crate::error::IpmiResult;
use crate::ipmi::intf::{Ipmi, IpmiIntf};
use crate::ipmi::ipmi::{IpmiRq, IPMI_NETFN_TRANSPORT};

pub const IPMI_GET_LAN_CONFIG: u8 = 0x02;

pub const IPMI_LANP_SET_IN_PROGRESS: u8 = 0;
pub const IPMI_LANP_AUTH_TYPE: u8 = 1;
pub const IPMI_LANP_IP_ADDR: u8 = 3;
pub const IPMI_LANP_IP_ADDR_SRC: u8 = 4;
pub const IPMI_LANP_MAC_ADDR: u8 = 5;
pub const IPMI_LANP_SUBNET_MASK: u8 = 6;
pub const IPMI_LANP_DEF_GATEWAY_IP: u8 = 12;
pub const IPMI_LANP_VLAN_ID: u8 = 20;

pub fn lan_param_name(param: u8) -> &'static str {
    match param {
        IPMI_LANP_SET_IN_PROGRESS => "Set in Progress",
        IPMI_LANP_AUTH_TYPE => "Auth Type Support",
        IPMI_LANP_IP_ADDR => "IP Address",
        IPMI_LANP_IP_ADDR_SRC => "IP Address Source",
        IPMI_LANP_MAC_ADDR => "MAC Address",
        IPMI_LANP_SUBNET_MASK => "Subnet Mask",
        IPMI_LANP_DEF_GATEWAY_IP => "Default Gateway IP",
        IPMI_LANP_VLAN_ID => "802.1q VLAN ID",
        _ => "Unknown",
    }
}

impl<I: IpmiIntf> Ipmi<I> {
    /// Get LAN Configuration Parameters, set and block selector 0.
    ///
    /// The response comes back untouched: completion code, parameter
    /// revision, then the parameter data.
    pub fn get_lan_config(&self, channel: u8, param: u8) -> IpmiResult<Vec<u8>> {
        let req = IpmiRq::new(IPMI_NETFN_TRANSPORT, IPMI_GET_LAN_CONFIG)
            .with_data(vec![channel, param, 0, 0]);
        Ok(self.sendrecv(&req)?.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::mock::MockIntf;

    #[test]
    fn get_lan_config_returns_raw_response() {
        let mut mock = MockIntf::new();
        mock.push_data(&[0x00, 0x11, 192, 168, 1, 10]);
        mock.push_data(&[0x80]);
        let ipmi = Ipmi::new(mock);

        assert_eq!(
            ipmi.get_lan_config(1, IPMI_LANP_IP_ADDR).unwrap(),
            vec![0x00, 0x11, 192, 168, 1, 10]
        );
        // parameter not supported: the completion code is the caller's to read
        assert_eq!(ipmi.get_lan_config(1, 0x80).unwrap(), vec![0x80]);

        let mock = ipmi.into_inner();
        let req = &mock.requests()[0];
        assert_eq!(req.msg.netfn(), IPMI_NETFN_TRANSPORT);
        assert_eq!(req.msg.cmd, IPMI_GET_LAN_CONFIG);
        assert_eq!(req.msg.data(), &[1, 3, 0, 0]);
    }

    #[test]
    fn param_names() {
        assert_eq!(lan_param_name(IPMI_LANP_MAC_ADDR), "MAC Address");
        assert_eq!(lan_param_name(0xc0), "Unknown");
    }
}
