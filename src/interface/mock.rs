/*
 * SPDX-FileCopyrightText: 2025 UnionTech Software Technology Co., Ltd.
 *
 * SPDX-License-Identifier: GPL-2.0-or-later
 */
use std::collections::VecDeque;

use crate::error::{IpmiError, IpmiResult};
use crate::ipmi::intf::IpmiIntf;
use crate::ipmi::ipmi::{IpmiRq, IpmiRs};

/// Scripted interface: replays queued responses in order and keeps every
/// request it was handed.
#[derive(Debug, Default)]
pub struct MockIntf {
    responses: VecDeque<IpmiResult<IpmiRs>>,
    requests: Vec<IpmiRq>,
    pub opened: bool,
    pub open_count: usize,
}

impl MockIntf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw response, completion code first.
    pub fn push_data(&mut self, data: &[u8]) -> &mut Self {
        self.responses.push_back(Ok(IpmiRs::new(data)));
        self
    }

    pub fn push_err(&mut self, err: IpmiError) -> &mut Self {
        self.responses.push_back(Err(err));
        self
    }

    pub fn requests(&self) -> &[IpmiRq] {
        &self.requests
    }

    pub fn pending(&self) -> usize {
        self.responses.len()
    }
}

impl IpmiIntf for MockIntf {
    fn open(&mut self) -> IpmiResult<()> {
        self.opened = true;
        self.open_count += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.opened = false;
    }

    fn sendrecv(&mut self, req: &IpmiRq) -> IpmiResult<IpmiRs> {
        if !self.opened {
            self.open()?;
        }
        self.requests.push(req.clone());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(IpmiError::System("mock: no response queued".to_string())))
    }
}
