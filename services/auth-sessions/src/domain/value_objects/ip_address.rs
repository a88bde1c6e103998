//! IP 地址值对象

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// IP 地址值对象
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpAddress(IpAddr);

impl IpAddress {
    pub fn new(value: &str) -> Result<Self, IpAddressError> {
        value
            .trim()
            .parse::<IpAddr>()
            .map(Self)
            .map_err(|_| IpAddressError::InvalidFormat(value.to_string()))
    }

    pub fn from_addr(addr: IpAddr) -> Self {
        Self(addr)
    }

    pub fn addr(&self) -> IpAddr {
        self.0
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// IP 地址错误
#[derive(Debug, thiserror::Error)]
pub enum IpAddressError {
    #[error("Invalid IP address: {0}")]
    InvalidFormat(String),
}
