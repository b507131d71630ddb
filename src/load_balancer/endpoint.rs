//! Endpoint abstraction.
//!
//! # Responsibilities
//! - Represent a single candidate node as `host:port`
//! - Validate the shape of a candidate before it enters the pool
//!
//! Endpoints carry no identity beyond their string form; two endpoints are
//! equal when their `host:port` text is equal.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::EndpointError;

/// A `host:port` network address identifying a cluster node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    addr: String,
    port: u16,
}

impl Endpoint {
    /// The full `host:port` text.
    pub fn as_str(&self) -> &str {
        &self.addr
    }

    /// Host part (everything before the separator).
    pub fn host(&self) -> &str {
        self.addr.split_once(':').map_or("", |(host, _)| host)
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(_host), Some(port), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EndpointError::MissingSeparator(s.to_string()));
        };

        // u16::from_str accepts a leading '+', which is not a valid port here.
        let invalid_port = || EndpointError::InvalidPort {
            endpoint: s.to_string(),
            port: port.to_string(),
        };
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid_port());
        }
        let port = port.parse::<u16>().map_err(|_| invalid_port())?;

        Ok(Self {
            addr: s.to_string(),
            port,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.addr
    }
}

impl PartialEq<&str> for Endpoint {
    fn eq(&self, other: &&str) -> bool {
        self.addr == *other
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.addr)
    }
}
