// SPDX-License-Identifier: MIT OR Apache-2.0
//! Validated identifiers and qualified socket references.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Error raised when an identifier or socket reference is malformed.
#[derive(Debug, thiserror::Error)]
pub enum IdentifierError {
    /// The identifier is empty or contains a reserved separator
    #[error("identifier '{text}' is not valid, must be non-empty and must not contain ':' or '.'")]
    Malformed {
        /// The rejected text
        text: String,
    },

    /// A qualified socket reference is not of the form `node:socket`
    #[error("socket reference '{text}' is not of the form 'node:socket'")]
    MalformedSocketRef {
        /// The rejected text
        text: String,
    },
}

/// Identifier of a scene or node.
///
/// `:` and `.` are reserved for building qualified socket references, so
/// an identifier containing either is rejected at construction time.
/// Comparison is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create a validated identifier.
    pub fn new(text: impl Into<String>) -> Result<Self, IdentifierError> {
        let text = text.into();
        if text.is_empty() || text.contains(':') || text.contains('.') {
            return Err(IdentifierError::Malformed { text });
        }
        Ok(Identifier(text))
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::new(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A qualified socket reference, written `node:socket`.
///
/// Gateway socket maps use these on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SocketRef {
    /// Identifier of the node carrying the socket
    pub node: Identifier,
    /// Name of the socket on that node
    pub socket: String,
}

impl SocketRef {
    /// Create a socket reference from its parts.
    pub fn new(node: Identifier, socket: impl Into<String>) -> Self {
        Self {
            node,
            socket: socket.into(),
        }
    }
}

impl fmt::Display for SocketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.socket)
    }
}

impl FromStr for SocketRef {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((node, socket)) = s.split_once(':') else {
            return Err(IdentifierError::MalformedSocketRef {
                text: s.to_string(),
            });
        };
        if socket.is_empty() || socket.contains(':') {
            return Err(IdentifierError::MalformedSocketRef {
                text: s.to_string(),
            });
        }
        Ok(SocketRef {
            node: Identifier::new(node)?,
            socket: socket.to_string(),
        })
    }
}

impl TryFrom<String> for SocketRef {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SocketRef> for String {
    fn from(value: SocketRef) -> Self {
        value.to_string()
    }
}
