//! Type-safe newtypes for ens-context.
//!
//! These newtypes provide compile-time safety and semantic clarity
//! for core domain concepts.

use std::fmt;
use std::str::FromStr;

/// Identifier scheme tag.
///
/// Both schemes resolve the same way; the tool that receives the identifier
/// decides how the response is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// `id:` prefix.
    Plain,
    /// `idx:` prefix.
    Execute,
}

impl Scheme {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Plain => "id:",
            Self::Execute => "idx:",
        }
    }

    /// Splits a recognized scheme prefix off `raw`.
    #[must_use]
    pub fn strip(raw: &str) -> Option<(Self, &str)> {
        [Self::Plain, Self::Execute]
            .into_iter()
            .find_map(|scheme| raw.strip_prefix(scheme.prefix()).map(|rest| (scheme, rest)))
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// 20-byte Ethereum account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0; 20]);

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 20]
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

/// ENS node: the 32-byte namehash of a normalized name.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namehash(pub [u8; 32]);

impl Namehash {
    /// The node of the empty name (the ENS root).
    pub const ROOT: Self = Self([0; 32]);

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Namehash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Namehash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namehash({self})")
    }
}

// Compile-time assertions for thread safety.
#[cfg(test)]
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Scheme>();
    assert_send_sync::<Address>();
    assert_send_sync::<Namehash>();
};
