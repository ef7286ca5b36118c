//! Chain-agnostic 32-byte identifier for tokens and accounts.

use core::fmt;

/// A 32-byte address naming either a token or an account.
///
/// The engine only compares and orders addresses; it never interprets the
/// bytes.  All 32-byte sequences are valid.
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::Address;
///
/// let alice = Address::from_bytes([0xa1; 32]);
/// assert_eq!(alice.as_bytes(), [0xa1; 32]);
/// assert_eq!(Address::repeat_byte(7), Address::from_bytes([7; 32]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address([u8; 32]);

impl Address {
    /// Wraps raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Address whose 32 bytes are all `byte`.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 32])
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// The all-zero address.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    /// Prints `0x` followed by the first four bytes in hex, e.g. `0xa1a1a1a1…`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "…")
    }
}
