//! The two tokens traded by a pool.

use core::fmt;

use super::{Address, Direction};
use crate::error::AmmError;

/// A canonically ordered pair of distinct token addresses.
///
/// Token A is always the lower address, so `(X, Y)` and `(Y, X)` describe
/// the same pool.  [`Direction::AToB`] sells [`token_a`](Self::token_a).
///
/// # Examples
///
/// ```
/// use twamm_engine::domain::{Address, Direction, TokenPair};
///
/// let usdc = Address::repeat_byte(2);
/// let weth = Address::repeat_byte(1);
/// let pair = TokenPair::new(usdc, weth).expect("distinct tokens");
///
/// assert_eq!(pair.token_a(), weth);
/// assert_eq!(pair.sold_token(Direction::BToA), usdc);
/// assert_eq!(pair.direction_selling(weth).ok(), Some(Direction::AToB));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TokenPairFields"))]
pub struct TokenPair {
    token_a: Address,
    token_b: Address,
}

impl TokenPair {
    /// Creates a pair, sorting the two addresses.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if both addresses are equal.
    pub fn new(first: Address, second: Address) -> Result<Self, AmmError> {
        if first == second {
            return Err(AmmError::InvalidToken(
                "token pair requires two distinct addresses",
            ));
        }
        let (token_a, token_b) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        Ok(Self { token_a, token_b })
    }

    /// Token A (lower address).
    #[must_use]
    pub const fn token_a(&self) -> Address {
        self.token_a
    }

    /// Token B (higher address).
    #[must_use]
    pub const fn token_b(&self) -> Address {
        self.token_b
    }

    /// Returns `true` if `token` belongs to the pair.
    #[must_use]
    pub fn contains(&self, token: &Address) -> bool {
        self.token_a == *token || self.token_b == *token
    }

    /// Token sold when trading in `direction`.
    #[must_use]
    pub const fn sold_token(&self, direction: Direction) -> Address {
        match direction {
            Direction::AToB => self.token_a,
            Direction::BToA => self.token_b,
        }
    }

    /// Token bought when trading in `direction`.
    #[must_use]
    pub const fn bought_token(&self, direction: Direction) -> Address {
        self.sold_token(direction.opposite())
    }

    /// Direction in which `token_in` is the sold token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidToken`] if `token_in` is not in the pair.
    pub fn direction_selling(&self, token_in: Address) -> Result<Direction, AmmError> {
        if token_in == self.token_a {
            Ok(Direction::AToB)
        } else if token_in == self.token_b {
            Ok(Direction::BToA)
        } else {
            Err(AmmError::InvalidToken("token is not part of this pair"))
        }
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token_a, self.token_b)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TokenPairFields {
    token_a: Address,
    token_b: Address,
}

#[cfg(feature = "serde")]
impl TryFrom<TokenPairFields> for TokenPair {
    type Error = AmmError;

    fn try_from(fields: TokenPairFields) -> Result<Self, AmmError> {
        Self::new(fields.token_a, fields.token_b)
    }
}
