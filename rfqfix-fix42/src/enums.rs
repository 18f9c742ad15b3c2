/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Enumerated field values of the FIX 4.2 quote workflow.
//!
//! All of them are `int` fields on the wire. Side (tag 54) lives in
//! [`rfqfix_core::types::Side`].

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive as _, ToPrimitive as _};
use rfqfix_core::error::DecodeError;
use rfqfix_core::field::{FieldCodec, FieldRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Implements the wire codec and `Display` for an integer enumeration.
macro_rules! int_enum_codec {
    ($name:ident) => {
        impl $name {
            /// Returns the wire value.
            #[must_use]
            pub fn value(self) -> u64 {
                self.to_u64().unwrap_or_default()
            }
        }

        impl TryFrom<u64> for $name {
            type Error = u64;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                Self::from_u64(value).ok_or(value)
            }
        }

        impl FieldCodec for $name {
            fn decode_value(tag: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
                let raw = FieldRef::new(tag, bytes).as_u64()?;
                Self::try_from(raw).map_err(|v| DecodeError::InvalidFieldValue {
                    tag,
                    reason: format!("{v} is not a valid {}", stringify!($name)),
                })
            }

            fn encode_value(&self, buf: &mut Vec<u8>) {
                self.value().encode_value(buf);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.value())
            }
        }
    };
}

/// Why a quote request was refused (tag 658).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum QuoteRequestRejectReason {
    /// Unknown symbol.
    UnknownSymbol = 1,
    /// Exchange (security) closed.
    ExchangeClosed = 2,
    /// Quote request exceeds limit.
    QuoteRequestExceedsLimit = 3,
    /// Too late to enter.
    TooLateToEnter = 4,
    /// Invalid price.
    InvalidPrice = 5,
    /// Not authorized to request quote.
    NotAuthorizedToRequestQuote = 6,
    /// No match for inquiry.
    NoMatchForInquiry = 7,
    /// No market for instrument.
    NoMarketForInstrument = 8,
    /// No inventory.
    NoInventory = 9,
    /// Pass.
    Pass = 10,
    /// Other.
    Other = 99,
}

int_enum_codec!(QuoteRequestRejectReason);

/// How the quote requester answers a quote (tag 694).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum QuoteRespType {
    /// Hit/Lift.
    HitLift = 1,
    /// Counter.
    Counter = 2,
    /// Expired.
    Expired = 3,
    /// Cover.
    Cover = 4,
    /// Done away.
    DoneAway = 5,
    /// Pass.
    Pass = 6,
    /// End trade.
    EndTrade = 7,
    /// Timed out.
    TimedOut = 8,
}

int_enum_codec!(QuoteRespType);

/// State of a quote (tag 297).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum QuoteStatus {
    /// Accepted.
    Accepted = 0,
    /// Canceled for symbol(s).
    CanceledForSymbol = 1,
    /// Canceled for security type(s).
    CanceledForSecurityType = 2,
    /// Canceled for underlying.
    CanceledForUnderlying = 3,
    /// Canceled all.
    CanceledAll = 4,
    /// Rejected.
    Rejected = 5,
    /// Removed from market.
    RemovedFromMarket = 6,
    /// Expired.
    Expired = 7,
    /// Query.
    Query = 8,
    /// Quote not found.
    QuoteNotFound = 9,
    /// Pending.
    Pending = 10,
    /// Pass.
    Pass = 11,
    /// Locked market warning.
    LockedMarketWarning = 12,
    /// Cross market warning.
    CrossMarketWarning = 13,
    /// Canceled due to lock market.
    CanceledDueToLockMarket = 14,
    /// Canceled due to cross market.
    CanceledDueToCrossMarket = 15,
    /// Active.
    Active = 16,
    /// Canceled.
    Canceled = 17,
}

int_enum_codec!(QuoteStatus);

impl QuoteStatus {
    /// Returns true if the quote can no longer trade.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::CanceledForSymbol
                | Self::CanceledForSecurityType
                | Self::CanceledForUnderlying
                | Self::CanceledAll
                | Self::Rejected
                | Self::RemovedFromMarket
                | Self::Expired
                | Self::CanceledDueToLockMarket
                | Self::CanceledDueToCrossMarket
                | Self::Canceled
        )
    }
}

/// Why a quote was rejected (tag 300).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromPrimitive, ToPrimitive,
)]
#[repr(u8)]
pub enum QuoteRejectReason {
    /// Unknown symbol.
    UnknownSymbol = 1,
    /// Exchange (security) closed.
    ExchangeClosed = 2,
    /// Quote request exceeds limit.
    QuoteRequestExceedsLimit = 3,
    /// Too late to enter.
    TooLateToEnter = 4,
    /// Unknown quote.
    UnknownQuote = 5,
    /// Duplicate quote.
    DuplicateQuote = 6,
    /// Invalid bid/ask spread.
    InvalidBidAskSpread = 7,
    /// Invalid price.
    InvalidPrice = 8,
    /// Not authorized to quote security.
    NotAuthorizedToQuoteSecurity = 9,
    /// Other.
    Other = 99,
}

int_enum_codec!(QuoteRejectReason);
