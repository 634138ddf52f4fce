//! The special offer aggregate and its events.

use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a special offer.
///
/// Assigned by the offer store on first insert; never changes afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OfferId(u32);

impl OfferId {
    /// The id given to the first offer in an empty store.
    pub const FIRST: Self = Self(1);

    /// Create a new `OfferId`.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw id.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The id after this one, or `None` on overflow.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for OfferId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An amount of money in a given currency.
///
/// Shared by offers and the product catalog wire format, e.g.
/// `{"currency": "eur", "amount": 40.0}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Money {
    /// ISO-ish currency code as sent by the catalog (e.g. `"eur"`).
    pub currency: String,
    /// The amount.
    pub amount: f64,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(currency: impl Into<String>, amount: f64) -> Self {
        Self {
            currency: currency.into(),
            amount,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

/// A special offer on a catalog product.
///
/// `id` is `None` until the offer has been added to a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialOffer {
    /// Store-assigned identifier.
    pub id: Option<OfferId>,
    /// Catalog product the offer applies to.
    pub product_catalog_id: i64,
    /// Human readable description.
    pub description: String,
    /// Offer price.
    pub price: Money,
}

impl SpecialOffer {
    /// Create an offer that has not been stored yet.
    #[must_use]
    pub fn new(product_catalog_id: i64, description: impl Into<String>, price: Money) -> Self {
        Self {
            id: None,
            product_catalog_id,
            description: description.into(),
            price,
        }
    }

    /// Return a copy of this offer carrying the given id.
    #[must_use]
    pub fn with_id(mut self, id: OfferId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Events raised for every special offer mutation.
///
/// Each variant carries the full offer as it was stored, id included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpecialOfferEvent {
    /// An offer was added.
    NewSpecialOffer(SpecialOffer),
    /// An existing offer was overwritten.
    UpdatedSpecialOffer(SpecialOffer),
}

impl SpecialOfferEvent {
    /// Name of the event raised by `add`.
    pub const NEW: &'static str = "NewSpecialOffer";
    /// Name of the event raised by `update`.
    pub const UPDATED: &'static str = "UpdatedSpecialOffer";

    /// The offer snapshot carried by the event.
    #[must_use]
    pub const fn offer(&self) -> &SpecialOffer {
        match self {
            Self::NewSpecialOffer(offer) | Self::UpdatedSpecialOffer(offer) => offer,
        }
    }

    /// Consume the event, returning the offer snapshot.
    #[must_use]
    pub fn into_offer(self) -> SpecialOffer {
        match self {
            Self::NewSpecialOffer(offer) | Self::UpdatedSpecialOffer(offer) => offer,
        }
    }

    /// Whether `name` is one of the names this enum produces.
    #[must_use]
    pub fn is_offer_event(name: &str) -> bool {
        name == Self::NEW || name == Self::UPDATED
    }
}

impl Event for SpecialOfferEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::NewSpecialOffer(_) => Self::NEW,
            Self::UpdatedSpecialOffer(_) => Self::UPDATED,
        }
    }
}
