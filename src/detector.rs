//! Decides whether a product's state transition is worth a notification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ProductSnapshot;

/// Classified transition between the stored and the fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    NoChange,
    BecameAvailable,
    PriceChanged {
        old: Option<Decimal>,
        new: Option<Decimal>,
    },
    BecameUnavailable,
}

impl ChangeEvent {
    pub fn is_notifiable(&self) -> bool {
        !matches!(self, ChangeEvent::NoChange)
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::NoChange => write!(f, "no change"),
            ChangeEvent::BecameAvailable => write!(f, "became available"),
            ChangeEvent::PriceChanged { .. } => write!(f, "price changed"),
            ChangeEvent::BecameUnavailable => write!(f, "became unavailable"),
        }
    }
}

/// Knobs that change which transitions are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionPolicy {
    /// Report in-stock → out-of-stock transitions.
    pub notify_on_unavailable: bool,
}

/// Pure: the same inputs always give the same event.
pub fn detect(
    previous: Option<&ProductSnapshot>,
    current: &ProductSnapshot,
    policy: DetectionPolicy,
) -> ChangeEvent {
    let Some(previous) = previous else {
        // First sighting in stock is news on its own.
        return if current.available {
            ChangeEvent::BecameAvailable
        } else {
            ChangeEvent::NoChange
        };
    };

    match (previous.available, current.available) {
        (false, true) => ChangeEvent::BecameAvailable,
        (true, true) if previous.price != current.price => ChangeEvent::PriceChanged {
            old: previous.price,
            new: current.price,
        },
        (true, false) if policy.notify_on_unavailable => ChangeEvent::BecameUnavailable,
        _ => ChangeEvent::NoChange,
    }
}
