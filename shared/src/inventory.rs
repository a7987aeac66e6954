//! Stock movement enums for the append-only inventory ledger

use serde::{Deserialize, Serialize};

/// Kind of stock movement recorded in the ledger
///
/// The first five types mutate the on-hand counter and are accepted from
/// manual adjustment requests. `Reservation` and `Release` are written by
/// the order lifecycle only and track the reserved counter — they are
/// excluded when reconstructing on-hand stock from the ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Manual,
    Damage,
    Correction,
    Return,
    Import,
    Reservation,
    Release,
}

impl MovementType {
    /// Types accepted from a manual stock adjustment request
    pub const ADJUSTABLE: &'static [MovementType] = &[
        MovementType::Manual,
        MovementType::Damage,
        MovementType::Correction,
        MovementType::Return,
        MovementType::Import,
    ];

    /// Whether this movement affects the on-hand stock counter
    /// (as opposed to the reserved counter)
    pub fn affects_stock(&self) -> bool {
        !matches!(self, MovementType::Reservation | MovementType::Release)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Manual => "manual",
            MovementType::Damage => "damage",
            MovementType::Correction => "correction",
            MovementType::Return => "return",
            MovementType::Import => "import",
            MovementType::Reservation => "reservation",
            MovementType::Release => "release",
        }
    }
}

/// What a ledger movement references
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    /// Standalone adjustment from the admin UI
    Manual,
    /// Movement driven by an order (reservation, release)
    Order,
}

impl ReferenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceType::Manual => "manual",
            ReferenceType::Order => "order",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustable_types_exclude_reservation() {
        assert!(!MovementType::ADJUSTABLE.contains(&MovementType::Reservation));
        assert!(!MovementType::ADJUSTABLE.contains(&MovementType::Release));
        assert_eq!(MovementType::ADJUSTABLE.len(), 5);
    }

    #[test]
    fn test_affects_stock() {
        assert!(MovementType::Manual.affects_stock());
        assert!(MovementType::Import.affects_stock());
        assert!(!MovementType::Reservation.affects_stock());
        assert!(!MovementType::Release.affects_stock());
    }

    #[test]
    fn test_movement_type_serde_roundtrip() {
        let json = serde_json::to_string(&MovementType::Correction).unwrap();
        assert_eq!(json, "\"correction\"");
        let back: MovementType = serde_json::from_str("\"return\"").unwrap();
        assert_eq!(back, MovementType::Return);
    }
}
