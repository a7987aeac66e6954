//! Actor and payment method enums

use serde::{Deserialize, Serialize};

/// Who performed an action recorded in the order history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Admin,
    System,
    Customer,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorType::Admin => "admin",
            ActorType::System => "system",
            ActorType::Customer => "customer",
        }
    }
}

/// Payment method chosen at checkout
///
/// QR / e-wallet methods expect near-immediate payment, so pending orders
/// using them time out much faster than cash-on-delivery (see the order
/// lifecycle auto-cancel sweep).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Vietqr,
    Momo,
    Stripe,
    Cod,
}

impl PaymentMethod {
    /// QR / e-wallet methods: payment is expected within minutes
    pub fn is_instant(&self) -> bool {
        matches!(
            self,
            PaymentMethod::Vietqr | PaymentMethod::Momo | PaymentMethod::Stripe
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Vietqr => "vietqr",
            PaymentMethod::Momo => "momo",
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Cod => "cod",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_methods() {
        assert!(PaymentMethod::Vietqr.is_instant());
        assert!(PaymentMethod::Momo.is_instant());
        assert!(PaymentMethod::Stripe.is_instant());
        assert!(!PaymentMethod::Cod.is_instant());
    }

    #[test]
    fn test_payment_method_serde() {
        let json = serde_json::to_string(&PaymentMethod::Vietqr).unwrap();
        assert_eq!(json, "\"vietqr\"");
        let back: PaymentMethod = serde_json::from_str("\"cod\"").unwrap();
        assert_eq!(back, PaymentMethod::Cod);
    }
}
