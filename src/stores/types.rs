//! Store record types and their status lifecycles.
//!
//! ```text
//! Order:   Open → Matched → Completed
//!          Open | Matched → Cancelled
//! Escrow:  Locked → Released | Refunded | Disputed
//!          Disputed → Released | Refunded
//! Stake:   Active → Unstaking → Withdrawn
//! ```
//!
//! Completed, Cancelled, Released, Refunded and Withdrawn are terminal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::services::solana::is_valid_address;
use crate::stores::{Record, StoreError};

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// A status enum with a fixed set of allowed moves.
pub trait Status: Copy + PartialEq + Debug {
    fn allows(self, next: Self) -> bool;

    fn as_str(self) -> &'static str;
}

fn transition<S: Status>(current: &mut S, next: S) -> Result<(), StoreError> {
    if !current.allows(next) {
        return Err(StoreError::InvalidTransition {
            from: current.as_str().to_string(),
            to: next.as_str().to_string(),
        });
    }
    *current = next;
    Ok(())
}

fn require_address(field: &str, value: &str) -> Result<(), StoreError> {
    if is_valid_address(value) {
        Ok(())
    } else {
        Err(StoreError::Invalid(format!("{} is not a valid Solana address", field)))
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), StoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StoreError::Invalid(format!("{} must be a positive number", field)))
    }
}

fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        Err(StoreError::Invalid(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Matched,
    Completed,
    Cancelled,
}

impl Status for OrderStatus {
    fn allows(self, next: Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Open, Matched) | (Open, Cancelled) | (Matched, Completed) | (Matched, Cancelled)
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Matched => "matched",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub wallet: String,
    pub side: OrderSide,
    pub token: String,
    pub amount: f64,
    pub price: f64,
    #[serde(default)]
    pub payment_method_id: Option<Uuid>,
}

impl NewOrder {
    pub fn into_record(self) -> Result<Order, StoreError> {
        require_address("wallet", &self.wallet)?;
        require_text("token", &self.token)?;
        require_positive("amount", self.amount)?;
        require_positive("price", self.price)?;

        let now = now_secs();
        Ok(Order {
            id: Uuid::new_v4(),
            wallet: self.wallet,
            side: self.side,
            token: self.token,
            amount: self.amount,
            price: self.price,
            payment_method_id: self.payment_method_id,
            status: OrderStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub wallet: String,
    pub side: OrderSide,
    pub token: String,
    pub amount: f64,
    pub price: f64,
    pub payment_method_id: Option<Uuid>,
    pub status: OrderStatus,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Order {
    pub fn set_status(&mut self, next: OrderStatus) -> Result<(), StoreError> {
        transition(&mut self.status, next)?;
        self.updated_at = now_secs();
        Ok(())
    }
}

impl Record for Order {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }
}

// ---------------------------------------------------------------------------
// Escrow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscrowStatus {
    Locked,
    Released,
    Refunded,
    Disputed,
}

impl Status for EscrowStatus {
    fn allows(self, next: Self) -> bool {
        use EscrowStatus::*;
        matches!(
            (self, next),
            (Locked, Released)
                | (Locked, Refunded)
                | (Locked, Disputed)
                | (Disputed, Released)
                | (Disputed, Refunded)
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            EscrowStatus::Locked => "locked",
            EscrowStatus::Released => "released",
            EscrowStatus::Refunded => "refunded",
            EscrowStatus::Disputed => "disputed",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEscrow {
    pub order_id: Uuid,
    pub buyer: String,
    pub seller: String,
    pub amount: f64,
}

impl NewEscrow {
    pub fn into_record(self) -> Result<Escrow, StoreError> {
        require_address("buyer", &self.buyer)?;
        require_address("seller", &self.seller)?;
        require_positive("amount", self.amount)?;
        if self.buyer == self.seller {
            return Err(StoreError::Invalid("buyer and seller must differ".to_string()));
        }

        let now = now_secs();
        Ok(Escrow {
            id: Uuid::new_v4(),
            order_id: self.order_id,
            buyer: self.buyer,
            seller: self.seller,
            amount: self.amount,
            status: EscrowStatus::Locked,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Escrow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub buyer: String,
    pub seller: String,
    pub amount: f64,
    pub status: EscrowStatus,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Escrow {
    pub fn set_status(&mut self, next: EscrowStatus) -> Result<(), StoreError> {
        transition(&mut self.status, next)?;
        self.updated_at = now_secs();
        Ok(())
    }

    /// True when `wallet` is either party.
    pub fn involves(&self, wallet: &str) -> bool {
        self.buyer == wallet || self.seller == wallet
    }
}

impl Record for Escrow {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }
}

// ---------------------------------------------------------------------------
// Stakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeStatus {
    Active,
    Unstaking,
    Withdrawn,
}

impl Status for StakeStatus {
    fn allows(self, next: Self) -> bool {
        use StakeStatus::*;
        matches!((self, next), (Active, Unstaking) | (Unstaking, Withdrawn))
    }

    fn as_str(self) -> &'static str {
        match self {
            StakeStatus::Active => "active",
            StakeStatus::Unstaking => "unstaking",
            StakeStatus::Withdrawn => "withdrawn",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStake {
    pub wallet: String,
    pub amount: f64,
    #[serde(default)]
    pub validator: Option<String>,
}

impl NewStake {
    pub fn into_record(self) -> Result<Stake, StoreError> {
        require_address("wallet", &self.wallet)?;
        require_positive("amount", self.amount)?;
        if let Some(validator) = &self.validator {
            require_address("validator", validator)?;
        }

        let now = now_secs();
        Ok(Stake {
            id: Uuid::new_v4(),
            wallet: self.wallet,
            amount: self.amount,
            validator: self.validator,
            status: StakeStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stake {
    pub id: Uuid,
    pub wallet: String,
    pub amount: f64,
    pub validator: Option<String>,
    pub status: StakeStatus,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Stake {
    pub fn set_status(&mut self, next: StakeStatus) -> Result<(), StoreError> {
        transition(&mut self.status, next)?;
        self.updated_at = now_secs();
        Ok(())
    }
}

impl Record for Stake {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }
}

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentMethod {
    pub owner: String,
    pub kind: String,
    pub label: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl NewPaymentMethod {
    pub fn into_record(self) -> Result<PaymentMethod, StoreError> {
        require_address("owner", &self.owner)?;
        require_text("kind", &self.kind)?;
        require_text("label", &self.label)?;

        Ok(PaymentMethod {
            id: Uuid::new_v4(),
            owner: self.owner,
            kind: self.kind,
            label: self.label,
            details: self.details,
            created_at: now_secs(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: Uuid,
    pub owner: String,
    pub kind: String,
    pub label: String,
    pub details: BTreeMap<String, String>,
    pub created_at: u64,
}

impl Record for PaymentMethod {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }
}
