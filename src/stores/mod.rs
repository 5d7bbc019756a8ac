//! In-memory record stores backing the wallet's order, escrow, staking and
//! payment-method screens.
//!
//! Every store is a `DashMap` keyed by record id and lives for the process
//! lifetime. Nothing is persisted.

pub mod types;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub use types::{
    Escrow, EscrowStatus, NewEscrow, NewOrder, NewPaymentMethod, NewStake, Order, OrderSide, OrderStatus,
    PaymentMethod, Stake, StakeStatus,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(Uuid),

    #[error("record {0} already exists")]
    Conflict(Uuid),

    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("{0}")]
    Invalid(String),
}

/// Anything a `Store` can hold.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// Creation time in seconds since the epoch; lists are ordered by it.
    fn created_at(&self) -> u64;
}

/// Concurrent id → record map.
#[derive(Debug)]
pub struct Store<T> {
    inner: Arc<DashMap<Uuid, T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }
}

impl<T: Record> Store<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: T) -> Result<T, StoreError> {
        match self.inner.entry(record.id()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(record.id())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Result<T, StoreError> {
        self.inner
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    /// Records matching `filter`, oldest first.
    pub fn list<F>(&self, filter: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let mut records: Vec<T> = self
            .inner
            .iter()
            .filter(|r| filter(r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| (r.created_at(), r.id()));
        records
    }

    /// Apply `change` to a copy of the record and keep it only if it succeeds.
    pub fn update<F>(&self, id: Uuid, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut T) -> Result<(), StoreError>,
    {
        let mut entry = self.inner.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let mut updated = entry.value().clone();
        change(&mut updated)?;
        *entry.value_mut() = updated.clone();
        Ok(updated)
    }

    pub fn remove(&self, id: Uuid) -> Result<T, StoreError> {
        self.inner
            .remove(&id)
            .map(|(_, record)| record)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// All stores, shared by the HTTP handlers.
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub orders: Store<Order>,
    pub escrows: Store<Escrow>,
    pub stakes: Store<Stake>,
    pub payment_methods: Store<PaymentMethod>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}
