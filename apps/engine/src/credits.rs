#![allow(dead_code)]

//! Credits ledger — remaining generation attempts.
//!
//! The contract: exactly one credit is consumed per successful generation,
//! never on error or cancellation. Balance comes from plan selection.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::info;

use crate::errors::AppError;

/// The plan table shown at the plans screen. Prices are display data; the
/// engine only cares about the granted usages.
#[derive(Debug, Clone, Copy)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub usages: u32,
    pub price: Option<f64>,
}

pub const PLANS: [Plan; 3] = [
    Plan {
        id: "free",
        name: "Grátis",
        usages: 3,
        price: None,
    },
    Plan {
        id: "pack-20",
        name: "Pacote 20",
        usages: 20,
        price: Some(34.90),
    },
    Plan {
        id: "pack-30",
        name: "Pacote 30",
        usages: 30,
        price: Some(49.90),
    },
];

pub fn plan_by_id(id: &str) -> Option<Plan> {
    PLANS.iter().copied().find(|p| p.id == id)
}

#[derive(Debug, Default)]
pub struct CreditsLedger {
    balance: AtomicU32,
}

impl CreditsLedger {
    pub fn new(initial: u32) -> Self {
        CreditsLedger {
            balance: AtomicU32::new(initial),
        }
    }

    pub fn balance(&self) -> u32 {
        self.balance.load(Ordering::SeqCst)
    }

    pub fn has_credit(&self) -> bool {
        self.balance() > 0
    }

    pub fn grant(&self, usages: u32) -> u32 {
        let new = self.balance.fetch_add(usages, Ordering::SeqCst) + usages;
        info!("granted {usages} usages, balance now {new}");
        new
    }

    /// Consumes exactly one credit, returning the new balance. Fails when the
    /// balance is already zero.
    pub fn consume_one(&self) -> Result<u32, AppError> {
        self.balance
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |b| b.checked_sub(1))
            .map(|prev| prev - 1)
            .map_err(|_| AppError::NoCredits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_decrements_by_exactly_one() {
        let ledger = CreditsLedger::new(3);
        assert_eq!(ledger.consume_one().unwrap(), 2);
        assert_eq!(ledger.balance(), 2);
    }

    #[test]
    fn test_consume_at_zero_is_rejected() {
        let ledger = CreditsLedger::new(0);
        assert!(matches!(ledger.consume_one(), Err(AppError::NoCredits)));
        assert_eq!(ledger.balance(), 0);
    }

    #[test]
    fn test_grant_adds_plan_usages() {
        let ledger = CreditsLedger::new(0);
        let plan = plan_by_id("pack-20").unwrap();
        assert_eq!(ledger.grant(plan.usages), 20);
    }

    #[test]
    fn test_plan_table_matches_product_offering() {
        assert_eq!(plan_by_id("free").unwrap().usages, 3);
        assert_eq!(plan_by_id("pack-30").unwrap().usages, 30);
        assert!(plan_by_id("free").unwrap().price.is_none());
        assert!(plan_by_id("enterprise").is_none());
    }
}
