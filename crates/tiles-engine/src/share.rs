//! # Share De-duplication
//!
//! A share button tapped twice must not produce two share sheets for the
//! same quotation. The app keeps one [`ShareDesk`] and asks it for a
//! [`ShareTicket`] before rendering.
//!
//! ```text
//!  tap ──► try_acquire("1042") ──► Ok(ticket) ──► render ──► share ──► drop(ticket)
//!  tap ──► try_acquire("1042") ──► Err(ShareInFlight)            (while held)
//!  tap ──► try_acquire("1043") ──► Ok(ticket)                    (other order)
//! ```
//!
//! The desk is owned by the caller and cloned freely; clones share one set
//! of in-flight order ids. Dropping a ticket releases its order id.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Hands out at most one live ticket per order id.
#[derive(Debug, Clone, Default)]
pub struct ShareDesk {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ShareDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `order_id` for one share.
    ///
    /// ## Errors
    /// `EngineError::ShareInFlight` while another ticket for the same order
    /// is alive.
    pub fn try_acquire(&self, order_id: impl Into<String>) -> EngineResult<ShareTicket> {
        let order_id = order_id.into();
        if !lock(&self.in_flight).insert(order_id.clone()) {
            return Err(EngineError::ShareInFlight { order_id });
        }

        let ticket = ShareTicket {
            id: Uuid::new_v4(),
            order_id,
            desk: Arc::clone(&self.in_flight),
        };
        debug!(ticket = %ticket.id, order_id = %ticket.order_id, "Share ticket issued");
        Ok(ticket)
    }

    /// Returns true while a ticket for `order_id` is alive.
    pub fn is_in_flight(&self, order_id: &str) -> bool {
        lock(&self.in_flight).contains(order_id)
    }
}

/// Permission to render and share one order. Released on drop.
#[derive(Debug)]
pub struct ShareTicket {
    id: Uuid,
    order_id: String,
    desk: Arc<Mutex<HashSet<String>>>,
}

impl ShareTicket {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }
}

impl Drop for ShareTicket {
    fn drop(&mut self) {
        lock(&self.desk).remove(&self.order_id);
        debug!(ticket = %self.id, order_id = %self.order_id, "Share ticket released");
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_drop() {
        let desk = ShareDesk::new();
        let ticket = desk.try_acquire("1042").unwrap();
        assert_eq!(ticket.order_id(), "1042");
        assert!(desk.is_in_flight("1042"));

        let err = desk.try_acquire("1042").unwrap_err();
        assert!(matches!(err, EngineError::ShareInFlight { ref order_id } if order_id == "1042"));

        drop(ticket);
        assert!(!desk.is_in_flight("1042"));
        assert!(desk.try_acquire("1042").is_ok());
    }

    #[test]
    fn test_orders_are_independent() {
        let desk = ShareDesk::new();
        let a = desk.try_acquire("1042").unwrap();
        let b = desk.clone().try_acquire("1043").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_concurrent_acquire_admits_one() {
        let desk = ShareDesk::new();
        let barrier = Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let desk = desk.clone();
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    let ticket = desk.try_acquire("1042");
                    // Hold any ticket until every thread has tried.
                    barrier.wait();
                    ticket.is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert!(!desk.is_in_flight("1042"));
    }
}
