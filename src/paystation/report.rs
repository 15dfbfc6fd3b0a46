use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::handler::EventHandler;
use crate::paystation::{PayStationAggregate, PayStationEvent};
use crate::store::StoreEvent;

/// Per-station sales figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalesSummary {
    pub receipts_issued: u32,
    pub minutes_sold: u32,
    pub cents_bought: u32,
    pub sessions_cancelled: u32,
    pub cents_refunded: u32,
    pub cents_emptied: u32,
}

/// Read side keeping a [`SalesSummary`] for every station whose events it sees.
///
/// Clones share the same figures, so one clone can be registered on the store while another is
/// kept around to query it.
#[derive(Clone, Default)]
pub struct SalesReport {
    summaries: Arc<Mutex<HashMap<Uuid, SalesSummary>>>,
}

impl SalesReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Figures for the given station; all zeroes if it never emitted anything.
    pub fn summary(&self, station_id: Uuid) -> SalesSummary {
        self.summaries
            .lock()
            .ok()
            .and_then(|summaries| summaries.get(&station_id).copied())
            .unwrap_or_default()
    }
}

impl EventHandler<PayStationAggregate> for SalesReport {
    fn handle(&self, event: &StoreEvent<PayStationEvent>) {
        let mut summaries = match self.summaries.lock() {
            Ok(summaries) => summaries,
            Err(_) => {
                tracing::error!(aggregate_id = %event.aggregate_id, "sales report lock poisoned");
                return;
            }
        };

        let summary: &mut SalesSummary = summaries.entry(event.aggregate_id).or_default();

        match event.payload() {
            PayStationEvent::CoinInserted { .. } => {}
            PayStationEvent::ParkingBought { minutes, amount } => {
                summary.receipts_issued = summary.receipts_issued.saturating_add(1);
                summary.minutes_sold = summary.minutes_sold.saturating_add(*minutes);
                summary.cents_bought = summary.cents_bought.saturating_add(*amount);
            }
            PayStationEvent::SessionCancelled { refund } => {
                let refunded: u32 = refund
                    .iter()
                    .fold(0, |total, (cents, count)| total.saturating_add(cents.saturating_mul(*count)));
                summary.sessions_cancelled = summary.sessions_cancelled.saturating_add(1);
                summary.cents_refunded = summary.cents_refunded.saturating_add(refunded);
            }
            PayStationEvent::TillEmptied { amount } => {
                summary.cents_emptied = summary.cents_emptied.saturating_add(*amount);
            }
        }
    }

    fn delete(&self, aggregate_id: Uuid) {
        match self.summaries.lock() {
            Ok(mut summaries) => {
                let _ = summaries.remove(&aggregate_id);
            }
            Err(_) => tracing::error!(aggregate_id = %aggregate_id, "sales report lock poisoned"),
        }
    }

    fn name(&self) -> &'static str {
        "sales_report"
    }
}
