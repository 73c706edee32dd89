use serde::{Deserialize, Serialize};

/// One line of the over-by-over display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// 1-based.
    pub over: u32,
    /// 1..=6; wides and no-balls share the number of the ball that follows.
    pub ball: u32,
    pub label: String,
    pub highlight: bool,
}

/// Append-only log of the deliveries of one innings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLedger {
    records: Vec<DeliveryRecord>,
}

impl DeliveryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DeliveryRecord) {
        debug_assert!((1..=6).contains(&record.ball));
        self.records.push(record);
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.records
    }

    pub fn over(&self, over: u32) -> Vec<&DeliveryRecord> {
        self.records
            .iter()
            .filter(|record| record.over == over)
            .collect()
    }

    /// Drops the newest record only when it belongs to `over`; closed overs
    /// are never touched.
    pub fn pop_if_in_over(&mut self, over: u32) -> Option<DeliveryRecord> {
        match self.records.last() {
            Some(record) if record.over == over => self.records.pop(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
