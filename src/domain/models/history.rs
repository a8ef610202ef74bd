use super::ExchangeRecord;

/// Append-only log of the exchanges completed during a session.
///
/// There is deliberately no way to remove or edit a record; the ledger grows
/// for the lifetime of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLedger {
    records: Vec<ExchangeRecord>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExchangeRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ExchangeRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&ExchangeRecord> {
        self.records.last()
    }
}
