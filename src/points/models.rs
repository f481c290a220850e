//! Points Models

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A member's loyalty-points ledger as the collaborators see it.
///
/// `balance` is `i64` on the wire — remote stores have been observed to hold
/// negative balances after upstream bugs — but the in-memory ledger clamps to
/// zero on load. `history` is newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub balance: i64,
    pub history: Vec<String>,
    pub last_check_in: Option<Date>,
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn snapshot_round_trips_with_camel_case_keys() {
        let snapshot = LedgerSnapshot {
            balance: 42,
            history: vec!["Redeemed coffee -30 pts".to_string()],
            last_check_in: Some(date(2025, 4, 24)),
        };

        let raw = serde_json::to_string(&snapshot).expect("serialize should succeed");

        assert!(raw.contains("\"lastCheckIn\":\"2025-04-24\""), "got {raw}");

        let parsed: LedgerSnapshot = serde_json::from_str(&raw).expect("deserialize should succeed");

        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn default_snapshot_is_an_empty_ledger() {
        let snapshot = LedgerSnapshot::default();

        assert_eq!(snapshot.balance, 0);
        assert!(snapshot.history.is_empty());
        assert!(snapshot.last_check_in.is_none());
    }
}
