//! Points / Check-In Ledger
//!
//! A non-negative balance plus a newest-first textual history, with a
//! once-per-calendar-day check-in bonus and point redemption. The backing
//! authority is fixed per deployment: the remote ledger collaborator for a
//! signed-in member, device-local storage for guests. The two are never kept
//! in sync client-side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use jiff::Zoned;
use jiff::civil::Date;
use tracing::{debug, info, warn};

use crate::identity::Member;
use crate::storage::{KeyValueStorage, POINTS_KEY};

use super::errors::PointsError;
use super::gateway::LedgerGateway;
use super::models::LedgerSnapshot;

/// Where the ledger of record lives.
pub enum PointsBackend {
    /// Remote collaborator is authoritative; updates go through its atomic
    /// increment.
    Remote(Arc<dyn LedgerGateway>),
    /// Device-local fallback for guests: single device, no cross-device sync.
    Local(Arc<dyn KeyValueStorage>),
}

impl std::fmt::Debug for PointsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(_) => f.write_str("Remote"),
            Self::Local(_) => f.write_str("Local"),
        }
    }
}

/// Points policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct PointsConfig {
    /// Points granted by the daily check-in. Deployments have shipped with 1
    /// and with 100; never hard-code it.
    pub check_in_bonus: u64,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self { check_in_bonus: 1 }
    }
}

/// Result of a check-in attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// The bonus was granted and recorded.
    Granted { bonus: u64 },
    /// The member already checked in today; nothing was mutated.
    AlreadyCheckedIn,
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    balance: u64,
    history: Vec<String>,
    last_check_in: Option<Date>,
}

impl LedgerState {
    fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            // The clamp: negative remote balances load as zero.
            balance: snapshot.balance.max(0) as u64,
            history: snapshot.history,
            last_check_in: snapshot.last_check_in,
        }
    }

    fn to_snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.balance as i64,
            history: self.history.clone(),
            last_check_in: self.last_check_in,
        }
    }
}

pub struct PointsService {
    backend: PointsBackend,
    config: PointsConfig,
    state: Mutex<LedgerState>,
    busy: AtomicBool,
}

impl std::fmt::Debug for PointsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointsService")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Clears the busy flag when an operation finishes, even on early return.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PointsService {
    #[must_use]
    pub fn new(backend: PointsBackend, config: PointsConfig) -> Self {
        Self {
            backend,
            config,
            state: Mutex::new(LedgerState::default()),
            busy: AtomicBool::new(false),
        }
    }

    /// Load the ledger of record into memory, typically when the reward
    /// screen mounts or the member signs in.
    ///
    /// # Errors
    ///
    /// Surfaces remote read failures. Local-backend read failures degrade to
    /// an empty ledger with a warning, like every other local-storage fault.
    pub async fn load(&self, member: &Member) -> Result<(), PointsError> {
        let snapshot = match &self.backend {
            PointsBackend::Remote(gateway) => gateway.read_ledger(&member.member_id).await?,
            PointsBackend::Local(storage) => match storage.get(POINTS_KEY).await {
                Ok(Some(raw)) => match serde_json::from_str(&raw) {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        warn!(error = %e, "discarding unreadable points snapshot");
                        LedgerSnapshot::default()
                    }
                },
                Ok(None) => LedgerSnapshot::default(),
                Err(e) => {
                    warn!(error = %e, "points rehydration failed, starting empty");
                    LedgerSnapshot::default()
                }
            },
        };

        debug!(balance = snapshot.balance, "points ledger loaded");

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = LedgerState::from_snapshot(snapshot);

        Ok(())
    }

    /// Grant the daily check-in bonus at most once per calendar day.
    ///
    /// Re-entrant calls while a persist is in flight get
    /// [`PointsError::Busy`]; a repeat on the same date gets
    /// [`CheckInOutcome::AlreadyCheckedIn`] without mutating anything.
    ///
    /// # Errors
    ///
    /// Surfaces remote ledger failures; the in-memory state is only updated
    /// after the backend accepted the delta.
    pub async fn check_in(
        &self,
        member: &Member,
        now: &Zoned,
    ) -> Result<CheckInOutcome, PointsError> {
        let _busy = self.try_busy()?;

        let today = now.date();
        let bonus = self.config.check_in_bonus;
        let entry = format!(
            "[{}] Daily check-in +{bonus} pts",
            now.strftime("%Y-%m-%d %H:%M")
        );

        let next = {
            let state = self.state.lock().unwrap_or_else(|e| e.into_inner());

            if state.last_check_in == Some(today) {
                return Ok(CheckInOutcome::AlreadyCheckedIn);
            }

            let mut next = state.clone();
            next.balance += bonus;
            next.history.insert(0, entry.clone());
            next.last_check_in = Some(today);
            next
        };

        match &self.backend {
            PointsBackend::Remote(gateway) => {
                gateway
                    .apply_delta(&member.member_id, bonus as i64, &entry)
                    .await?;
            }
            PointsBackend::Local(storage) => {
                persist_local(storage.as_ref(), &next.to_snapshot()).await;
            }
        }

        info!(member_id = %member.member_id, bonus, %today, "daily check-in granted");

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = next;

        Ok(CheckInOutcome::Granted { bonus })
    }

    /// Spend `cost` points on `reward_label`.
    ///
    /// # Errors
    ///
    /// [`PointsError::InsufficientPoints`] when the balance cannot cover the
    /// cost (nothing mutated); otherwise surfaces remote ledger failures.
    pub async fn redeem(
        &self,
        member: &Member,
        cost: u64,
        reward_label: &str,
    ) -> Result<(), PointsError> {
        let _busy = self.try_busy()?;

        let entry = format!("Redeemed {reward_label} -{cost} pts");

        let next = {
            let state = self.state.lock().unwrap_or_else(|e| e.into_inner());

            if state.balance < cost {
                return Err(PointsError::InsufficientPoints {
                    needed: cost,
                    available: state.balance,
                });
            }

            let mut next = state.clone();
            next.balance = next.balance.saturating_sub(cost);
            next.history.insert(0, entry.clone());
            next
        };

        match &self.backend {
            PointsBackend::Remote(gateway) => {
                gateway
                    .apply_delta(&member.member_id, -(cost as i64), &entry)
                    .await?;
            }
            PointsBackend::Local(storage) => {
                persist_local(storage.as_ref(), &next.to_snapshot()).await;
            }
        }

        info!(member_id = %member.member_id, cost, reward_label, "points redeemed");

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = next;

        Ok(())
    }

    /// Prepend a history entry without touching the balance.
    ///
    /// In-memory only; the entry reaches the backend with the next persisted
    /// operation.
    pub fn add_history(&self, entry: impl Into<String>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.history.insert(0, entry.into());
    }

    /// Overwrite the in-memory balance, clamped to a minimum of 0.
    ///
    /// Defends against negative-balance bugs upstream; prefer
    /// [`check_in`](Self::check_in) and [`redeem`](Self::redeem) for normal
    /// mutations.
    pub fn set_balance(&self, value: i64) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.balance = value.max(0) as u64;
    }

    #[must_use]
    pub fn balance(&self) -> u64 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).balance
    }

    /// The history, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .history
            .clone()
    }

    #[must_use]
    pub fn last_check_in(&self) -> Option<Date> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_check_in
    }

    fn try_busy(&self) -> Result<BusyGuard<'_>, PointsError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Ok(BusyGuard(&self.busy))
        } else {
            Err(PointsError::Busy)
        }
    }
}

/// Overwrite the local ledger snapshot. Failures degrade, they do not roll
/// back the in-memory mutation.
async fn persist_local(storage: &dyn KeyValueStorage, snapshot: &LedgerSnapshot) {
    let raw = match serde_json::to_string(snapshot) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "points snapshot could not be serialized");
            return;
        }
    };

    if let Err(e) = storage.set(POINTS_KEY, &raw).await {
        warn!(error = %e, "points persist failed, in-memory state kept");
    }
}
