//! In-memory port doubles shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration as StdDuration;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use domain::account::{CreditAccount, UserId};
use domain::matching::{CacheKey, MatchQuery, MatchSet};
use domain::reservation::{Reservation, ReservationId};
use domain::tool::Tool;

use crate::error::{AppError, AppResult};
use crate::ports::outgoing::credit_store::CreditStorePort;
use crate::ports::outgoing::delay::DelayPort;
use crate::ports::outgoing::match_cache_store::{MatchCacheRecord, MatchCacheStorePort};
use crate::ports::outgoing::match_runner::MatchRunnerPort;

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Uuid, CreditAccount>,
    reservations: HashMap<Uuid, Reservation>,
}

/// Mutex-serialized ledger with the same atomicity contract as the
/// Postgres adapter.
pub struct InMemoryCreditStore {
    signup_grant: i32,
    state: Mutex<LedgerState>,
    fail_confirm: AtomicBool,
}

impl InMemoryCreditStore {
    pub fn with_balance(user_id: &UserId, balance: i32) -> Self {
        let store = Self {
            signup_grant: balance,
            state: Mutex::new(LedgerState::default()),
            fail_confirm: AtomicBool::new(false),
        };
        store.state.lock().unwrap().accounts.insert(
            *user_id.as_uuid(),
            CreditAccount::new(user_id.clone(), balance, OffsetDateTime::now_utc()),
        );
        store
    }

    /// Make subsequent confirms fail as if the store were unreachable.
    pub fn fail_confirm(&self) {
        self.fail_confirm.store(true, Ordering::SeqCst);
    }

    pub fn account(&self, user_id: &UserId) -> CreditAccount {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(user_id.as_uuid())
            .expect("account not seeded")
            .clone()
    }

    pub fn reservation(&self, id: &ReservationId) -> Reservation {
        self.state
            .lock()
            .unwrap()
            .reservations
            .get(id.as_uuid())
            .expect("reservation not found")
            .clone()
    }

    /// Place a hold backdated by `age`, for sweeper tests.
    pub fn seed_reservation(&self, user_id: &UserId, tool: Tool, age: Duration) -> ReservationId {
        let mut state = self.state.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let account = state
            .accounts
            .get_mut(user_id.as_uuid())
            .expect("account not seeded");
        account.place_hold(tool.cost(), now).unwrap();

        let reservation =
            Reservation::new_hold(user_id.clone(), tool, "seeded hold".to_string(), now - age);
        let id = reservation.id;
        state.reservations.insert(*id.as_uuid(), reservation);
        id
    }
}

#[async_trait::async_trait]
impl CreditStorePort for InMemoryCreditStore {
    async fn get_account(&self, user_id: &UserId) -> AppResult<CreditAccount> {
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .entry(*user_id.as_uuid())
            .or_insert_with(|| {
                CreditAccount::new(user_id.clone(), self.signup_grant, OffsetDateTime::now_utc())
            });
        Ok(account.clone())
    }

    async fn reserve(
        &self,
        user_id: &UserId,
        tool: Tool,
        description: &str,
    ) -> AppResult<Reservation> {
        let mut state = self.state.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let signup_grant = self.signup_grant;
        let account = state
            .accounts
            .entry(*user_id.as_uuid())
            .or_insert_with(|| CreditAccount::new(user_id.clone(), signup_grant, now));

        account
            .place_hold(tool.cost(), now)
            .map_err(|err| AppError::InsufficientCredits {
                message: err.to_string(),
            })?;

        let reservation =
            Reservation::new_hold(user_id.clone(), tool, description.to_string(), now);
        state
            .reservations
            .insert(*reservation.id.as_uuid(), reservation.clone());
        Ok(reservation)
    }

    async fn confirm(&self, id: &ReservationId) -> AppResult<bool> {
        if self.fail_confirm.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError {
                message: "store unreachable".to_string(),
            });
        }

        let mut state = self.state.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let (user_uuid, amount) = {
            let Some(reservation) = state.reservations.get_mut(id.as_uuid()) else {
                return Ok(false);
            };
            if reservation.confirm(now).is_err() {
                return Ok(false);
            }
            (*reservation.user_id.as_uuid(), reservation.amount)
        };

        if let Some(account) = state.accounts.get_mut(&user_uuid) {
            account.capture_hold(amount, now);
        }
        Ok(true)
    }

    async fn revert(&self, id: &ReservationId, reason: &str) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let (user_uuid, amount) = {
            let Some(reservation) = state.reservations.get_mut(id.as_uuid()) else {
                return Ok(false);
            };
            if reservation.revert(reason.to_string(), now).is_err() {
                return Ok(false);
            }
            (*reservation.user_id.as_uuid(), reservation.amount)
        };

        if let Some(account) = state.accounts.get_mut(&user_uuid) {
            account.release_hold(amount, now);
        }
        Ok(true)
    }

    async fn find_stale_reservation_ids(
        &self,
        older_than: OffsetDateTime,
    ) -> AppResult<Vec<ReservationId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .reservations
            .values()
            .filter(|r| !r.is_resolved() && r.created_at < older_than)
            .map(|r| r.id)
            .collect())
    }
}

/// Vec-backed cache store with helpers to backdate entries.
#[derive(Default)]
pub struct InMemoryMatchCacheStore {
    records: Mutex<Vec<MatchCacheRecord>>,
}

impl InMemoryMatchCacheStore {
    pub fn entry_count(&self, user_id: &UserId) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == *user_id)
            .count()
    }

    pub fn age_entry(&self, user_id: &UserId, key: &CacheKey, age: Duration) {
        let mut records = self.records.lock().unwrap();
        for record in records.iter_mut() {
            if record.user_id == *user_id && record.key == *key {
                record.created_at -= age;
            }
        }
    }
}

#[async_trait::async_trait]
impl MatchCacheStorePort for InMemoryMatchCacheStore {
    async fn fetch(
        &self,
        user_id: &UserId,
        key: &CacheKey,
    ) -> AppResult<Option<MatchCacheRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.user_id == *user_id && r.key == *key)
            .cloned())
    }

    async fn store(&self, record: &MatchCacheRecord) -> AppResult<()> {
        let mut records = self.records.lock().unwrap();
        records.retain(|r| !(r.user_id == record.user_id && r.key == record.key));
        records.push(record.clone());
        Ok(())
    }

    async fn prune(&self, user_id: &UserId, keep: usize) -> AppResult<u64> {
        let mut records = self.records.lock().unwrap();

        let mut user_entries: Vec<(OffsetDateTime, CacheKey)> = records
            .iter()
            .filter(|r| r.user_id == *user_id)
            .map(|r| (r.created_at, r.key.clone()))
            .collect();
        user_entries.sort_by(|a, b| b.0.cmp(&a.0));

        let evict: HashSet<CacheKey> = user_entries.into_iter().skip(keep).map(|(_, k)| k).collect();
        let before = records.len();
        records.retain(|r| !(r.user_id == *user_id && evict.contains(&r.key)));
        Ok((before - records.len()) as u64)
    }
}

/// Counts sleeps instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    sleeps: Mutex<Vec<StdDuration>>,
}

impl RecordingDelay {
    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }

    pub fn total_slept(&self) -> StdDuration {
        self.sleeps.lock().unwrap().iter().sum()
    }
}

#[async_trait::async_trait]
impl DelayPort for RecordingDelay {
    async fn sleep(&self, duration: StdDuration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Replays a fixed sequence of responses from the matching service.
pub struct ScriptedMatchRunner {
    script: Mutex<VecDeque<AppResult<MatchSet>>>,
    calls: AtomicU32,
}

impl ScriptedMatchRunner {
    pub fn new(script: Vec<AppResult<MatchSet>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MatchRunnerPort for ScriptedMatchRunner {
    async fn find_matches(&self, _query: &MatchQuery) -> AppResult<MatchSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AppError::ExternalServiceError {
                    message: "runner script exhausted".to_string(),
                })
            })
    }
}
