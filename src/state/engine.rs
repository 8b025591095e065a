//! The draft engine: the sole authority on what counts as a valid
//! mutation of a draft.
//!
//! Every committed mutation bumps a version counter. Mutating calls may
//! carry the version their caller observed in a snapshot; a mismatch is
//! reported as [`DraftError::StaleState`], which is how a manual pick and
//! a clock-expiry auto-pick racing for the same slot resolve to exactly
//! one committed record.

use std::collections::HashSet;

use indexmap::IndexMap;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    clock::DraftClock,
    order,
    pool::{self, PoolEntry, PoolSource, PoolState, PoolUploadError},
    queue::{DuplicateQueueEntry, QueueStore},
};

/// Lifecycle status of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    /// Created but not yet started; the clock shows the full duration.
    NotStarted,
    /// Picks are being made against a running clock.
    Live,
    /// The countdown is frozen; no picks are accepted.
    Paused,
    /// Every slot is filled. Undo can reopen the draft.
    Completed,
}

/// A participating team, in draft-order position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Stable team identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// One committed pick. The history is append-only; undo removes the most
/// recent record and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRecord {
    /// 1-based pick index across the whole draft.
    pub overall: u32,
    /// 1-based round the pick belongs to.
    pub round: u32,
    /// Team that made (or was assigned) the pick.
    pub team_id: Uuid,
    /// Selected player id.
    pub player_id: String,
    /// Display name resolved from the active pool at commit time.
    pub player_name: Option<String>,
    /// Whether the engine selected the player (queue or pool fallback).
    pub auto: bool,
    /// Commit timestamp.
    pub picked_at: OffsetDateTime,
}

/// Typed failures for engine mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    /// The requested action is not valid in the current status.
    #[error("cannot {action} while the draft is {status:?}")]
    InvalidTransition {
        /// Human-readable action name.
        action: &'static str,
        /// Status the draft was in.
        status: DraftStatus,
    },
    /// A team tried to pick out of turn.
    #[error("team `{team}` is not on the clock")]
    NotOnClock {
        /// The team that attempted the pick.
        team: Uuid,
    },
    /// The team id does not belong to this draft.
    #[error("unknown team `{team}`")]
    UnknownTeam {
        /// The offending team id.
        team: Uuid,
    },
    /// The player is already drafted or absent from the active pool.
    #[error("player `{player}` is not available")]
    ItemUnavailable {
        /// The requested player id.
        player: String,
    },
    /// The caller acted on an outdated snapshot and lost a race.
    #[error("draft changed since version {expected} (now at {actual})")]
    StaleState {
        /// Version the caller observed.
        expected: u64,
        /// Version the draft is actually at.
        actual: u64,
    },
    /// Undo was requested with an empty pick history.
    #[error("no pick to undo")]
    NothingToUndo,
    /// No available player remains anywhere; automatic progression halts.
    #[error("no available player remains in the pool")]
    PoolExhausted,
    /// An uploaded pool contained malformed entries.
    #[error(transparent)]
    PoolUpload(#[from] PoolUploadError),
    /// A queue replacement repeated a player id.
    #[error(transparent)]
    DuplicateQueued(#[from] DuplicateQueueEntry),
}

/// Immutable configuration fixed when the draft is created.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    /// Season the draft belongs to.
    pub year: u16,
    /// Number of rounds.
    pub rounds: u32,
    /// Full pick-clock duration in seconds.
    pub clock_seconds: u32,
    /// Whether even rounds reverse the team order.
    pub snake: bool,
}

/// Aggregate state of a single draft.
///
/// The engine is deliberately synchronous and free of interior locking;
/// the surrounding room serializes mutations and hands in `now`.
#[derive(Debug, Clone)]
pub struct DraftEngine {
    id: Uuid,
    config: DraftConfig,
    teams: Vec<Team>,
    status: DraftStatus,
    created_at: OffsetDateTime,
    started_at: Option<OffsetDateTime>,
    completed_at: Option<OffsetDateTime>,
    current_overall: u32,
    clock: DraftClock,
    history: Vec<PickRecord>,
    queues: QueueStore,
    pool: PoolState,
    version: u64,
}

impl DraftEngine {
    /// Create a draft in the `NotStarted` status. `teams` is the round-one
    /// pick order and must not be empty (the service layer validates).
    pub fn new(config: DraftConfig, teams: Vec<Team>, now: OffsetDateTime) -> Self {
        let clock = DraftClock::new(config.clock_seconds);
        Self {
            id: Uuid::new_v4(),
            config,
            teams,
            status: DraftStatus::NotStarted,
            created_at: now,
            started_at: None,
            completed_at: None,
            current_overall: 1,
            clock,
            history: Vec::new(),
            queues: QueueStore::default(),
            pool: PoolState::default(),
            version: 0,
        }
    }

    /// Draft identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Season year.
    pub fn year(&self) -> u16 {
        self.config.year
    }

    /// Number of rounds.
    pub fn rounds(&self) -> u32 {
        self.config.rounds
    }

    /// Whether even rounds reverse the order.
    pub fn snake(&self) -> bool {
        self.config.snake
    }

    /// Configured clock duration in seconds.
    pub fn clock_seconds(&self) -> u32 {
        self.clock.duration_secs()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> DraftStatus {
        self.status
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// When the draft went live, if it ever did.
    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.started_at
    }

    /// When the final slot was filled, while the draft stays completed.
    pub fn completed_at(&self) -> Option<OffsetDateTime> {
        self.completed_at
    }

    /// Version committed by the latest mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// 1-based index of the next slot to fill.
    pub fn current_overall(&self) -> u32 {
        self.current_overall
    }

    /// Total number of slots in the draft.
    pub fn total_slots(&self) -> u32 {
        order::total_slots(self.teams.len(), self.config.rounds)
    }

    /// Teams in round-one pick order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Committed picks, oldest first.
    pub fn history(&self) -> &[PickRecord] {
        &self.history
    }

    /// Team on the clock for `overall`, ignoring status.
    pub fn team_for_overall(&self, overall: u32) -> &Team {
        &self.teams[order::team_index(overall, self.teams.len(), self.config.snake)]
    }

    /// Team currently authorized to pick, if any slot remains.
    pub fn on_clock_team(&self) -> Option<&Team> {
        if self.status == DraftStatus::Completed || self.current_overall > self.total_slots() {
            None
        } else {
            Some(self.team_for_overall(self.current_overall))
        }
    }

    /// Remaining clock seconds for the current status.
    pub fn remaining_seconds(&self, now: OffsetDateTime) -> u32 {
        match self.status {
            DraftStatus::NotStarted => self.clock.duration_secs(),
            DraftStatus::Live => self.clock.remaining_running(now),
            DraftStatus::Paused => self.clock.remaining_frozen(),
            DraftStatus::Completed => 0,
        }
    }

    /// Whether a live clock has run out (the lazy-expiry trigger).
    pub fn clock_expired(&self, now: OffsetDateTime) -> bool {
        self.status == DraftStatus::Live && self.remaining_seconds(now) == 0
    }

    /// Begin the draft: the round-one first team goes on a full clock.
    pub fn start(&mut self, now: OffsetDateTime) -> Result<(), DraftError> {
        self.ensure_status(DraftStatus::NotStarted, "start")?;
        self.status = DraftStatus::Live;
        self.started_at = Some(now);
        self.clock.start(now);
        self.version += 1;
        Ok(())
    }

    /// Freeze the clock and stop accepting picks.
    pub fn pause(&mut self, now: OffsetDateTime) -> Result<(), DraftError> {
        self.ensure_status(DraftStatus::Live, "pause")?;
        self.status = DraftStatus::Paused;
        self.clock.pause(now);
        self.version += 1;
        Ok(())
    }

    /// Restart the countdown from the frozen remainder.
    pub fn resume(&mut self, now: OffsetDateTime) -> Result<(), DraftError> {
        self.ensure_status(DraftStatus::Paused, "resume")?;
        self.status = DraftStatus::Live;
        self.clock.resume(now);
        self.version += 1;
        Ok(())
    }

    /// Rewrite the configured clock duration. A live countdown is re-aimed
    /// immediately; a paused one has its frozen remainder replaced.
    pub fn set_clock(&mut self, seconds: u32, now: OffsetDateTime) -> Result<(), DraftError> {
        if self.status == DraftStatus::Completed {
            return Err(DraftError::InvalidTransition {
                action: "set the clock",
                status: self.status,
            });
        }
        self.clock.set_duration(seconds, now);
        self.version += 1;
        Ok(())
    }

    /// Manual pick by the team on the clock.
    pub fn pick(
        &mut self,
        team: Uuid,
        player_id: &str,
        expected_version: Option<u64>,
        default_pool: &IndexMap<String, PoolEntry>,
        now: OffsetDateTime,
    ) -> Result<&PickRecord, DraftError> {
        self.ensure_version(expected_version)?;
        self.ensure_status(DraftStatus::Live, "pick")?;
        if !self.teams.iter().any(|t| t.id == team) {
            return Err(DraftError::UnknownTeam { team });
        }
        let on_clock = self.on_clock_team().map(|t| t.id);
        if on_clock != Some(team) {
            return Err(DraftError::NotOnClock { team });
        }
        let name = self.resolve_available(player_id, default_pool)?;
        Ok(self.commit(player_id.to_owned(), name, false, now))
    }

    /// Commissioner pick for whichever team is on the clock; skips the
    /// on-clock authorization but nothing else.
    pub fn force_pick(
        &mut self,
        player_id: &str,
        expected_version: Option<u64>,
        default_pool: &IndexMap<String, PoolEntry>,
        now: OffsetDateTime,
    ) -> Result<&PickRecord, DraftError> {
        self.ensure_version(expected_version)?;
        self.ensure_status(DraftStatus::Live, "force a pick")?;
        let name = self.resolve_available(player_id, default_pool)?;
        Ok(self.commit(player_id.to_owned(), name, true, now))
    }

    /// Automatic pick for the team on the clock: first still-available
    /// queue entry, else the best-ranked available pool entry.
    pub fn auto_pick(
        &mut self,
        expected_version: Option<u64>,
        default_pool: &IndexMap<String, PoolEntry>,
        now: OffsetDateTime,
    ) -> Result<&PickRecord, DraftError> {
        self.ensure_version(expected_version)?;
        self.ensure_status(DraftStatus::Live, "auto-pick")?;
        // A live draft without an on-clock team (no teams at all) has
        // nothing to progress.
        let Some(team) = self.on_clock_team().map(|t| t.id) else {
            return Err(DraftError::PoolExhausted);
        };

        let drafted = self.drafted_ids();
        let active = self.pool.effective(default_pool);
        let available = |id: &str| active.contains_key(id) && !drafted.contains(id);

        let selected = self
            .queues
            .first_available(team, available)
            .map(str::to_owned)
            .or_else(|| {
                pool::best_available(active, available).map(|entry| entry.id.clone())
            })
            .ok_or(DraftError::PoolExhausted)?;

        let name = active.get(&selected).map(|entry| entry.name.clone());
        Ok(self.commit(selected, name, true, now))
    }

    /// Remove the most recent pick, restore its slot, and grant the
    /// restored team a fresh full-duration clock. Reopens a completed
    /// draft.
    pub fn undo(&mut self, now: OffsetDateTime) -> Result<PickRecord, DraftError> {
        let record = self.history.pop().ok_or(DraftError::NothingToUndo)?;
        self.current_overall -= 1;
        if self.status == DraftStatus::Completed {
            self.status = DraftStatus::Live;
            self.completed_at = None;
        }
        match self.status {
            DraftStatus::Live => self.clock.start(now),
            // A stopped clock reports the full duration while paused, so
            // the restored team resumes onto a fresh countdown.
            _ => self.clock.stop(),
        }
        self.version += 1;
        Ok(record)
    }

    /// Replace the custom pool atomically; the default directory is
    /// ignored until [`DraftEngine::clear_pool`].
    pub fn upload_pool(&mut self, entries: Vec<PoolEntry>) -> Result<usize, DraftError> {
        let accepted = self.pool.upload(entries)?;
        self.version += 1;
        Ok(accepted)
    }

    /// Discard the custom pool and revert to the default directory.
    pub fn clear_pool(&mut self) {
        self.pool.clear();
        self.version += 1;
    }

    /// Active pool source.
    pub fn pool_source(&self) -> PoolSource {
        self.pool.source()
    }

    /// Replace a team's queue. Duplicate ids are rejected; availability is
    /// not checked here.
    ///
    /// Queue contents never gate a slot commit, so replacements leave the
    /// version untouched and cannot invalidate in-flight picks.
    pub fn set_queue(&mut self, team: Uuid, ids: Vec<String>) -> Result<(), DraftError> {
        if !self.teams.iter().any(|t| t.id == team) {
            return Err(DraftError::UnknownTeam { team });
        }
        self.queues.set(team, ids)?;
        Ok(())
    }

    /// Current queue for a team, empty when never set.
    pub fn queue(&self, team: Uuid) -> &[String] {
        self.queues.get(team)
    }

    /// Search the active pool for available entries.
    pub fn search_pool<'a>(
        &'a self,
        default_pool: &'a IndexMap<String, PoolEntry>,
        query: &str,
        category: Option<&str>,
        limit: usize,
    ) -> Vec<&'a PoolEntry> {
        let drafted = self.drafted_ids();
        pool::search(self.pool.effective(default_pool), query, category, limit, |id| {
            !drafted.contains(id)
        })
    }

    /// (total, available) entry counts for the active pool.
    pub fn pool_counts(&self, default_pool: &IndexMap<String, PoolEntry>) -> (usize, usize) {
        let drafted = self.drafted_ids();
        let active = self.pool.effective(default_pool);
        let available = active.keys().filter(|id| !drafted.contains(id.as_str())).count();
        (active.len(), available)
    }

    fn drafted_ids(&self) -> HashSet<&str> {
        self.history.iter().map(|r| r.player_id.as_str()).collect()
    }

    fn ensure_status(&self, wanted: DraftStatus, action: &'static str) -> Result<(), DraftError> {
        if self.status == wanted {
            Ok(())
        } else {
            Err(DraftError::InvalidTransition {
                action,
                status: self.status,
            })
        }
    }

    fn ensure_version(&self, expected: Option<u64>) -> Result<(), DraftError> {
        match expected {
            Some(v) if v != self.version => Err(DraftError::StaleState {
                expected: v,
                actual: self.version,
            }),
            _ => Ok(()),
        }
    }

    fn resolve_available(
        &self,
        player_id: &str,
        default_pool: &IndexMap<String, PoolEntry>,
    ) -> Result<Option<String>, DraftError> {
        let active = self.pool.effective(default_pool);
        let entry = active.get(player_id).ok_or_else(|| DraftError::ItemUnavailable {
            player: player_id.to_owned(),
        })?;
        if self.drafted_ids().contains(player_id) {
            return Err(DraftError::ItemUnavailable {
                player: player_id.to_owned(),
            });
        }
        Ok(Some(entry.name.clone()))
    }

    /// Append the record, advance the counter, and reset or stop the
    /// clock. All validation happens before this point, so a commit can
    /// never leave partial state behind.
    fn commit(
        &mut self,
        player_id: String,
        player_name: Option<String>,
        auto: bool,
        now: OffsetDateTime,
    ) -> &PickRecord {
        let overall = self.current_overall;
        let record = PickRecord {
            overall,
            round: order::round_of(overall, self.teams.len()),
            team_id: self
                .team_for_overall(overall)
                .id,
            player_id,
            player_name,
            auto,
            picked_at: now,
        };
        self.history.push(record);
        self.current_overall += 1;
        self.version += 1;

        if self.current_overall > self.total_slots() {
            self.status = DraftStatus::Completed;
            self.completed_at = Some(now);
            self.clock.stop();
        } else {
            self.clock.start(now);
        }

        self.history.last().expect("record just pushed")
    }
}
