use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{format_timestamp, validation::validate_player_id},
    state::engine::{DraftEngine, DraftStatus, PickRecord},
};

/// Payload used to create a brand-new draft.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateDraftRequest {
    /// Season the draft belongs to; one active draft per year.
    #[validate(range(min = 1900, max = 2999))]
    pub year: u16,
    /// Number of rounds; falls back to the configured default.
    #[validate(range(min = 1, max = 60))]
    pub rounds: Option<u32>,
    /// Pick clock in seconds; falls back to the configured default.
    #[validate(range(min = 5, max = 3600))]
    pub clock_seconds: Option<u32>,
    /// Whether even rounds reverse the team order.
    #[serde(default = "default_snake")]
    pub snake: bool,
    /// Shuffle the submitted team order before fixing the slots.
    #[serde(default)]
    pub randomize_order: bool,
    /// Teams in round-one pick order (before optional shuffling).
    #[validate(length(min = 1, max = 32), nested)]
    pub teams: Vec<TeamInput>,
}

fn default_snake() -> bool {
    true
}

/// Incoming team definition.
///
/// `Serialize` is required by the length/nested validators on
/// [`CreateDraftRequest::teams`], which echo the offending value back in
/// validation errors.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct TeamInput {
    /// Display name; must not be blank.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Manual pick submitted by a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PickRequest {
    /// Team making the pick; must be the team on the clock.
    pub team_id: Uuid,
    /// Player to draft.
    #[validate(custom(function = validate_player_id))]
    pub player_id: String,
    /// Snapshot version the caller observed; mismatches are rejected as
    /// lost races.
    #[serde(default)]
    pub version: Option<u64>,
}

/// Commissioner pick for whichever team is on the clock.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ForcePickRequest {
    /// Player to draft.
    #[validate(custom(function = validate_player_id))]
    pub player_id: String,
    /// Snapshot version the caller observed.
    #[serde(default)]
    pub version: Option<u64>,
}

/// Explicit automatic pick trigger.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AutoPickRequest {
    /// Snapshot version the caller observed.
    #[serde(default)]
    pub version: Option<u64>,
}

/// Live reconfiguration of the pick clock.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetClockRequest {
    /// New full duration in seconds.
    #[validate(range(min = 5, max = 3600))]
    pub seconds: u32,
}

/// Publicly visible draft status.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatusDto {
    /// Created, clock not yet running.
    NotStarted,
    /// Picks accepted against a running clock.
    Live,
    /// Countdown frozen.
    Paused,
    /// All slots filled.
    Completed,
}

impl From<DraftStatus> for DraftStatusDto {
    fn from(status: DraftStatus) -> Self {
        match status {
            DraftStatus::NotStarted => DraftStatusDto::NotStarted,
            DraftStatus::Live => DraftStatusDto::Live,
            DraftStatus::Paused => DraftStatusDto::Paused,
            DraftStatus::Completed => DraftStatusDto::Completed,
        }
    }
}

/// Public projection of a team and its round-one slot.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct TeamSummary {
    /// Team identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// 1-based round-one pick position.
    pub slot: usize,
}

/// Summary returned once a draft has been created, and by the listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct DraftSummary {
    /// Draft identifier.
    pub id: Uuid,
    /// Season year.
    pub year: u16,
    /// Lifecycle status.
    pub status: DraftStatusDto,
    /// Number of rounds.
    pub rounds: u32,
    /// Configured pick clock in seconds.
    pub clock_seconds: u32,
    /// Whether even rounds reverse the order.
    pub snake: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Teams in round-one pick order.
    pub teams: Vec<TeamSummary>,
}

impl From<&DraftEngine> for DraftSummary {
    fn from(engine: &DraftEngine) -> Self {
        Self {
            id: engine.id(),
            year: engine.year(),
            status: engine.status().into(),
            rounds: engine.rounds(),
            clock_seconds: engine.clock_seconds(),
            snake: engine.snake(),
            created_at: format_timestamp(engine.created_at()),
            teams: engine
                .teams()
                .iter()
                .enumerate()
                .map(|(index, team)| TeamSummary {
                    id: team.id,
                    name: team.name.clone(),
                    slot: index + 1,
                })
                .collect(),
        }
    }
}

/// One committed pick as shown to pollers.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct PickSummary {
    /// 1-based overall pick index.
    pub overall: u32,
    /// 1-based round.
    pub round: u32,
    /// Team that owns the pick.
    pub team_id: Uuid,
    /// Team display name.
    pub team_name: String,
    /// Drafted player id.
    pub player_id: String,
    /// Drafted player display name, when the pool knew it.
    pub player_name: Option<String>,
    /// Whether the engine made the selection.
    pub auto: bool,
    /// Commit timestamp (RFC 3339).
    pub picked_at: String,
}

/// A future pick slot.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct UpcomingSlot {
    /// 1-based overall pick index.
    pub overall: u32,
    /// 1-based round.
    pub round: u32,
    /// Team on the clock for this slot.
    pub team_id: Uuid,
    /// Team display name.
    pub team_name: String,
}

/// Full poll payload for one draft.
#[derive(Debug, Serialize, ToSchema)]
pub struct DraftSnapshot {
    /// Draft identifier.
    pub id: Uuid,
    /// Lifecycle status.
    pub status: DraftStatusDto,
    /// Season year.
    pub year: u16,
    /// Number of rounds.
    pub rounds: u32,
    /// Configured pick clock in seconds.
    pub clock_seconds: u32,
    /// 1-based index of the next slot to fill.
    pub current_overall: u32,
    /// Total number of slots.
    pub total_slots: u32,
    /// Team currently on the clock, absent once completed.
    pub on_clock_team: Option<TeamSummary>,
    /// Seconds left on the countdown for the current status.
    pub remaining_seconds: u32,
    /// Version to echo back with mutating calls.
    pub version: u64,
    /// True when automatic progression halted on an exhausted pool.
    pub stalled: bool,
    /// Most recent picks, newest first.
    pub recent_picks: Vec<PickSummary>,
    /// Next slots to be filled, soonest first.
    pub upcoming: Vec<UpcomingSlot>,
}

/// Envelope that degrades to an empty payload for unknown draft ids.
#[derive(Debug, Serialize, ToSchema)]
pub struct SnapshotResponse {
    /// The snapshot, or `null` when no draft exists for the id.
    pub draft: Option<DraftSnapshot>,
}

impl DraftSnapshot {
    /// Project the engine into a poll payload.
    pub fn from_engine(
        engine: &DraftEngine,
        now: OffsetDateTime,
        recent_window: usize,
        upcoming_window: usize,
        stalled: bool,
    ) -> Self {
        let team_summary = |overall: u32| {
            let team = engine.team_for_overall(overall);
            let slot = engine
                .teams()
                .iter()
                .position(|t| t.id == team.id)
                .unwrap_or_default();
            TeamSummary {
                id: team.id,
                name: team.name.clone(),
                slot: slot + 1,
            }
        };

        let recent_picks = engine
            .history()
            .iter()
            .rev()
            .take(recent_window)
            .map(|record| pick_summary(engine, record))
            .collect();

        let total_slots = engine.total_slots();
        let first_upcoming = engine.current_overall();
        let upcoming = if engine.status() == DraftStatus::Completed {
            Vec::new()
        } else {
            (first_upcoming..=total_slots)
                .take(upcoming_window)
                .map(|overall| {
                    let team = engine.team_for_overall(overall);
                    UpcomingSlot {
                        overall,
                        round: crate::state::order::round_of(overall, engine.teams().len()),
                        team_id: team.id,
                        team_name: team.name.clone(),
                    }
                })
                .collect()
        };

        Self {
            id: engine.id(),
            status: engine.status().into(),
            year: engine.year(),
            rounds: engine.rounds(),
            clock_seconds: engine.clock_seconds(),
            current_overall: engine.current_overall(),
            total_slots,
            on_clock_team: engine
                .on_clock_team()
                .map(|_| team_summary(engine.current_overall())),
            remaining_seconds: engine.remaining_seconds(now),
            version: engine.version(),
            stalled,
            recent_picks,
            upcoming,
        }
    }
}

fn pick_summary(engine: &DraftEngine, record: &PickRecord) -> PickSummary {
    let team_name = engine
        .teams()
        .iter()
        .find(|team| team.id == record.team_id)
        .map(|team| team.name.clone())
        .unwrap_or_default();
    PickSummary {
        overall: record.overall,
        round: record.round,
        team_id: record.team_id,
        team_name,
        player_id: record.player_id.clone(),
        player_name: record.player_name.clone(),
        auto: record.auto,
        picked_at: format_timestamp(record.picked_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::engine::{DraftConfig, Team};
    use indexmap::IndexMap;

    fn sample_engine() -> DraftEngine {
        let teams = ["Alpha", "Bravo"]
            .iter()
            .map(|name| Team {
                id: Uuid::new_v4(),
                name: (*name).into(),
            })
            .collect();
        DraftEngine::new(
            DraftConfig {
                year: 2026,
                rounds: 2,
                clock_seconds: 60,
                snake: true,
            },
            teams,
            OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
        )
    }

    #[test]
    fn snapshot_windows_and_upcoming_order() {
        let mut engine = sample_engine();
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_100).unwrap();
        let pool: IndexMap<String, crate::state::pool::PoolEntry> = [("p1", "One"), ("p2", "Two")]
            .iter()
            .map(|(id, name)| {
                (
                    (*id).to_string(),
                    crate::state::pool::PoolEntry {
                        id: (*id).into(),
                        name: (*name).into(),
                        category: "QB".into(),
                        origin: None,
                        rank: None,
                    },
                )
            })
            .collect();

        engine.start(now).unwrap();
        let first = engine.teams()[0].id;
        engine.pick(first, "p1", None, &pool, now).unwrap();

        let snapshot = DraftSnapshot::from_engine(&engine, now, 5, 2, false);
        assert_eq!(snapshot.current_overall, 2);
        assert_eq!(snapshot.recent_picks.len(), 1);
        assert_eq!(snapshot.recent_picks[0].player_name.as_deref(), Some("One"));
        // Snake: second team owns overalls 2 and 3.
        let upcoming: Vec<u32> = snapshot.upcoming.iter().map(|slot| slot.overall).collect();
        assert_eq!(upcoming, vec![2, 3]);
        assert_eq!(snapshot.upcoming[0].team_id, snapshot.upcoming[1].team_id);
        assert_eq!(snapshot.remaining_seconds, 60);
    }

    #[test]
    fn create_request_defaults() {
        let request: CreateDraftRequest = serde_json::from_str(
            r#"{"year": 2026, "teams": [{"name": "Alpha"}]}"#,
        )
        .unwrap();
        assert!(request.snake);
        assert!(!request.randomize_order);
        assert!(request.rounds.is_none());
        request.validate().unwrap();
    }

    #[test]
    fn create_request_enforces_team_count_bounds() {
        let too_many: Vec<_> = (0..33)
            .map(|i| serde_json::json!({"name": format!("Team {i}")}))
            .collect();
        let request: CreateDraftRequest = serde_json::from_value(
            serde_json::json!({"year": 2026, "teams": too_many}),
        )
        .unwrap();
        assert!(request.validate().is_err());

        let request: CreateDraftRequest =
            serde_json::from_str(r#"{"year": 2026, "teams": []}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_blank_team_name() {
        let request: CreateDraftRequest = serde_json::from_str(
            r#"{"year": 2026, "teams": [{"name": ""}]}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
