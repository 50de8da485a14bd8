//! Versioned migration from raw wire/storage shapes to the canonical state.
//!
//! Applied exactly once at every load boundary, independent of whether the
//! state came from the remote service or the local fallback. Idempotent:
//! normalizing the raw form of an already-canonical state is a no-op.

use chrono::{DateTime, Utc};

use crate::domain::{
    ChecklistState, Food, FoodId, Group, LogEntry, MarkCounts, Participant,
};
use crate::protocol::{RawFood, RawLogEntry, RawState};

pub fn normalize(raw: RawState) -> ChecklistState {
    ChecklistState {
        foods: raw.foods.into_iter().map(normalize_food).collect(),
        log: raw.log.into_iter().map(normalize_log_entry).collect(),
    }
}

fn normalize_food(raw: RawFood) -> Food {
    // Older snapshots carried one shared counter; credit it to the first
    // participant so the summary total is preserved.
    let counts = match (raw.counts, raw.count) {
        (Some(counts), _) => counts,
        (None, Some(shared)) => MarkCounts {
            vini: shared,
            duda: 0,
        },
        (None, None) => MarkCounts::default(),
    };

    let group = raw
        .group
        .as_deref()
        .and_then(|value| value.parse::<Group>().ok())
        .unwrap_or(Group::DEFAULT);

    Food {
        id: FoodId(raw.id),
        name: raw.name,
        group,
        counts,
    }
}

fn normalize_log_entry(raw: RawLogEntry) -> LogEntry {
    let by = raw
        .by
        .as_deref()
        .and_then(|value| value.parse::<Participant>().ok())
        .unwrap_or(Participant::FIRST);

    // The log is append-only; an unparseable timestamp keeps its entry
    // alive at the Unix epoch rather than dropping history.
    let ts = raw
        .ts_iso
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    let food_name = raw.food_name.unwrap_or_else(|| raw.food_id.clone());

    LogEntry {
        food_id: FoodId(raw.food_id),
        food_name,
        by,
        ts,
    }
}
