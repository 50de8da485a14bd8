//! Pure projections from the checklist state to renderable view data.
//!
//! Nothing here touches a state source; the UI surface redraws everything
//! from scratch out of these values after each successful operation.

use chrono::{DateTime, Utc};
use shared::domain::{ChecklistState, FoodId, Group, MarkCounts, Participant};

/// Header pill: item count plus the sum of every counter of every food.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub items: usize,
    pub total_marks: u64,
}

pub fn summary(state: &ChecklistState) -> Summary {
    Summary {
        items: state.foods.len(),
        total_marks: state.foods.iter().map(|food| food.counts.total()).sum(),
    }
}

/// Visual marker for a card, derived from which participants have marked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardMarker {
    Unmarked,
    ViniOnly,
    DudaOnly,
    Both,
}

impl CardMarker {
    pub fn from_counts(counts: MarkCounts) -> Self {
        match (counts.vini > 0, counts.duda > 0) {
            (false, false) => CardMarker::Unmarked,
            (true, false) => CardMarker::ViniOnly,
            (false, true) => CardMarker::DudaOnly,
            (true, true) => CardMarker::Both,
        }
    }

    /// Class name consumed by the styled UI surface.
    pub fn class(self) -> &'static str {
        match self {
            CardMarker::Unmarked => "",
            CardMarker::ViniOnly => "is-marked-vini",
            CardMarker::DudaOnly => "is-marked-duda",
            CardMarker::Both => "is-marked-both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodCard {
    pub id: FoodId,
    pub name: String,
    pub counts: MarkCounts,
    pub marker: CardMarker,
}

/// Foods partitioned into the two display buckets, input order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub churrasco: Vec<FoodCard>,
    pub sobremesas: Vec<FoodCard>,
}

pub fn board(state: &ChecklistState) -> Board {
    let mut out = Board::default();
    for food in &state.foods {
        let card = FoodCard {
            id: food.id.clone(),
            name: food.name.clone(),
            counts: food.counts,
            marker: CardMarker::from_counts(food.counts),
        };
        match food.group {
            Group::Churrasco => out.churrasco.push(card),
            Group::Sobremesas => out.sobremesas.push(card),
        }
    }
    out
}

/// Display cap per log panel.
pub const LOG_PANEL_LIMIT: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub food_name: String,
    pub by: Participant,
    pub when: String,
}

/// One participant's panel: their entries only, at most the 25 most recent,
/// newest first.
pub fn log_panel(state: &ChecklistState, participant: Participant) -> Vec<LogLine> {
    state
        .log
        .iter()
        .filter(|entry| entry.by == participant)
        .rev()
        .take(LOG_PANEL_LIMIT)
        .map(|entry| LogLine {
            food_name: entry.food_name.clone(),
            by: entry.by,
            when: format_ts(entry.ts),
        })
        .collect()
}

/// pt-BR style timestamp, matching the original `toLocaleString("pt-BR")`.
fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Which log panel is visible. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTabs {
    active: Participant,
}

impl Default for LogTabs {
    fn default() -> Self {
        Self {
            active: Participant::FIRST,
        }
    }
}

impl LogTabs {
    pub fn active(self) -> Participant {
        self.active
    }

    pub fn toggle(&mut self) {
        self.active = self.active.other();
    }

    pub fn activate(&mut self, participant: Participant) {
        self.active = participant;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use shared::domain::{seed_state, LogEntry};

    fn state_with_marks(marks: &[(usize, Participant)]) -> ChecklistState {
        let mut state = seed_state();
        let base: DateTime<Utc> = "2024-06-01T12:00:00Z".parse().expect("timestamp");
        for (i, (food_index, by)) in marks.iter().enumerate() {
            let (id, name) = {
                let food = &mut state.foods[*food_index];
                food.counts.bump(*by);
                (food.id.clone(), food.name.clone())
            };
            state.log.push(LogEntry {
                food_id: id,
                food_name: name,
                by: *by,
                ts: base + TimeDelta::seconds(i as i64),
            });
        }
        state
    }

    #[test]
    fn summary_total_equals_counter_sum() {
        let state = state_with_marks(&[
            (0, Participant::Vini),
            (0, Participant::Duda),
            (9, Participant::Duda),
        ]);
        let summary = summary(&state);
        assert_eq!(summary.items, 13);
        assert_eq!(summary.total_marks, 3);
    }

    #[test]
    fn board_partitions_into_two_buckets_preserving_order() {
        let state = seed_state();
        let board = board(&state);
        assert_eq!(board.churrasco.len(), 8);
        assert_eq!(board.sobremesas.len(), 5);
        assert_eq!(board.churrasco[0].id, FoodId::from("camafeu-mostarda"));
        assert_eq!(board.sobremesas[0].id, FoodId::from("mousse-maracuja"));
    }

    #[test]
    fn marker_reflects_which_participants_marked() {
        assert_eq!(
            CardMarker::from_counts(MarkCounts { vini: 0, duda: 0 }),
            CardMarker::Unmarked
        );
        assert_eq!(
            CardMarker::from_counts(MarkCounts { vini: 2, duda: 0 }),
            CardMarker::ViniOnly
        );
        assert_eq!(
            CardMarker::from_counts(MarkCounts { vini: 0, duda: 1 }),
            CardMarker::DudaOnly
        );
        assert_eq!(
            CardMarker::from_counts(MarkCounts { vini: 1, duda: 1 }),
            CardMarker::Both
        );
        assert_eq!(CardMarker::Both.class(), "is-marked-both");
        assert_eq!(CardMarker::Unmarked.class(), "");
    }

    #[test]
    fn log_panel_filters_by_participant() {
        let state = state_with_marks(&[
            (0, Participant::Vini),
            (1, Participant::Duda),
            (2, Participant::Vini),
        ]);
        let vini_panel = log_panel(&state, Participant::Vini);
        let duda_panel = log_panel(&state, Participant::Duda);
        assert_eq!(vini_panel.len(), 2);
        assert_eq!(duda_panel.len(), 1);
        assert!(vini_panel.iter().all(|line| line.by == Participant::Vini));
    }

    #[test]
    fn log_panel_shows_at_most_25_entries_newest_first() {
        let marks: Vec<_> = (0..30).map(|i| (i % 13, Participant::Vini)).collect();
        let state = state_with_marks(&marks);
        assert_eq!(state.log.len(), 30);

        let panel = log_panel(&state, Participant::Vini);
        assert_eq!(panel.len(), LOG_PANEL_LIMIT);
        // Newest entry (30th mark, index 29 → food 29 % 13 = 3) comes first.
        assert_eq!(panel[0].food_name, state.log[29].food_name);
        assert_eq!(panel[0].when, "01/06/2024 12:00:29");
        assert_eq!(panel.last().expect("line").when, "01/06/2024 12:00:05");
    }

    #[test]
    fn empty_log_projects_to_an_empty_panel() {
        let state = seed_state();
        assert!(log_panel(&state, Participant::Vini).is_empty());
        assert!(log_panel(&state, Participant::Duda).is_empty());
    }

    #[test]
    fn tabs_default_to_first_participant_and_toggle() {
        let mut tabs = LogTabs::default();
        assert_eq!(tabs.active(), Participant::Vini);
        tabs.toggle();
        assert_eq!(tabs.active(), Participant::Duda);
        tabs.toggle();
        assert_eq!(tabs.active(), Participant::Vini);
        tabs.activate(Participant::Duda);
        assert_eq!(tabs.active(), Participant::Duda);
    }
}
