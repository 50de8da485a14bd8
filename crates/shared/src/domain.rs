use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ParseGroupError, ParseParticipantError};

/// Stable slug identifying one food item. Unique within a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodId(pub String);

impl FoodId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FoodId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One of the two fixed identities allowed to mark items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    Vini,
    Duda,
}

impl Participant {
    /// Owner of the default log tab and of legacy single-counter marks.
    pub const FIRST: Participant = Participant::Vini;

    pub fn as_str(self) -> &'static str {
        match self {
            Participant::Vini => "vini",
            Participant::Duda => "duda",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Participant::Vini => "Vini",
            Participant::Duda => "Duda",
        }
    }

    pub fn other(self) -> Participant {
        match self {
            Participant::Vini => Participant::Duda,
            Participant::Duda => Participant::Vini,
        }
    }
}

impl FromStr for Participant {
    type Err = ParseParticipantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vini" => Ok(Participant::Vini),
            "duda" => Ok(Participant::Duda),
            _ => Err(ParseParticipantError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display category used purely for layout partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Churrasco,
    Sobremesas,
}

impl Group {
    /// Bucket that also absorbs unrecognized or missing groups.
    pub const DEFAULT: Group = Group::Churrasco;

    pub fn as_str(self) -> &'static str {
        match self {
            Group::Churrasco => "churrasco",
            Group::Sobremesas => "sobremesas",
        }
    }
}

impl FromStr for Group {
    type Err = ParseGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "churrasco" => Ok(Group::Churrasco),
            "sobremesas" => Ok(Group::Sobremesas),
            _ => Err(ParseGroupError {
                input: s.to_string(),
            }),
        }
    }
}

/// Per-participant mark counters for one food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkCounts {
    #[serde(default)]
    pub vini: u32,
    #[serde(default)]
    pub duda: u32,
}

impl MarkCounts {
    pub fn get(self, by: Participant) -> u32 {
        match by {
            Participant::Vini => self.vini,
            Participant::Duda => self.duda,
        }
    }

    pub fn bump(&mut self, by: Participant) {
        match by {
            Participant::Vini => self.vini += 1,
            Participant::Duda => self.duda += 1,
        }
    }

    pub fn total(self) -> u64 {
        u64::from(self.vini) + u64::from(self.duda)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    pub group: Group,
    pub counts: MarkCounts,
}

/// Immutable record of one mark event. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "foodId")]
    pub food_id: FoodId,
    #[serde(rename = "foodName")]
    pub food_name: String,
    pub by: Participant,
    #[serde(rename = "tsISO")]
    pub ts: DateTime<Utc>,
}

/// The full item collection plus log, the unit of transfer between client
/// and state source. Mutated only by whole-state replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistState {
    pub foods: Vec<Food>,
    pub log: Vec<LogEntry>,
}

impl ChecklistState {
    pub fn food(&self, id: &FoodId) -> Option<&Food> {
        self.foods.iter().find(|food| &food.id == id)
    }
}

fn seed_food(id: &str, name: &str, group: Group) -> Food {
    Food {
        id: FoodId(id.to_string()),
        name: name.to_string(),
        group,
        counts: MarkCounts::default(),
    }
}

/// The fixed seed set: all counters zero, empty log.
pub fn seed_state() -> ChecklistState {
    use Group::{Churrasco, Sobremesas};
    ChecklistState {
        foods: vec![
            seed_food(
                "camafeu-mostarda",
                "1 - Camafeu com molho de mostarda",
                Churrasco,
            ),
            seed_food(
                "panceta-ancho-farofa-vinagrete",
                "2 - Panceta, bife de ancho, farofa de bacon e vinagrete",
                Churrasco,
            ),
            seed_food(
                "fraldinha-batata-alcatra",
                "3 - Fraldinha, batata assada e alcatra com molho de cerveja",
                Churrasco,
            ),
            seed_food(
                "picanha-mandioca",
                "4 - Picanha suína/bovina e mandioca com molho de mostarda",
                Churrasco,
            ),
            seed_food("costela-farofa", "5 - Costela com farofa", Churrasco),
            seed_food("cupim-salada", "6 - Cupim com salada", Churrasco),
            seed_food("pao-de-alho", "* Pão de alho", Churrasco),
            seed_food("coracaozinho", "* Coraçãozinho", Churrasco),
            seed_food("mousse-maracuja", "1 - Mousse de maracujá", Sobremesas),
            seed_food(
                "torta-caramelo-churros",
                "2 - Torta caramelo/churros",
                Sobremesas,
            ),
            seed_food("pave-morango", "V - Pavê de morango", Sobremesas),
            seed_food(
                "torta-ninho-nutella",
                "3 - Torta de ninho com Nutella",
                Sobremesas,
            ),
            seed_food("torta-pistache", "4 - Torta de pistache", Sobremesas),
        ],
        log: Vec::new(),
    }
}

/// Derives a stable slug from a display name: lowercase, diacritics
/// stripped, runs of non-alphanumerics collapsed to `-`.
pub fn safe_id_from_name(name: &str, fallback_suffix: i64) -> FoodId {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars() {
        let ch = fold_diacritic(ch);
        for ch in ch.to_lowercase() {
            if ch.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ch);
            } else {
                pending_dash = true;
            }
        }
    }
    if slug.is_empty() {
        return FoodId(format!("food-{fallback_suffix}"));
    }
    FoodId(slug)
}

fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_has_thirteen_unique_zeroed_foods() {
        let state = seed_state();
        assert_eq!(state.foods.len(), 13);
        assert!(state.log.is_empty());

        let ids: HashSet<_> = state.foods.iter().map(|f| f.id.clone()).collect();
        assert_eq!(ids.len(), state.foods.len());
        assert!(state.foods.iter().all(|f| f.counts.total() == 0));
    }

    #[test]
    fn seed_groups_split_eight_churrasco_five_sobremesas() {
        let state = seed_state();
        let churrasco = state
            .foods
            .iter()
            .filter(|f| f.group == Group::Churrasco)
            .count();
        assert_eq!(churrasco, 8);
        assert_eq!(state.foods.len() - churrasco, 5);
    }

    #[test]
    fn participant_parsing_is_case_insensitive_and_closed() {
        assert_eq!("vini".parse::<Participant>().unwrap(), Participant::Vini);
        assert_eq!("Duda".parse::<Participant>().unwrap(), Participant::Duda);
        assert_eq!(" VINI ".parse::<Participant>().unwrap(), Participant::Vini);

        let err = "carlos".parse::<Participant>().unwrap_err();
        assert!(err.to_string().contains("carlos"));
    }

    #[test]
    fn log_entry_uses_original_wire_field_names() {
        let entry = LogEntry {
            food_id: FoodId::from("costela-farofa"),
            food_name: "5 - Costela com farofa".to_string(),
            by: Participant::Vini,
            ts: "2024-06-01T18:30:00Z".parse().expect("timestamp"),
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["foodId"], "costela-farofa");
        assert_eq!(json["foodName"], "5 - Costela com farofa");
        assert_eq!(json["by"], "vini");
        assert_eq!(json["tsISO"], "2024-06-01T18:30:00Z");
    }

    #[test]
    fn slugifies_names_like_the_original_deployment() {
        assert_eq!(
            safe_id_from_name("Pão de alho", 0),
            FoodId::from("pao-de-alho")
        );
        assert_eq!(
            safe_id_from_name("  Coraçãozinho!! ", 0),
            FoodId::from("coracaozinho")
        );
        assert_eq!(safe_id_from_name("***", 42), FoodId::from("food-42"));
    }
}
