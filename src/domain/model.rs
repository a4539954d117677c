use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arcana {
    #[serde(rename = "Major Arcana")]
    MajorArcana,
    Wands,
    Cups,
    Swords,
    Pentacles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub ordering: u32,
    pub arcana: Arcana,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadPosition {
    pub id: u32,
    pub name: String,
    pub description: String,
}

/// A named arrangement of card positions. Field names on the wire follow
/// `tarot_spreads.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spread {
    pub name: String,
    /// Template with positional `{}` slots bound to `prompt_terms` in order.
    #[serde(rename = "prompt")]
    pub prompt_template: String,
    pub prompt_terms: Vec<String>,
    #[serde(rename = "fortune_sequence", default)]
    pub fortune_labels: Vec<String>,
    #[serde(rename = "spread_count")]
    pub card_count: usize,
    #[serde(rename = "card_description")]
    pub positions: Vec<SpreadPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZodiacRange {
    pub sign: String,
    pub start: MonthDay,
    pub end: MonthDay,
}

impl ZodiacRange {
    /// Inclusive on both ends. A range whose start falls after its end wraps
    /// the new year and is checked as `[start, Dec 31]` plus `[Jan 1, end]`.
    pub fn contains(&self, date: MonthDay) -> bool {
        if self.start <= self.end {
            self.start <= date && date <= self.end
        } else {
            date >= self.start || date <= self.end
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthProfile {
    pub age: u32,
    pub sign: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawnCard {
    pub index: usize,
    pub card: Card,
    pub image_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    pub cards: Vec<DrawnCard>,
}

impl DrawResult {
    pub fn names(&self) -> Vec<&str> {
        self.cards.iter().map(|drawn| drawn.card.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortuneResult {
    pub card_fortunes: Vec<String>,
    pub overall: String,
}

/// What the user typed last time, kept between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastInputs {
    pub birthdate: Option<String>,
    pub desire: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(sign: &str, start: (u32, u32), end: (u32, u32)) -> ZodiacRange {
        ZodiacRange {
            sign: sign.to_string(),
            start: MonthDay::new(start.0, start.1),
            end: MonthDay::new(end.0, end.1),
        }
    }

    #[test]
    fn test_range_is_inclusive() {
        let cancer = range("Cancer", (6, 21), (7, 22));
        assert!(cancer.contains(MonthDay::new(6, 21)));
        assert!(cancer.contains(MonthDay::new(7, 22)));
        assert!(!cancer.contains(MonthDay::new(7, 23)));
        assert!(!cancer.contains(MonthDay::new(6, 20)));
    }

    #[test]
    fn test_wrapping_range() {
        let capricorn = range("Capricorn", (12, 22), (1, 19));
        assert!(capricorn.contains(MonthDay::new(12, 22)));
        assert!(capricorn.contains(MonthDay::new(12, 31)));
        assert!(capricorn.contains(MonthDay::new(1, 1)));
        assert!(capricorn.contains(MonthDay::new(1, 19)));
        assert!(!capricorn.contains(MonthDay::new(1, 20)));
        assert!(!capricorn.contains(MonthDay::new(6, 15)));
    }

    #[test]
    fn test_arcana_wire_names() {
        let card: Card =
            serde_json::from_str(r#"{"ordering": 0, "arcana": "Major Arcana", "name": "The Fool"}"#)
                .unwrap();
        assert_eq!(card.arcana, Arcana::MajorArcana);
    }
}
