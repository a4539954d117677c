use crate::domain::model::{BirthProfile, MonthDay, ZodiacRange};
use crate::utils::error::{FortuneError, Result};
use crate::utils::validation::parse_birthdate;
use chrono::{Datelike, Month, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AstrologyFile {
    #[serde(rename = "Zodiac")]
    zodiac: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SignEntry {
    #[serde(rename = "Dates")]
    dates: String,
}

/// Sign ranges in the order the data file declares them. Lookup is first match.
#[derive(Debug, Clone, Default)]
pub struct ZodiacTable {
    ranges: Vec<ZodiacRange>,
}

impl ZodiacTable {
    pub fn new(ranges: Vec<ZodiacRange>) -> Self {
        Self { ranges }
    }

    /// Parses `astrology.json`: `{"Zodiac": {"Aries": {"Dates": "March 21 - April 19"}}}`.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: AstrologyFile = serde_json::from_slice(bytes)?;

        let mut ranges = Vec::with_capacity(file.zodiac.len());
        for (sign, value) in file.zodiac {
            let entry: SignEntry = serde_json::from_value(value)?;
            let (start, end) = parse_date_range(&entry.dates).ok_or_else(|| {
                FortuneError::CatalogError {
                    file: "astrology.json".to_string(),
                    message: format!("{}: cannot read date range '{}'", sign, entry.dates),
                }
            })?;
            ranges.push(ZodiacRange {
                sign,
                start,
                end,
            });
        }

        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[ZodiacRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn sign_for(&self, date: MonthDay) -> Option<&ZodiacRange> {
        self.ranges.iter().find(|range| range.contains(date))
    }
}

fn parse_month_day(text: &str) -> Option<MonthDay> {
    let mut parts = text.split_whitespace();
    let month = parts.next()?.parse::<Month>().ok()?.number_from_month();
    let day = parts.next()?.parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    // 2000 is a leap year so Feb 29 is accepted
    NaiveDate::from_ymd_opt(2000, month, day)?;
    Some(MonthDay::new(month, day))
}

fn parse_date_range(text: &str) -> Option<(MonthDay, MonthDay)> {
    let (start, end) = text.split_once(" - ")?;
    Some((parse_month_day(start)?, parse_month_day(end)?))
}

/// Oldest age a birthdate may produce.
pub const MAX_AGE: u32 = 130;

/// Full years elapsed between `birth` and `today`, or `None` for a birthdate
/// in the future or one older than [`MAX_AGE`].
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let birthday_pending = (today.month(), today.day()) < (birth.month(), birth.day());
    let age = today.year() - birth.year() - i32::from(birthday_pending);
    u32::try_from(age).ok().filter(|age| *age <= MAX_AGE)
}

pub fn compute_age_and_zodiac(
    birthdate: &str,
    today: NaiveDate,
    table: &ZodiacTable,
) -> Result<BirthProfile> {
    let invalid = || FortuneError::InvalidDate {
        input: birthdate.to_string(),
    };

    let birth = parse_birthdate(birthdate).ok_or_else(invalid)?;
    let age = age_on(birth, today).ok_or_else(invalid)?;
    let sign = table
        .sign_for(MonthDay::new(birth.month(), birth.day()))
        .ok_or_else(invalid)?;

    Ok(BirthProfile {
        age,
        sign: sign.sign.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASTROLOGY: &str = include_str!("../../assets/astrology.json");

    fn table() -> ZodiacTable {
        ZodiacTable::from_json(ASTROLOGY.as_bytes()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_table_keeps_declared_order() {
        let table = table();
        assert_eq!(table.len(), 12);
        assert_eq!(table.ranges()[0].sign, "Aries");
        assert_eq!(table.ranges()[11].sign, "Pisces");
    }

    #[test]
    fn test_birthday_not_yet_reached() {
        let profile = compute_age_and_zodiac("1990-07-04", date(2024, 7, 3), &table()).unwrap();
        assert_eq!(profile.age, 33);
        assert_eq!(profile.sign, "Cancer");

        let profile = compute_age_and_zodiac("1990-07-04", date(2024, 7, 4), &table()).unwrap();
        assert_eq!(profile.age, 34);
    }

    #[test]
    fn test_end_day_belongs_to_its_range() {
        let table = table();
        let profile = compute_age_and_zodiac("2000-07-22", date(2024, 1, 1), &table).unwrap();
        assert_eq!(profile.sign, "Cancer");
        let profile = compute_age_and_zodiac("2000-07-23", date(2024, 1, 1), &table).unwrap();
        assert_eq!(profile.sign, "Leo");
    }

    #[test]
    fn test_year_boundary_is_capricorn() {
        let table = table();
        for birthdate in ["1985-12-22", "1985-12-31", "1986-01-01", "1986-01-19"] {
            let profile = compute_age_and_zodiac(birthdate, date(2024, 6, 1), &table).unwrap();
            assert_eq!(profile.sign, "Capricorn", "{}", birthdate);
        }
        let profile = compute_age_and_zodiac("1986-01-20", date(2024, 6, 1), &table).unwrap();
        assert_eq!(profile.sign, "Aquarius");
    }

    #[test]
    fn test_every_day_has_exactly_one_sign() {
        let table = table();
        let mut day = date(2000, 1, 1);
        let mut checked = 0;
        while day.year() == 2000 {
            let md = MonthDay::new(day.month(), day.day());
            let matches = table.ranges().iter().filter(|r| r.contains(md)).count();
            assert_eq!(matches, 1, "{:?}", md);
            checked += 1;
            day = day.succ_opt().unwrap();
        }
        assert_eq!(checked, 366);
    }

    #[test]
    fn test_leap_day() {
        let profile = compute_age_and_zodiac("2000-02-29", date(2024, 3, 1), &table()).unwrap();
        assert_eq!(profile.sign, "Pisces");
        assert_eq!(profile.age, 24);

        let profile = compute_age_and_zodiac("2000-02-29", date(2023, 2, 28), &table()).unwrap();
        assert_eq!(profile.age, 22);
    }

    #[test]
    fn test_age_stays_in_range() {
        let table = table();
        let today = date(2024, 7, 3);
        for birthdate in ["1894-07-03", "1924-01-01", "1960-05-05", "2024-07-03"] {
            let profile = compute_age_and_zodiac(birthdate, today, &table).unwrap();
            assert!(profile.age <= MAX_AGE);
            assert!(table.ranges().iter().any(|r| r.sign == profile.sign));
        }

        for birthdate in ["1800-01-01", "1893-07-03"] {
            assert!(matches!(
                compute_age_and_zodiac(birthdate, today, &table),
                Err(FortuneError::InvalidDate { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let table = table();
        let today = date(2024, 7, 3);
        assert!(matches!(
            compute_age_and_zodiac("yesterday", today, &table),
            Err(FortuneError::InvalidDate { .. })
        ));
        assert!(matches!(
            compute_age_and_zodiac("2030-01-01", today, &table),
            Err(FortuneError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_gap_in_table_is_invalid_date() {
        let table = ZodiacTable::new(vec![ZodiacRange {
            sign: "Cancer".to_string(),
            start: MonthDay::new(6, 21),
            end: MonthDay::new(7, 22),
        }]);
        let result = compute_age_and_zodiac("1990-01-01", date(2024, 1, 1), &table);
        assert!(matches!(result, Err(FortuneError::InvalidDate { .. })));
    }

    #[test]
    fn test_bad_range_text_rejected() {
        let json = r#"{"Zodiac": {"Aries": {"Dates": "Marchember 21 - April 19"}}}"#;
        assert!(matches!(
            ZodiacTable::from_json(json.as_bytes()),
            Err(FortuneError::CatalogError { .. })
        ));
    }
}
