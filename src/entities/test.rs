//! Test entity - quality inspections run against an aircraft

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{
    coerce_int, display_opt, optional_text, parse_date, parse_enum, parse_reference, Choice,
    FieldError, FieldKind, FieldSpec, Record, Summary,
};
use crate::core::identity::RecordId;
use crate::core::policy::Section;
use crate::core::query::Lookup;
use crate::core::store::Entry;

crate::choice_enum! {
    pub enum TestType ("test type") {
        Structural => "Structural",
        Avionics => "Avionics",
        Engine => "Engine",
        Hydraulic => "Hydraulic",
        Flight => "Flight",
        Safety => "Safety",
    }
}

crate::choice_enum! {
    pub enum TestStatus ("test status") {
        Scheduled => "Scheduled",
        InProgress => "In Progress",
        Passed => "Passed",
        Failed => "Failed",
        PendingReview => "Pending Review",
    }
}

impl TestStatus {
    /// Passed or failed, as opposed to still open
    pub fn is_decided(&self) -> bool {
        matches!(self, TestStatus::Passed | TestStatus::Failed)
    }
}

/// A quality test of one aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub aircraft_id: RecordId,
    pub test_type: TestType,
    pub test_name: String,
    pub status: TestStatus,
    pub test_date: NaiveDate,
    pub inspector: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// 0-100, not range checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TestFilter {
    pub status: Choice<TestStatus>,
    pub test_type: Choice<TestType>,
    pub aircraft: Option<RecordId>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("aircraft_id", "Aircraft", FieldKind::AircraftRef),
    FieldSpec::required("test_type", "Test type", FieldKind::Choice(TestType::LABELS)),
    FieldSpec::required("test_name", "Test name", FieldKind::Text),
    FieldSpec::required("status", "Status", FieldKind::Choice(TestStatus::LABELS)),
    FieldSpec::required("test_date", "Test date", FieldKind::Date),
    FieldSpec::required("inspector", "Inspector", FieldKind::Text),
    FieldSpec::optional("result", "Result", FieldKind::Text),
    FieldSpec::optional("notes", "Notes", FieldKind::Text),
    FieldSpec::optional("score", "Score (0-100)", FieldKind::Integer { fallback: 0 }),
];

impl Record for Test {
    const KIND: &'static str = "test";
    const SECTION: Section = Section::Tests;
    type Filter = TestFilter;

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn blank() -> Self {
        Self {
            aircraft_id: RecordId::new(0),
            test_type: TestType::Structural,
            test_name: String::new(),
            status: TestStatus::Scheduled,
            test_date: chrono::Local::now().date_naive(),
            inspector: String::new(),
            result: None,
            notes: None,
            score: None,
        }
    }

    fn title(&self) -> &str {
        &self.test_name
    }

    fn search_fields<'a>(&'a self, lookup: &'a Lookup) -> Vec<&'a str> {
        let mut fields = vec![self.test_name.as_str(), self.inspector.as_str()];
        if let Some(model) = lookup.aircraft_model(self.aircraft_id) {
            fields.push(model);
        }
        fields
    }

    fn matches(&self, filter: &TestFilter) -> bool {
        filter.status.admits(&self.status)
            && filter.test_type.admits(&self.test_type)
            && filter.aircraft.map_or(true, |id| id == self.aircraft_id)
    }

    fn get_field(&self, name: &str) -> Option<String> {
        let value = match name {
            "aircraft_id" => self.aircraft_id.to_string(),
            "test_type" => self.test_type.to_string(),
            "test_name" => self.test_name.clone(),
            "status" => self.status.to_string(),
            "test_date" => self.test_date.to_string(),
            "inspector" => self.inspector.clone(),
            "result" => display_opt(&self.result),
            "notes" => display_opt(&self.notes),
            "score" => display_opt(&self.score),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "aircraft_id" => self.aircraft_id = parse_reference(name, value)?,
            "test_type" => self.test_type = parse_enum(name, value)?,
            "test_name" => self.test_name = value.to_string(),
            "status" => self.status = parse_enum(name, value)?,
            "test_date" => self.test_date = parse_date(name, value)?,
            "inspector" => self.inspector = value.to_string(),
            "result" => self.result = optional_text(value),
            "notes" => self.notes = optional_text(value),
            "score" => self.score = optional_text(value).map(|v| coerce_int(name, &v, 0)),
            _ => return Err(FieldError::unknown::<Self>(name)),
        }
        Ok(())
    }

    fn summarize(entries: &[Entry<Self>], lookup: &Lookup) -> Summary {
        let count = |status: TestStatus| {
            entries
                .iter()
                .filter(|e| e.record.status == status)
                .count()
        };
        let passed = count(TestStatus::Passed);
        let failed = count(TestStatus::Failed);

        let by_type = TestType::ALL
            .iter()
            .map(|t| {
                let n = entries.iter().filter(|e| e.record.test_type == *t).count();
                format!("{}: {}", t, n)
            })
            .collect();

        let recent = entries
            .iter()
            .filter(|e| e.record.status.is_decided())
            .take(5)
            .map(|e| {
                let t = &e.record;
                let score = t.score.map(|s| format!(" {}%", s)).unwrap_or_default();
                format!(
                    "{} ({}, {}): {}{} on {}",
                    t.test_name,
                    lookup.aircraft_label(t.aircraft_id),
                    t.test_type,
                    t.status,
                    score,
                    t.test_date
                )
            })
            .collect();

        Summary::new("Tests")
            .metric("Total Tests", entries.len())
            .metric("Passed", passed)
            .metric("Failed", failed)
            .metric("In Progress", count(TestStatus::InProgress))
            .metric("Pass Rate", format!("{}%", pass_rate(passed, failed)))
            .metric("Avg Score", format!("{}%", average_score(entries)))
            .list("Tests by Type", by_type)
            .list("Recent Results", recent)
    }
}

/// Share of decided tests that passed, as a rounded percentage
pub fn pass_rate(passed: usize, failed: usize) -> u32 {
    let decided = passed + failed;
    if decided == 0 {
        return 0;
    }
    (passed as f64 / decided as f64 * 100.0).round() as u32
}

/// Rounded mean over tests that carry a non-zero score
pub fn average_score(entries: &[Entry<Test>]) -> u32 {
    let scores: Vec<u32> = entries
        .iter()
        .filter_map(|e| e.record.score)
        .filter(|s| *s > 0)
        .collect();
    if scores.is_empty() {
        return 0;
    }
    let total: u64 = scores.iter().map(|s| u64::from(*s)).sum();
    (total as f64 / scores.len() as f64).round() as u32
}

/// Tests on the schedule when the dashboard starts
pub fn seed() -> Vec<Entry<Test>> {
    let test = |aircraft: u64, test_type: TestType, name: &str, status: TestStatus| Test {
        aircraft_id: RecordId::new(aircraft),
        test_type,
        test_name: name.to_string(),
        status,
        test_date: NaiveDate::default(),
        inspector: "Mike Smith".to_string(),
        result: None,
        notes: None,
        score: None,
    };
    let on = |y: i32, m: u32, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    vec![
        Entry::new(
            RecordId::new(1),
            Test {
                test_date: on(2024, 2, 15),
                result: Some("All structural integrity tests passed within specifications".into()),
                score: Some(98),
                ..test(1, TestType::Structural, "Wing Load Test", TestStatus::Passed)
            },
        ),
        Entry::new(
            RecordId::new(2),
            Test {
                test_date: on(2024, 3, 1),
                notes: Some("Testing autopilot systems".into()),
                score: Some(85),
                ..test(
                    1,
                    TestType::Avionics,
                    "Flight Control System Test",
                    TestStatus::InProgress,
                )
            },
        ),
        Entry::new(
            RecordId::new(3),
            Test {
                test_date: on(2024, 2, 20),
                inspector: "John Engineer".into(),
                result: Some("Engine performance exceeds specifications".into()),
                score: Some(95),
                ..test(2, TestType::Engine, "Thrust Performance Test", TestStatus::Passed)
            },
        ),
        Entry::new(
            RecordId::new(4),
            Test {
                test_date: on(2024, 2, 25),
                result: Some("Signal interference detected, requires recalibration".into()),
                notes: Some("Scheduled for retest after adjustments".into()),
                score: Some(62),
                ..test(2, TestType::Avionics, "Radar System Test", TestStatus::Failed)
            },
        ),
        Entry::new(
            RecordId::new(5),
            Test {
                test_date: on(2024, 3, 10),
                ..test(3, TestType::Safety, "Emergency Systems Test", TestStatus::Scheduled)
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::Query;
    use crate::core::store::RecordStore;
    use crate::entities::aircraft;

    fn lookup() -> Lookup {
        Lookup::from_aircraft(&RecordStore::seeded(aircraft::seed()))
    }

    #[test]
    fn test_pass_rate_ignores_open_tests() {
        assert_eq!(pass_rate(2, 1), 67);
        assert_eq!(pass_rate(0, 0), 0);
        assert_eq!(pass_rate(3, 0), 100);
    }

    #[test]
    fn test_average_score_skips_unscored() {
        // (98 + 85 + 95 + 62) / 4 = 85; test 5 has no score
        assert_eq!(average_score(&seed()), 85);
        assert_eq!(average_score(&[]), 0);
    }

    #[test]
    fn test_summary() {
        let summary = Test::summarize(&seed(), &lookup());
        assert_eq!(summary.get("Total Tests"), Some("5"));
        assert_eq!(summary.get("Passed"), Some("2"));
        assert_eq!(summary.get("Failed"), Some("1"));
        assert_eq!(summary.get("In Progress"), Some("1"));
        assert_eq!(summary.get("Pass Rate"), Some("67%"));

        let by_type = &summary.lists[0];
        assert_eq!(by_type.items.len(), TestType::ALL.len());
        assert!(by_type.items.contains(&"Avionics: 2".to_string()));

        let recent = &summary.lists[1];
        assert_eq!(recent.items.len(), 3);
        assert!(recent.items[0].starts_with("Wing Load Test (A320neo, Structural): Passed 98%"));
    }

    #[test]
    fn test_filters() {
        let store = RecordStore::seeded(seed());
        let rows = Query::new()
            .filter(TestFilter {
                test_type: Choice::Only(TestType::Avionics),
                aircraft: Some(RecordId::new(2)),
                ..Default::default()
            })
            .apply(store.list(), &lookup());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.test_name, "Radar System Test");
    }

    #[test]
    fn test_search_by_model_and_inspector() {
        let store = RecordStore::seeded(seed());
        let gulfstream = Query::<TestFilter>::new()
            .search("gulfstream")
            .apply(store.list(), &lookup());
        assert_eq!(gulfstream.len(), 1);

        let john = Query::<TestFilter>::new()
            .search("john")
            .apply(store.list(), &lookup());
        assert_eq!(john.len(), 1);
        assert_eq!(john[0].record.test_name, "Thrust Performance Test");
    }

    #[test]
    fn test_score_field() {
        let mut test = Test::blank();
        test.set_field("score", "91").unwrap();
        assert_eq!(test.score, Some(91));
        test.set_field("score", "").unwrap();
        assert_eq!(test.score, None);
        test.set_field("score", "high").unwrap();
        assert_eq!(test.score, Some(0));
    }
}
