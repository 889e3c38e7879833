//! Production stage entity - one step of building an airframe

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{
    coerce_int, display_opt, optional_text, parse_enum, parse_optional_date, parse_reference,
    Choice, FieldError, FieldKind, FieldSpec, Record, Summary,
};
use crate::core::identity::RecordId;
use crate::core::policy::Section;
use crate::core::query::Lookup;
use crate::core::store::Entry;

crate::choice_enum! {
    pub enum StageStatus ("stage status") {
        NotStarted => "Not Started",
        InProgress => "In Progress",
        Completed => "Completed",
        Delayed => "Delayed",
    }
}

/// One production stage of an aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionStage {
    /// Aircraft being built; its model is looked up when displayed
    pub aircraft_id: RecordId,
    pub stage_name: String,
    pub stage_number: u32,
    pub status: StageStatus,
    pub assigned_to: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Planned length in days
    pub estimated_duration: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<u32>,

    /// 0-100, not range checked
    pub completion_percentage: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StageFilter {
    pub status: Choice<StageStatus>,
    pub aircraft: Option<RecordId>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("aircraft_id", "Aircraft", FieldKind::AircraftRef),
    FieldSpec::required("stage_name", "Stage name", FieldKind::Text),
    FieldSpec::required("stage_number", "Stage number", FieldKind::Integer { fallback: 1 }),
    FieldSpec::required("status", "Status", FieldKind::Choice(StageStatus::LABELS)),
    FieldSpec::required("assigned_to", "Assigned to", FieldKind::Text),
    FieldSpec::optional("start_date", "Start date", FieldKind::Date),
    FieldSpec::optional("end_date", "End date", FieldKind::Date),
    FieldSpec::required(
        "estimated_duration",
        "Estimated duration (days)",
        FieldKind::Integer { fallback: 0 },
    ),
    FieldSpec::optional(
        "actual_duration",
        "Actual duration (days)",
        FieldKind::Integer { fallback: 0 },
    ),
    FieldSpec::required(
        "completion_percentage",
        "Completion %",
        FieldKind::Integer { fallback: 0 },
    ),
    FieldSpec::optional("notes", "Notes", FieldKind::Text),
];

impl Record for ProductionStage {
    const KIND: &'static str = "stage";
    const SECTION: Section = Section::Production;
    type Filter = StageFilter;

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn blank() -> Self {
        Self {
            aircraft_id: RecordId::new(0),
            stage_name: String::new(),
            stage_number: 1,
            status: StageStatus::NotStarted,
            assigned_to: String::new(),
            start_date: None,
            end_date: None,
            estimated_duration: 0,
            actual_duration: None,
            completion_percentage: 0,
            notes: None,
        }
    }

    fn title(&self) -> &str {
        &self.stage_name
    }

    fn search_fields<'a>(&'a self, lookup: &'a Lookup) -> Vec<&'a str> {
        let mut fields = vec![self.stage_name.as_str(), self.assigned_to.as_str()];
        if let Some(model) = lookup.aircraft_model(self.aircraft_id) {
            fields.push(model);
        }
        fields
    }

    fn matches(&self, filter: &StageFilter) -> bool {
        filter.status.admits(&self.status)
            && filter.aircraft.map_or(true, |id| id == self.aircraft_id)
    }

    fn get_field(&self, name: &str) -> Option<String> {
        let value = match name {
            "aircraft_id" => self.aircraft_id.to_string(),
            "stage_name" => self.stage_name.clone(),
            "stage_number" => self.stage_number.to_string(),
            "status" => self.status.to_string(),
            "assigned_to" => self.assigned_to.clone(),
            "start_date" => display_opt(&self.start_date),
            "end_date" => display_opt(&self.end_date),
            "estimated_duration" => self.estimated_duration.to_string(),
            "actual_duration" => display_opt(&self.actual_duration),
            "completion_percentage" => self.completion_percentage.to_string(),
            "notes" => display_opt(&self.notes),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "aircraft_id" => self.aircraft_id = parse_reference(name, value)?,
            "stage_name" => self.stage_name = value.to_string(),
            "stage_number" => self.stage_number = coerce_int(name, value, 1),
            "status" => self.status = parse_enum(name, value)?,
            "assigned_to" => self.assigned_to = value.to_string(),
            "start_date" => self.start_date = parse_optional_date(name, value)?,
            "end_date" => self.end_date = parse_optional_date(name, value)?,
            "estimated_duration" => self.estimated_duration = coerce_int(name, value, 0),
            "actual_duration" => {
                self.actual_duration = optional_text(value).map(|v| coerce_int(name, &v, 0))
            }
            "completion_percentage" => self.completion_percentage = coerce_int(name, value, 0),
            "notes" => self.notes = optional_text(value),
            _ => return Err(FieldError::unknown::<Self>(name)),
        }
        Ok(())
    }

    fn summarize(entries: &[Entry<Self>], _lookup: &Lookup) -> Summary {
        let count = |status: StageStatus| {
            entries
                .iter()
                .filter(|e| e.record.status == status)
                .count()
        };
        let average = if entries.is_empty() {
            0
        } else {
            let total: u64 = entries
                .iter()
                .map(|e| u64::from(e.record.completion_percentage))
                .sum();
            (total as f64 / entries.len() as f64).round() as u64
        };

        Summary::new("Production")
            .metric("Total Stages", entries.len())
            .metric("In Progress", count(StageStatus::InProgress))
            .metric("Completed", count(StageStatus::Completed))
            .metric("Delayed", count(StageStatus::Delayed))
            .metric("Avg Completion", format!("{}%", average))
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Production stages in flight when the dashboard starts
pub fn seed() -> Vec<Entry<ProductionStage>> {
    let stage = |id: u64, aircraft: u64, name: &str, status: StageStatus| ProductionStage {
        aircraft_id: RecordId::new(aircraft),
        stage_name: name.to_string(),
        stage_number: id as u32,
        status,
        assigned_to: "John Engineer".to_string(),
        ..ProductionStage::blank()
    };

    vec![
        Entry::new(
            RecordId::new(1),
            ProductionStage {
                start_date: date(2024, 1, 15),
                end_date: date(2024, 2, 10),
                estimated_duration: 25,
                actual_duration: Some(26),
                completion_percentage: 100,
                notes: Some("Completed with minor delays due to part delivery".to_string()),
                ..stage(1, 1, "Fuselage Assembly", StageStatus::Completed)
            },
        ),
        Entry::new(
            RecordId::new(2),
            ProductionStage {
                start_date: date(2024, 2, 11),
                estimated_duration: 20,
                completion_percentage: 65,
                notes: Some("On schedule, hydraulic systems being installed".to_string()),
                ..stage(2, 1, "Wing Integration", StageStatus::InProgress)
            },
        ),
        Entry::new(
            RecordId::new(3),
            ProductionStage {
                estimated_duration: 15,
                ..stage(3, 1, "Engine Installation", StageStatus::NotStarted)
            },
        ),
        Entry::new(
            RecordId::new(4),
            ProductionStage {
                start_date: date(2024, 2, 20),
                estimated_duration: 30,
                completion_percentage: 80,
                notes: Some("Final testing of flight control systems".to_string()),
                ..stage(4, 2, "Avionics Integration", StageStatus::InProgress)
            },
        ),
        Entry::new(
            RecordId::new(5),
            ProductionStage {
                start_date: date(2024, 2, 15),
                estimated_duration: 25,
                actual_duration: Some(30),
                completion_percentage: 45,
                notes: Some("Delayed due to supplier issues with targeting systems".to_string()),
                ..stage(5, 2, "Weapons Systems", StageStatus::Delayed)
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
    fn test_search_uses_looked_up_model() {
        let store = RecordStore::seeded(seed());
        let rows = Query::<StageFilter>::new()
            .search("f-35")
            .apply(store.list(), &lookup());
        let names: Vec<&str> = rows.iter().map(|e| e.record.stage_name.as_str()).collect();
        assert_eq!(names, vec!["Avionics Integration", "Weapons Systems"]);
    }

    #[test]
    fn test_search_without_aircraft_still_matches_own_fields() {
        let store = RecordStore::seeded(seed());
        let rows = Query::<StageFilter>::new()
            .search("wing")
            .apply(store.list(), &Lookup::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, RecordId::new(2));
    }

    #[test]
    fn test_filter_by_aircraft_and_status() {
        let store = RecordStore::seeded(seed());
        let rows = Query::new()
            .filter(StageFilter {
                status: Choice::Only(StageStatus::InProgress),
                aircraft: Some(RecordId::new(1)),
            })
            .apply(store.list(), &lookup());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.stage_name, "Wing Integration");
    }

    #[test]
    fn test_stage_number_falls_back_to_one() {
        let mut stage = ProductionStage::blank();
        stage.set_field("stage_number", "first").unwrap();
        assert_eq!(stage.stage_number, 1);
        stage.set_field("completion_percentage", "most").unwrap();
        assert_eq!(stage.completion_percentage, 0);
        stage.set_field("actual_duration", "").unwrap();
        assert_eq!(stage.actual_duration, None);
        stage.set_field("actual_duration", "12").unwrap();
        assert_eq!(stage.actual_duration, Some(12));
    }

    #[test]
    fn test_aircraft_reference_must_be_an_id() {
        let mut stage = ProductionStage::blank();
        stage.set_field("aircraft_id", "#2").unwrap();
        assert_eq!(stage.aircraft_id, RecordId::new(2));
        assert!(matches!(
            stage.set_field("aircraft_id", "A320neo"),
            Err(FieldError::InvalidReference { .. })
        ));
    }

    #[test]
    fn test_summary() {
        let summary = ProductionStage::summarize(&seed(), &lookup());
        assert_eq!(summary.get("Total Stages"), Some("5"));
        assert_eq!(summary.get("In Progress"), Some("2"));
        assert_eq!(summary.get("Completed"), Some("1"));
        assert_eq!(summary.get("Delayed"), Some("1"));
        // (100 + 65 + 0 + 80 + 45) / 5 = 58
        assert_eq!(summary.get("Avg Completion"), Some("58%"));

        let empty = ProductionStage::summarize(&[], &lookup());
        assert_eq!(empty.get("Avg Completion"), Some("0%"));
    }
}
