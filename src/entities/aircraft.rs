//! Aircraft entity - airframes moving through production

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{
    display_opt, optional_text, parse_date, parse_enum, parse_optional_date, Choice, FieldError,
    FieldKind, FieldSpec, Record, Summary,
};
use crate::core::identity::RecordId;
use crate::core::policy::Section;
use crate::core::query::Lookup;
use crate::core::store::Entry;

crate::choice_enum! {
    /// Market the airframe is built for
    pub enum AircraftCategory ("aircraft category") {
        Commercial => "Commercial",
        Military => "Military",
        Private => "Private",
    }
}

crate::choice_enum! {
    /// Production lifecycle of an airframe
    pub enum AircraftStatus ("aircraft status") {
        Planning => "Planning",
        InProduction => "In Production",
        Testing => "Testing",
        Completed => "Completed",
    }
}

/// An airframe in the production programme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub model: String,
    pub serial_number: String,
    pub category: AircraftCategory,
    pub status: AircraftStatus,
    pub start_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,

    /// Engineer name as free text, not an employee id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_engineer: Option<String>,
}

/// Categorical filters for the aircraft list
#[derive(Debug, Clone, Copy, Default)]
pub struct AircraftFilter {
    pub category: Choice<AircraftCategory>,
    pub status: Choice<AircraftStatus>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("model", "Model", FieldKind::Text),
    FieldSpec::required("serial_number", "Serial number", FieldKind::Text),
    FieldSpec::required("category", "Type", FieldKind::Choice(AircraftCategory::LABELS)),
    FieldSpec::required("status", "Status", FieldKind::Choice(AircraftStatus::LABELS)),
    FieldSpec::required("start_date", "Start date", FieldKind::Date),
    FieldSpec::optional("completion_date", "Completion date", FieldKind::Date),
    FieldSpec::optional("assigned_engineer", "Assigned engineer", FieldKind::Text),
];

impl Record for Aircraft {
    const KIND: &'static str = "aircraft";
    const SECTION: Section = Section::Aircraft;
    type Filter = AircraftFilter;

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn blank() -> Self {
        Self {
            model: String::new(),
            serial_number: String::new(),
            category: AircraftCategory::Commercial,
            status: AircraftStatus::Planning,
            start_date: chrono::Local::now().date_naive(),
            completion_date: None,
            assigned_engineer: None,
        }
    }

    fn title(&self) -> &str {
        &self.model
    }

    fn search_fields<'a>(&'a self, _lookup: &'a Lookup) -> Vec<&'a str> {
        vec![self.model.as_str(), self.serial_number.as_str()]
    }

    fn matches(&self, filter: &AircraftFilter) -> bool {
        filter.category.admits(&self.category) && filter.status.admits(&self.status)
    }

    fn get_field(&self, name: &str) -> Option<String> {
        let value = match name {
            "model" => self.model.clone(),
            "serial_number" => self.serial_number.clone(),
            "category" => self.category.to_string(),
            "status" => self.status.to_string(),
            "start_date" => self.start_date.to_string(),
            "completion_date" => display_opt(&self.completion_date),
            "assigned_engineer" => display_opt(&self.assigned_engineer),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "model" => self.model = value.to_string(),
            "serial_number" => self.serial_number = value.to_string(),
            "category" => self.category = parse_enum(name, value)?,
            "status" => self.status = parse_enum(name, value)?,
            "start_date" => self.start_date = parse_date(name, value)?,
            "completion_date" => self.completion_date = parse_optional_date(name, value)?,
            "assigned_engineer" => self.assigned_engineer = optional_text(value),
            _ => return Err(FieldError::unknown::<Self>(name)),
        }
        Ok(())
    }

    fn summarize(entries: &[Entry<Self>], _lookup: &Lookup) -> Summary {
        let count = |status: AircraftStatus| {
            entries
                .iter()
                .filter(|e| e.record.status == status)
                .count()
        };

        Summary::new("Aircraft")
            .metric("Total Aircraft", entries.len())
            .metric("In Production", count(AircraftStatus::InProduction))
            .metric("Testing", count(AircraftStatus::Testing))
            .metric("Completed", count(AircraftStatus::Completed))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Aircraft present when the dashboard starts
pub fn seed() -> Vec<Entry<Aircraft>> {
    vec![
        Entry::new(
            RecordId::new(1),
            Aircraft {
                model: "A320neo".to_string(),
                serial_number: "AC-2024-001".to_string(),
                category: AircraftCategory::Commercial,
                status: AircraftStatus::InProduction,
                start_date: date(2024, 1, 15),
                completion_date: None,
                assigned_engineer: Some("John Engineer".to_string()),
            },
        ),
        Entry::new(
            RecordId::new(2),
            Aircraft {
                model: "F-35 Lightning II".to_string(),
                serial_number: "AC-2024-002".to_string(),
                category: AircraftCategory::Military,
                status: AircraftStatus::Testing,
                start_date: date(2023, 11, 20),
                completion_date: None,
                assigned_engineer: Some("John Engineer".to_string()),
            },
        ),
        Entry::new(
            RecordId::new(3),
            Aircraft {
                model: "Gulfstream G650".to_string(),
                serial_number: "AC-2024-003".to_string(),
                category: AircraftCategory::Private,
                status: AircraftStatus::Planning,
                start_date: date(2024, 2, 1),
                completion_date: None,
                assigned_engineer: None,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_matches_programme() {
        let seed = seed();
        assert_eq!(seed.len(), 3);
        assert_eq!(seed[2].record.serial_number, "AC-2024-003");
        assert_eq!(seed[0].record.start_date.to_string(), "2024-01-15");
    }

    #[test]
    fn test_set_and_get_fields() {
        let mut aircraft = Aircraft::blank();
        aircraft.set_field("status", "in-production").unwrap();
        aircraft.set_field("completion_date", "2025-06-30").unwrap();
        aircraft.set_field("assigned_engineer", "").unwrap();

        assert_eq!(aircraft.status, AircraftStatus::InProduction);
        assert_eq!(
            aircraft.get_field("completion_date").as_deref(),
            Some("2025-06-30")
        );
        assert_eq!(aircraft.assigned_engineer, None);
        assert_eq!(aircraft.get_field("wingspan"), None);
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        let mut aircraft = Aircraft::blank();
        let err = aircraft.set_field("status", "scrapped").unwrap_err();
        assert!(err.to_string().contains("Invalid aircraft status"));
    }

    #[test]
    fn test_serialization_uses_labels() {
        let json = serde_json::to_string(&seed()[0].record).unwrap();
        assert!(json.contains("\"status\":\"In Production\""));
        assert!(json.contains("\"start_date\":\"2024-01-15\""));
        assert!(!json.contains("completion_date"));
    }

    #[test]
    fn test_summary_counts() {
        let summary = Aircraft::summarize(&seed(), &Lookup::new());
        assert_eq!(summary.get("Total Aircraft"), Some("3"));
        assert_eq!(summary.get("In Production"), Some("1"));
        assert_eq!(summary.get("Testing"), Some("1"));
        assert_eq!(summary.get("Completed"), Some("0"));
    }
}
