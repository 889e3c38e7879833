//! Part entity - stocked components with reorder thresholds

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::entity::{
    coerce_decimal, coerce_int, display_opt, optional_text, parse_enum, Choice, FieldError,
    FieldKind, FieldSpec, Record, Summary,
};
use crate::core::identity::RecordId;
use crate::core::policy::Section;
use crate::core::query::Lookup;
use crate::core::store::Entry;

crate::choice_enum! {
    /// Part category
    pub enum PartCategory ("part category") {
        Engine => "Engine",
        Avionics => "Avionics",
        Structural => "Structural",
        Hydraulic => "Hydraulic",
        Electrical => "Electrical",
        Interior => "Interior",
    }
}

/// A stocked part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub part_number: String,
    pub category: PartCategory,
    pub supplier: String,
    pub quantity: u32,
    /// Reorder threshold; stock below it is flagged, never blocked
    pub min_quantity: u32,
    pub unit_price: f64,
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Part {
    /// Stock has fallen below the reorder threshold
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_quantity
    }

    /// Value of the stock on hand
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Categorical filters for the parts list
#[derive(Debug, Clone, Copy, Default)]
pub struct PartFilter {
    pub category: Choice<PartCategory>,
    /// Only show parts below their reorder threshold
    pub low_stock: bool,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Part name", FieldKind::Text),
    FieldSpec::required("part_number", "Part number", FieldKind::Text),
    FieldSpec::required("category", "Category", FieldKind::Choice(PartCategory::LABELS)),
    FieldSpec::required("supplier", "Supplier", FieldKind::Text),
    FieldSpec::required("quantity", "Quantity", FieldKind::Integer { fallback: 0 }),
    FieldSpec::required("min_quantity", "Min quantity", FieldKind::Integer { fallback: 0 }),
    FieldSpec::required("unit_price", "Unit price ($)", FieldKind::Decimal),
    FieldSpec::required("location", "Location", FieldKind::Text),
    FieldSpec::optional("description", "Description", FieldKind::Text),
];

impl Record for Part {
    const KIND: &'static str = "part";
    const SECTION: Section = Section::Parts;
    type Filter = PartFilter;

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn blank() -> Self {
        Self {
            name: String::new(),
            part_number: String::new(),
            category: PartCategory::Engine,
            supplier: String::new(),
            quantity: 0,
            min_quantity: 0,
            unit_price: 0.0,
            location: String::new(),
            description: None,
        }
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn search_fields<'a>(&'a self, _lookup: &'a Lookup) -> Vec<&'a str> {
        vec![
            self.name.as_str(),
            self.part_number.as_str(),
            self.supplier.as_str(),
        ]
    }

    fn matches(&self, filter: &PartFilter) -> bool {
        filter.category.admits(&self.category) && (!filter.low_stock || self.is_low_stock())
    }

    fn get_field(&self, name: &str) -> Option<String> {
        let value = match name {
            "name" => self.name.clone(),
            "part_number" => self.part_number.clone(),
            "category" => self.category.to_string(),
            "supplier" => self.supplier.clone(),
            "quantity" => self.quantity.to_string(),
            "min_quantity" => self.min_quantity.to_string(),
            "unit_price" => self.unit_price.to_string(),
            "location" => self.location.clone(),
            "description" => display_opt(&self.description),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "name" => self.name = value.to_string(),
            "part_number" => self.part_number = value.to_string(),
            "category" => self.category = parse_enum(name, value)?,
            "supplier" => self.supplier = value.to_string(),
            "quantity" => self.quantity = coerce_int(name, value, 0),
            "min_quantity" => self.min_quantity = coerce_int(name, value, 0),
            "unit_price" => self.unit_price = coerce_decimal(name, value),
            "location" => self.location = value.to_string(),
            "description" => self.description = optional_text(value),
            _ => return Err(FieldError::unknown::<Self>(name)),
        }
        Ok(())
    }

    fn summarize(entries: &[Entry<Self>], _lookup: &Lookup) -> Summary {
        let low_stock: Vec<&Entry<Part>> =
            entries.iter().filter(|e| e.record.is_low_stock()).collect();
        let total_value: f64 = entries.iter().map(|e| e.record.stock_value()).sum();
        let categories: HashSet<PartCategory> = entries.iter().map(|e| e.record.category).collect();

        let alerts = low_stock
            .iter()
            .map(|e| {
                format!(
                    "{} ({}): {} in stock, minimum {}",
                    e.record.name, e.record.part_number, e.record.quantity, e.record.min_quantity
                )
            })
            .collect();

        Summary::new("Parts")
            .metric("Total Parts", entries.len())
            .metric("Low Stock", low_stock.len())
            .metric("Total Value", format_millions(total_value))
            .metric("Categories", categories.len())
            .list("Low Stock Alert", alerts)
    }
}

/// Format a dollar amount in millions, e.g. `$12.5M`
pub fn format_millions(amount: f64) -> String {
    format!("${:.1}M", amount / 1_000_000.0)
}

#[allow(clippy::too_many_arguments)]
fn part(
    id: u64,
    name: &str,
    part_number: &str,
    category: PartCategory,
    supplier: &str,
    stock: (u32, u32),
    unit_price: f64,
    location: &str,
    description: Option<&str>,
) -> Entry<Part> {
    Entry::new(
        RecordId::new(id),
        Part {
            name: name.to_string(),
            part_number: part_number.to_string(),
            category,
            supplier: supplier.to_string(),
            quantity: stock.0,
            min_quantity: stock.1,
            unit_price,
            location: location.to_string(),
            description: description.map(String::from),
        },
    )
}

/// Parts in stock when the dashboard starts
pub fn seed() -> Vec<Entry<Part>> {
    vec![
        part(
            1,
            "Turbofan Engine",
            "ENG-TF-001",
            PartCategory::Engine,
            "Pratt & Whitney",
            (8, 5),
            12_500_000.0,
            "Warehouse A-1",
            Some("High-efficiency turbofan engine for commercial aircraft"),
        ),
        part(
            2,
            "Flight Control Computer",
            "AVI-FCC-002",
            PartCategory::Avionics,
            "Honeywell Aerospace",
            (15, 10),
            450_000.0,
            "Warehouse B-3",
            Some("Primary flight control computer system"),
        ),
        part(
            3,
            "Wing Spar Assembly",
            "STR-WSA-003",
            PartCategory::Structural,
            "Spirit AeroSystems",
            (3, 5),
            2_800_000.0,
            "Warehouse A-2",
            Some("Main wing structural component"),
        ),
        part(
            4,
            "Hydraulic Pump",
            "HYD-PMP-004",
            PartCategory::Hydraulic,
            "Parker Aerospace",
            (25, 15),
            85_000.0,
            "Warehouse C-1",
            None,
        ),
        part(
            5,
            "Wiring Harness",
            "ELC-WH-005",
            PartCategory::Electrical,
            "TE Connectivity",
            (50, 30),
            12_000.0,
            "Warehouse B-1",
            None,
        ),
    ]
}
