//! Record trait - common interface for all dashboard record types

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::policy::Section;
use crate::core::query::Lookup;
use crate::core::store::Entry;

/// Define a closed set of labelled choices (status, category, role, ...)
///
/// Each variant serializes as its label and parses from any spelling that
/// matches the label once case, spaces, dashes and underscores are ignored.
#[macro_export]
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($what:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Display labels, in declaration order
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::core::entity::normalize_choice(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::core::entity::normalize_choice(v.label()) == wanted)
                    .ok_or_else(|| {
                        format!(
                            "Invalid {}: {}. Use one of: {}",
                            $what,
                            s,
                            $name::LABELS.join(", ")
                        )
                    })
            }
        }
    };
}

/// Canonical form used to compare choice spellings
pub fn normalize_choice(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A categorical filter selection; `All` admits every value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    /// Whether `value` passes this filter
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Choice<T>
where
    T: FromStr<Err = String>,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

/// clap value parser for [`Choice`] arguments
pub fn parse_choice<T>(s: &str) -> Result<Choice<T>, String>
where
    T: FromStr<Err = String>,
{
    s.parse()
}

/// How a form field's text input is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Whole number; unparseable input becomes the fallback
    Integer { fallback: u32 },
    /// Decimal number; unparseable input becomes zero
    Decimal,
    /// ISO date (YYYY-MM-DD)
    Date,
    /// One of a fixed set of labels
    Choice(&'static [&'static str]),
    /// Id of an aircraft record
    AircraftRef,
}

/// Description of one editable field of a record
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Empty input clears the field instead of being coerced
    pub optional: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            optional: false,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            optional: true,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Integer { .. } | FieldKind::Decimal | FieldKind::AircraftRef
        )
    }
}

/// Errors raised while assigning a field from text
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("{kind} has no field named '{field}' (fields: {known})")]
    UnknownField {
        kind: &'static str,
        field: String,
        known: String,
    },

    #[error("{field}: {message}")]
    InvalidChoice { field: String, message: String },

    #[error("{field}: '{value}' is not a date (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },

    #[error("{field}: '{value}' is not an aircraft id")]
    InvalidReference { field: String, value: String },

    #[error("expected FIELD=VALUE, got '{0}'")]
    MalformedAssignment(String),
}

impl FieldError {
    pub fn unknown<R: Record>(field: &str) -> Self {
        let known: Vec<&str> = R::fields().iter().map(|f| f.name).collect();
        FieldError::UnknownField {
            kind: R::KIND,
            field: field.to_string(),
            known: known.join(", "),
        }
    }
}

/// A `field=value` pair as typed on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| FieldError::MalformedAssignment(s.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(FieldError::MalformedAssignment(s.to_string()));
        }
        Ok(Self {
            field: field.replace('-', "_"),
            value: value.to_string(),
        })
    }
}

/// Longest leading numeric run of `s` after leading whitespace
///
/// Integers stop at the first non-digit; decimals also take one fraction
/// and an exponent when digits follow it. Empty when no digit leads.
fn numeric_prefix(s: &str, decimal: bool) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut seen_digit = int_end > end;
    end = int_end;

    if decimal {
        if bytes.get(end) == Some(&b'.') {
            let frac_end = digits_from(end + 1);
            if seen_digit || frac_end > end + 1 {
                seen_digit = true;
                end = frac_end;
            }
        }
        if seen_digit && matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_end = digits_from(exp);
            if exp_end > exp {
                end = exp_end;
            }
        }
    }

    if seen_digit {
        &s[..end]
    } else {
        ""
    }
}

/// Parse the leading whole number, falling back when there is none
///
/// `12.7` gives 12 and `99abc` gives 99. Negative input clamps to zero.
pub fn coerce_int(field: &str, value: &str, fallback: u32) -> u32 {
    match numeric_prefix(value, false).parse::<i64>() {
        Ok(n) => n.clamp(0, i64::from(u32::MAX)) as u32,
        Err(_) => {
            tracing::debug!(field, value, fallback, "coerced unparseable integer");
            fallback
        }
    }
}

/// Parse the leading decimal number, falling back to zero
pub fn coerce_decimal(field: &str, value: &str) -> f64 {
    match numeric_prefix(value, true).parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => {
            tracing::debug!(field, value, "coerced unparseable decimal to zero");
            0.0
        }
    }
}

/// Empty input means "not set"
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FieldError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

pub fn parse_optional_date(field: &str, value: &str) -> Result<Option<NaiveDate>, FieldError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(field, value).map(Some)
    }
}

pub fn parse_enum<T>(field: &str, value: &str) -> Result<T, FieldError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|message| FieldError::InvalidChoice {
        field: field.to_string(),
        message,
    })
}

pub fn parse_reference(field: &str, value: &str) -> Result<crate::core::RecordId, FieldError> {
    value.parse().map_err(|_| FieldError::InvalidReference {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Format an optional value as form text, empty when unset
pub fn display_opt<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// One labelled figure in a section summary
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

/// A titled list appended to a summary (low-stock alerts, recent results)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryList {
    pub title: String,
    pub items: Vec<String>,
}

/// Headline figures for one dashboard section
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub title: String,
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lists: Vec<SummaryList>,
}

impl Summary {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            metrics: Vec::new(),
            lists: Vec::new(),
        }
    }

    pub fn metric(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.metrics.push(Metric {
            label: label.into(),
            value: value.to_string(),
        });
        self
    }

    pub fn list(mut self, title: impl Into<String>, items: Vec<String>) -> Self {
        self.lists.push(SummaryList {
            title: title.into(),
            items,
        });
        self
    }

    /// Look up a metric value by label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.value.as_str())
    }
}

/// Common trait for all dashboard record types
pub trait Record: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    /// Singular noun used in messages ("aircraft", "part")
    const KIND: &'static str;

    /// Dashboard section this record type belongs to
    const SECTION: Section;

    /// Categorical filter selections understood by [`Record::matches`]
    type Filter: fmt::Debug + Default;

    /// Editable fields, in form order
    fn fields() -> &'static [FieldSpec];

    /// Defaults staged by the create form
    fn blank() -> Self;

    /// Human name of the record
    fn title(&self) -> &str;

    /// Values the free-text search looks at
    fn search_fields<'a>(&'a self, lookup: &'a Lookup) -> Vec<&'a str>;

    /// Whether the record passes every active filter
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Current value of a field, formatted as the form would show it
    fn get_field(&self, name: &str) -> Option<String>;

    /// Assign a field from text, coercing numbers
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError>;

    /// Headline figures for the whole collection
    fn summarize(entries: &[Entry<Self>], lookup: &Lookup) -> Summary;

    /// Spec of a field by name
    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::fields().iter().find(|f| f.name == name)
    }
}
