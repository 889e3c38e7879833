//! Employee entity - staff directory

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{
    parse_date, parse_enum, Choice, FieldError, FieldKind, FieldSpec, Record, Summary,
};
use crate::core::identity::RecordId;
use crate::core::policy::{Role, Section};
use crate::core::query::Lookup;
use crate::core::store::Entry;

crate::choice_enum! {
    pub enum Department ("department") {
        Engineering => "Engineering",
        Production => "Production",
        QualityAssurance => "Quality Assurance",
        Administration => "Administration",
        Logistics => "Logistics",
    }
}

crate::choice_enum! {
    /// Employment status
    pub enum EmployeeStatus ("employee status") {
        Active => "Active",
        OnLeave => "On Leave",
        Inactive => "Inactive",
    }
}

/// A member of staff
///
/// Stages, tests and aircraft refer to employees by name only, so deleting
/// an employee never touches those records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub department: Department,
    pub hire_date: NaiveDate,
    pub address: String,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeFilter {
    pub department: Choice<Department>,
    pub role: Choice<Role>,
    pub status: Choice<EmployeeStatus>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Full name", FieldKind::Text),
    FieldSpec::required("email", "Email", FieldKind::Text),
    FieldSpec::required("phone", "Phone", FieldKind::Text),
    FieldSpec::required("role", "Role", FieldKind::Choice(Role::LABELS)),
    FieldSpec::required("department", "Department", FieldKind::Choice(Department::LABELS)),
    FieldSpec::required("hire_date", "Hire date", FieldKind::Date),
    FieldSpec::required("address", "Address", FieldKind::Text),
    FieldSpec::required("status", "Status", FieldKind::Choice(EmployeeStatus::LABELS)),
];

impl Record for Employee {
    const KIND: &'static str = "employee";
    const SECTION: Section = Section::Employees;
    type Filter = EmployeeFilter;

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn blank() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: Role::Operator,
            department: Department::Production,
            hire_date: chrono::Local::now().date_naive(),
            address: String::new(),
            status: EmployeeStatus::Active,
        }
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn search_fields<'a>(&'a self, _lookup: &'a Lookup) -> Vec<&'a str> {
        vec![self.name.as_str(), self.email.as_str(), self.phone.as_str()]
    }

    fn matches(&self, filter: &EmployeeFilter) -> bool {
        filter.department.admits(&self.department)
            && filter.role.admits(&self.role)
            && filter.status.admits(&self.status)
    }

    fn get_field(&self, name: &str) -> Option<String> {
        let value = match name {
            "name" => self.name.clone(),
            "email" => self.email.clone(),
            "phone" => self.phone.clone(),
            "role" => self.role.to_string(),
            "department" => self.department.to_string(),
            "hire_date" => self.hire_date.to_string(),
            "address" => self.address.clone(),
            "status" => self.status.to_string(),
            _ => return None,
        };
        Some(value)
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "name" => self.name = value.to_string(),
            "email" => self.email = value.to_string(),
            "phone" => self.phone = value.to_string(),
            "role" => self.role = parse_enum(name, value)?,
            "department" => self.department = parse_enum(name, value)?,
            "hire_date" => self.hire_date = parse_date(name, value)?,
            "address" => self.address = value.to_string(),
            "status" => self.status = parse_enum(name, value)?,
            _ => return Err(FieldError::unknown::<Self>(name)),
        }
        Ok(())
    }

    fn summarize(entries: &[Entry<Self>], _lookup: &Lookup) -> Summary {
        let active = entries
            .iter()
            .filter(|e| e.record.status == EmployeeStatus::Active)
            .count();
        let with_role = |role: Role| entries.iter().filter(|e| e.record.role == role).count();

        Summary::new("Employees")
            .metric("Total Employees", entries.len())
            .metric("Active", active)
            .metric("Engineers", with_role(Role::Engineer))
            .metric("Operators", with_role(Role::Operator))
    }
}

struct Seed {
    name: &'static str,
    handle: &'static str,
    phone: &'static str,
    role: Role,
    department: Department,
    hired: (i32, u32, u32),
    address: &'static str,
    status: EmployeeStatus,
}

const SEED: &[Seed] = &[
    Seed {
        name: "Admin User",
        handle: "admin",
        phone: "+1-555-0100",
        role: Role::Administrator,
        department: Department::Administration,
        hired: (2020, 1, 15),
        address: "123 Admin St, HQ",
        status: EmployeeStatus::Active,
    },
    Seed {
        name: "John Engineer",
        handle: "john.engineer",
        phone: "+1-555-0101",
        role: Role::Engineer,
        department: Department::Engineering,
        hired: (2021, 3, 20),
        address: "456 Tech Ave",
        status: EmployeeStatus::Active,
    },
    Seed {
        name: "Jane Operator",
        handle: "jane.operator",
        phone: "+1-555-0102",
        role: Role::Operator,
        department: Department::Production,
        hired: (2022, 6, 10),
        address: "789 Factory Rd",
        status: EmployeeStatus::Active,
    },
    Seed {
        name: "Mike Smith",
        handle: "mike.smith",
        phone: "+1-555-0103",
        role: Role::Engineer,
        department: Department::QualityAssurance,
        hired: (2021, 9, 5),
        address: "321 Quality Ln",
        status: EmployeeStatus::Active,
    },
    Seed {
        name: "Sarah Johnson",
        handle: "sarah.johnson",
        phone: "+1-555-0104",
        role: Role::Operator,
        department: Department::Logistics,
        hired: (2023, 1, 12),
        address: "654 Supply St",
        status: EmployeeStatus::OnLeave,
    },
];

/// Staff on the books when the dashboard starts
pub fn seed() -> Vec<Entry<Employee>> {
    SEED.iter()
        .zip(1u64..)
        .map(|(s, id)| {
            let (y, m, d) = s.hired;
            Entry::new(
                RecordId::new(id),
                Employee {
                    name: s.name.to_string(),
                    email: format!("{}@aerocode.com", s.handle),
                    phone: s.phone.to_string(),
                    role: s.role,
                    department: s.department,
                    hire_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
                    address: s.address.to_string(),
                    status: s.status,
                },
            )
        })
        .collect()
}
