//! Role-based access to dashboard sections

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

crate::choice_enum! {
    /// User role, shared by login identities and employee records
    pub enum Role ("role") {
        Administrator => "Administrator",
        Engineer => "Engineer",
        Operator => "Operator",
    }
}

crate::choice_enum! {
    /// A page of the dashboard, in navigation order
    pub enum Section ("section") {
        Aircraft => "Aircraft",
        Parts => "Parts",
        Production => "Production",
        Employees => "Employees",
        Tests => "Tests",
    }
}

/// What a role may do within a visible section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::ReadOnly => write!(f, "read-only"),
            Access::ReadWrite => write!(f, "read-write"),
        }
    }
}

/// The operation being attempted on a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Mutate,
}

/// Refusal to view or modify a section
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum PolicyError {
    #[error("{role} cannot view {section}")]
    #[diagnostic(
        code(aerocode::policy::hidden),
        help("run `aerocode nav` to list the sections available to your role")
    )]
    Hidden { role: Role, section: Section },

    #[error("{role} has read-only access to {section}")]
    #[diagnostic(
        code(aerocode::policy::read_only),
        help("log in as an Administrator or Engineer to make changes")
    )]
    ReadOnly { role: Role, section: Section },
}

/// Maps a role to the sections it may see and modify
pub trait AccessPolicy {
    /// Access granted to `role` in `section`, or `None` when hidden
    fn access(&self, role: Role, section: Section) -> Option<Access>;

    /// Sections visible to `role`, in navigation order
    fn visible_sections(&self, role: Role) -> Vec<(Section, Access)> {
        Section::ALL
            .iter()
            .filter_map(|s| self.access(role, *s).map(|a| (*s, a)))
            .collect()
    }

    fn can_view(&self, role: Role, section: Section) -> bool {
        self.access(role, section).is_some()
    }

    fn can_mutate(&self, role: Role, section: Section) -> bool {
        self.access(role, section) == Some(Access::ReadWrite)
    }

    /// Check an action, explaining a refusal
    fn authorize(&self, role: Role, section: Section, action: Action) -> Result<(), PolicyError> {
        match (self.access(role, section), action) {
            (None, _) => Err(PolicyError::Hidden { role, section }),
            (Some(Access::ReadOnly), Action::Mutate) => {
                Err(PolicyError::ReadOnly { role, section })
            }
            _ => Ok(()),
        }
    }
}

/// The fixed access table used by the dashboard
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPolicy;

impl AccessPolicy for StaticPolicy {
    fn access(&self, role: Role, section: Section) -> Option<Access> {
        use Access::*;
        use Section::*;

        match role {
            Role::Administrator => Some(ReadWrite),
            Role::Engineer => match section {
                Employees => None,
                Aircraft | Parts | Production | Tests => Some(ReadWrite),
            },
            Role::Operator => match section {
                Aircraft | Parts => Some(ReadOnly),
                Production | Employees | Tests => None,
            },
        }
    }
}
