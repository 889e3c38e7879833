//! The dashboard: one record store per section

use crate::core::entity::Record;
use crate::core::identity::RecordId;
use crate::core::query::Lookup;
use crate::core::store::RecordStore;
use crate::entities::{aircraft, employee, part, stage, test};
use crate::entities::{Aircraft, Employee, Part, ProductionStage, Test};

crate::choice_enum! {
    /// What happens to stages and tests when their aircraft is deleted
    pub enum DeletePolicy ("delete policy") {
        /// Keep them; their aircraft shows as missing
        Orphan => "orphan",
        /// Remove them along with the aircraft
        Cascade => "cascade",
    }
}

impl Default for DeletePolicy {
    fn default() -> Self {
        DeletePolicy::Orphan
    }
}

/// Records removed alongside a deleted record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    pub kind: &'static str,
    pub count: usize,
}

/// Outcome of a delete that found its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub id: RecordId,
    pub title: String,
    pub cascaded: Vec<Cascade>,
}

/// All record stores of a running dashboard
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub aircraft: RecordStore<Aircraft>,
    pub parts: RecordStore<Part>,
    pub employees: RecordStore<Employee>,
    pub stages: RecordStore<ProductionStage>,
    pub tests: RecordStore<Test>,
    pub delete_policy: DeletePolicy,
}

impl Dashboard {
    /// A dashboard with no records
    pub fn empty() -> Self {
        Self::default()
    }

    /// A dashboard holding the demo records
    pub fn seeded() -> Self {
        Self {
            aircraft: RecordStore::seeded(aircraft::seed()),
            parts: RecordStore::seeded(part::seed()),
            employees: RecordStore::seeded(employee::seed()),
            stages: RecordStore::seeded(stage::seed()),
            tests: RecordStore::seeded(test::seed()),
            delete_policy: DeletePolicy::default(),
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// Current aircraft id -> model index
    pub fn lookup(&self) -> Lookup {
        Lookup::from_aircraft(&self.aircraft)
    }
}

/// Access to the store of one record type
pub trait Holds<T: Record> {
    fn records(&self) -> &RecordStore<T>;

    fn records_mut(&mut self) -> &mut RecordStore<T>;

    /// Delete a record, applying any referential policy
    fn remove(&mut self, id: RecordId) -> Option<Deletion> {
        let entry = self.records_mut().delete(id)?;
        Some(Deletion {
            id,
            title: entry.record.title().to_string(),
            cascaded: Vec::new(),
        })
    }
}

impl Holds<Aircraft> for Dashboard {
    fn records(&self) -> &RecordStore<Aircraft> {
        &self.aircraft
    }

    fn records_mut(&mut self) -> &mut RecordStore<Aircraft> {
        &mut self.aircraft
    }

    fn remove(&mut self, id: RecordId) -> Option<Deletion> {
        let entry = self.aircraft.delete(id)?;
        let mut cascaded = Vec::new();

        if self.delete_policy == DeletePolicy::Cascade {
            let stages = self.stages.delete_where(|e| e.record.aircraft_id == id).len();
            let tests = self.tests.delete_where(|e| e.record.aircraft_id == id).len();
            tracing::info!(%id, stages, tests, "cascaded aircraft delete");
            cascaded.push(Cascade {
                kind: ProductionStage::KIND,
                count: stages,
            });
            cascaded.push(Cascade {
                kind: Test::KIND,
                count: tests,
            });
        }

        Some(Deletion {
            id,
            title: entry.record.model,
            cascaded,
        })
    }
}

macro_rules! holds {
    ($ty:ty, $field:ident) => {
        impl Holds<$ty> for Dashboard {
            fn records(&self) -> &RecordStore<$ty> {
                &self.$field
            }

            fn records_mut(&mut self) -> &mut RecordStore<$ty> {
                &mut self.$field
            }
        }
    };
}

holds!(Part, parts);
holds!(Employee, employees);
holds!(ProductionStage, stages);
holds!(Test, tests);
