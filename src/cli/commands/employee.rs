//! `aerocode employee` command - Employee directory

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::records::{
    self, DeleteArgs, EditArgs, Listing, NewArgs, QueryArgs, ShowArgs,
};
use crate::cli::context::Context;
use crate::cli::table::{CellValue, Column};
use crate::cli::GlobalOpts;
use crate::core::entity::{parse_choice, Choice};
use crate::core::{Entry, Lookup, Role};
use crate::entities::employee::{Department, Employee, EmployeeFilter, EmployeeStatus};

#[derive(Subcommand, Debug)]
pub enum EmployeeCommands {
    /// List employees with filtering
    List(ListArgs),

    /// Add an employee
    New(NewArgs),

    /// Show an employee's details
    Show(ShowArgs),

    /// Change fields of an employee
    Edit(EditArgs),

    /// Delete an employee (stage assignments keep the name)
    Delete(DeleteArgs),

    /// Headcount figures
    Stats,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by department
    #[arg(long, short = 'd', default_value = "all", value_parser = parse_choice::<Department>)]
    pub department: Choice<Department>,

    /// Filter by role (administrator, engineer, operator, all)
    #[arg(long, default_value = "all", value_parser = parse_choice::<Role>)]
    pub role: Choice<Role>,

    /// Filter by status (active, on-leave, inactive, all)
    #[arg(long, short = 's', default_value = "all", value_parser = parse_choice::<EmployeeStatus>)]
    pub status: Choice<EmployeeStatus>,

    #[command(flatten)]
    pub query: QueryArgs,
}

const COLUMNS: &[Column] = &[
    Column::new("ID", 6),
    Column::new("NAME", 20),
    Column::new("EMAIL", 28),
    Column::new("PHONE", 16),
    Column::new("ROLE", 14),
    Column::new("DEPARTMENT", 18),
    Column::new("STATUS", 10),
];

impl Listing for Employee {
    const PLURAL: &'static str = "employees";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn row(entry: &Entry<Self>, _lookup: &Lookup) -> Vec<CellValue> {
        let e = &entry.record;
        vec![
            CellValue::Id(entry.id),
            CellValue::text(&e.name),
            CellValue::text(&e.email),
            CellValue::text(&e.phone),
            CellValue::text(e.role.label()),
            CellValue::text(e.department.label()),
            CellValue::status(e.status),
        ]
    }
}

/// Run an employee subcommand
pub fn run(cmd: EmployeeCommands, ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    match cmd {
        EmployeeCommands::List(args) => {
            let filter = EmployeeFilter {
                department: args.department,
                role: args.role,
                status: args.status,
            };
            records::list::<Employee>(ctx, global, filter, args.query)
        }
        EmployeeCommands::New(args) => records::create::<Employee>(ctx, global, args),
        EmployeeCommands::Show(args) => records::show::<Employee>(ctx, global, args),
        EmployeeCommands::Edit(args) => records::edit::<Employee>(ctx, global, args),
        EmployeeCommands::Delete(args) => records::delete::<Employee>(ctx, global, args),
        EmployeeCommands::Stats => records::stats::<Employee>(ctx, global),
    }
}
