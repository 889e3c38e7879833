//! `aerocode aircraft` command - Aircraft management

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::records::{
    self, DeleteArgs, EditArgs, Listing, NewArgs, QueryArgs, ShowArgs,
};
use crate::cli::context::Context;
use crate::cli::table::{CellValue, Column};
use crate::cli::GlobalOpts;
use crate::core::entity::{parse_choice, Choice};
use crate::core::{Entry, Lookup};
use crate::entities::aircraft::{Aircraft, AircraftCategory, AircraftFilter, AircraftStatus};

#[derive(Subcommand, Debug)]
pub enum AircraftCommands {
    /// List aircraft with filtering
    List(ListArgs),

    /// Register a new aircraft
    New(NewArgs),

    /// Show an aircraft's details
    Show(ShowArgs),

    /// Change fields of an aircraft
    Edit(EditArgs),

    /// Delete an aircraft
    Delete(DeleteArgs),

    /// Aircraft headline figures
    Stats,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by type (commercial, military, private, all)
    #[arg(long = "type", short = 't', default_value = "all", value_parser = parse_choice::<AircraftCategory>)]
    pub category: Choice<AircraftCategory>,

    /// Filter by status (planning, in-production, testing, completed, all)
    #[arg(long, short = 's', default_value = "all", value_parser = parse_choice::<AircraftStatus>)]
    pub status: Choice<AircraftStatus>,

    #[command(flatten)]
    pub query: QueryArgs,
}

const COLUMNS: &[Column] = &[
    Column::new("ID", 6),
    Column::new("MODEL", 20),
    Column::new("SERIAL", 13),
    Column::new("TYPE", 11),
    Column::new("STATUS", 14),
    Column::new("START", 11),
    Column::new("ENGINEER", 16),
];

impl Listing for Aircraft {
    const PLURAL: &'static str = "aircraft";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn row(entry: &Entry<Self>, _lookup: &Lookup) -> Vec<CellValue> {
        let a = &entry.record;
        vec![
            CellValue::Id(entry.id),
            CellValue::text(&a.model),
            CellValue::text(&a.serial_number),
            CellValue::text(a.category.label()),
            CellValue::status(a.status),
            CellValue::Date(Some(a.start_date)),
            CellValue::opt_text(a.assigned_engineer.as_deref()),
        ]
    }
}

/// Run an aircraft subcommand
pub fn run(cmd: AircraftCommands, ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AircraftCommands::List(args) => {
            let filter = AircraftFilter {
                category: args.category,
                status: args.status,
            };
            records::list::<Aircraft>(ctx, global, filter, args.query)
        }
        AircraftCommands::New(args) => records::create::<Aircraft>(ctx, global, args),
        AircraftCommands::Show(args) => records::show::<Aircraft>(ctx, global, args),
        AircraftCommands::Edit(args) => records::edit::<Aircraft>(ctx, global, args),
        AircraftCommands::Delete(args) => records::delete::<Aircraft>(ctx, global, args),
        AircraftCommands::Stats => records::stats::<Aircraft>(ctx, global),
    }
}
