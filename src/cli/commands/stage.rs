//! `aerocode stage` command - Production stage tracking

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::records::{
    self, aircraft_cell, DeleteArgs, EditArgs, Listing, NewArgs, QueryArgs, ShowArgs,
};
use crate::cli::context::Context;
use crate::cli::table::{CellValue, Column};
use crate::cli::GlobalOpts;
use crate::core::entity::{parse_choice, Choice};
use crate::core::{Entry, Lookup, RecordId};
use crate::entities::stage::{ProductionStage, StageFilter, StageStatus};

#[derive(Subcommand, Debug)]
pub enum StageCommands {
    /// List production stages with filtering
    List(ListArgs),

    /// Plan a new production stage
    New(NewArgs),

    /// Show a stage's details
    Show(ShowArgs),

    /// Change fields of a stage (e.g. `completion_percentage=70`)
    Edit(EditArgs),

    /// Delete a stage
    Delete(DeleteArgs),

    /// Production progress figures
    Stats,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status (not-started, in-progress, completed, delayed, all)
    #[arg(long, short = 's', default_value = "all", value_parser = parse_choice::<StageStatus>)]
    pub status: Choice<StageStatus>,

    /// Only stages of this aircraft
    #[arg(long, short = 'a', value_name = "ID")]
    pub aircraft: Option<RecordId>,

    #[command(flatten)]
    pub query: QueryArgs,
}

const COLUMNS: &[Column] = &[
    Column::new("ID", 6),
    Column::new("AIRCRAFT", 20),
    Column::new("#", 3),
    Column::new("STAGE", 24),
    Column::new("STATUS", 12),
    Column::new("ASSIGNED", 16),
    Column::new("DONE", 6),
    Column::new("EST", 5),
];

impl Listing for ProductionStage {
    const PLURAL: &'static str = "stages";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn row(entry: &Entry<Self>, lookup: &Lookup) -> Vec<CellValue> {
        let s = &entry.record;
        vec![
            CellValue::Id(entry.id),
            aircraft_cell(s.aircraft_id, lookup),
            CellValue::Number(s.stage_number.into()),
            CellValue::text(&s.stage_name),
            CellValue::status(s.status),
            CellValue::text(&s.assigned_to),
            CellValue::Percent(s.completion_percentage),
            CellValue::Number(s.estimated_duration.into()),
        ]
    }
}

/// Run a stage subcommand
pub fn run(cmd: StageCommands, ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    match cmd {
        StageCommands::List(args) => {
            let filter = StageFilter {
                status: args.status,
                aircraft: args.aircraft,
            };
            records::list::<ProductionStage>(ctx, global, filter, args.query)
        }
        StageCommands::New(args) => records::create::<ProductionStage>(ctx, global, args),
        StageCommands::Show(args) => records::show::<ProductionStage>(ctx, global, args),
        StageCommands::Edit(args) => records::edit::<ProductionStage>(ctx, global, args),
        StageCommands::Delete(args) => records::delete::<ProductionStage>(ctx, global, args),
        StageCommands::Stats => records::stats::<ProductionStage>(ctx, global),
    }
}
