//! `aerocode part` command - Parts inventory

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
use crate::entities::part::{Part, PartCategory, PartFilter};

#[derive(Subcommand, Debug)]
pub enum PartCommands {
    /// List parts with filtering
    List(ListArgs),

    /// Add a part to the inventory
    New(NewArgs),

    /// Show a part's details
    Show(ShowArgs),

    /// Change fields of a part (e.g. restock with `quantity=40`)
    Edit(EditArgs),

    /// Delete a part
    Delete(DeleteArgs),

    /// Inventory figures and low-stock alerts
    Stats,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by category (engine, avionics, structural, hydraulic, electrical, interior, all)
    #[arg(long, short = 'c', default_value = "all", value_parser = parse_choice::<PartCategory>)]
    pub category: Choice<PartCategory>,

    /// Only parts below their minimum quantity
    #[arg(long)]
    pub low_stock: bool,

    #[command(flatten)]
    pub query: QueryArgs,
}

const COLUMNS: &[Column] = &[
    Column::new("ID", 6),
    Column::new("NAME", 24),
    Column::new("PART NO", 12),
    Column::new("CATEGORY", 11),
    Column::new("SUPPLIER", 20),
    Column::new("QTY", 6),
    Column::new("MIN", 6),
    Column::new("PRICE", 13),
    Column::new("LOCATION", 14),
    Column::new("STOCK", 5),
];

impl Listing for Part {
    const PLURAL: &'static str = "parts";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn row(entry: &Entry<Self>, _lookup: &Lookup) -> Vec<CellValue> {
        let p = &entry.record;
        let stock = if p.is_low_stock() {
            CellValue::status("Low")
        } else {
            CellValue::status("OK")
        };
        vec![
            CellValue::Id(entry.id),
            CellValue::text(&p.name),
            CellValue::text(&p.part_number),
            CellValue::text(p.category.label()),
            CellValue::text(&p.supplier),
            CellValue::Number(p.quantity.into()),
            CellValue::Number(p.min_quantity.into()),
            CellValue::Money(p.unit_price),
            CellValue::text(&p.location),
            stock,
        ]
    }
}

/// Run a part subcommand
pub fn run(cmd: PartCommands, ctx: &mut Context, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PartCommands::List(args) => {
            let filter = PartFilter {
                category: args.category,
                low_stock: args.low_stock,
            };
            records::list::<Part>(ctx, global, filter, args.query)
        }
        PartCommands::New(args) => records::create::<Part>(ctx, global, args),
        PartCommands::Show(args) => records::show::<Part>(ctx, global, args),
        PartCommands::Edit(args) => records::edit::<Part>(ctx, global, args),
        PartCommands::Delete(args) => records::delete::<Part>(ctx, global, args),
        PartCommands::Stats => records::stats::<Part>(ctx, global),
    }
}
