//! Handlers shared by every record section: list, show, new, edit, delete, stats

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::context::Context;
use crate::cli::helpers::format_money;
use crate::cli::table::{print_rows, print_summary, CellValue, Column, Row};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    Action, Assignment, Commit, Dashboard, Entry, FieldError, FieldKind, FieldSpec, FormEditor,
    Holds, Lookup, Query, Record, RecordId,
};

/// How a record type appears in `list` output
pub trait Listing: Record {
    /// Plural noun for messages ("parts", "aircraft")
    const PLURAL: &'static str;

    fn columns() -> &'static [Column];

    /// One cell per column
    fn row(entry: &Entry<Self>, lookup: &Lookup) -> Vec<CellValue>;
}

/// Model of a referenced aircraft, or a marker when it is gone
pub fn aircraft_cell(id: RecordId, lookup: &Lookup) -> CellValue {
    match lookup.aircraft_model(id) {
        Some(model) => CellValue::text(model),
        None => CellValue::Missing(lookup.aircraft_label(id)),
    }
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Case-insensitive text search
    #[arg(long)]
    pub search: Option<String>,

    /// Sort by field name (or `id`); store order when omitted
    #[arg(long)]
    pub sort: Option<String>,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Field values, e.g. `model="Boeing 787"`
    #[arg(value_name = "FIELD=VALUE")]
    pub fields: Vec<Assignment>,

    /// Interactive mode (prompt for every field)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Record id (`3` or `#3`)
    pub id: RecordId,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Record id (`3` or `#3`)
    pub id: RecordId,

    /// Field values to change, e.g. `status=completed`
    #[arg(value_name = "FIELD=VALUE")]
    pub fields: Vec<Assignment>,

    /// Interactive mode (prompt for every field, current values as defaults)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Record id (`3` or `#3`)
    pub id: RecordId,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

fn store<T>(dashboard: &Dashboard) -> &crate::core::RecordStore<T>
where
    T: Record,
    Dashboard: Holds<T>,
{
    <Dashboard as Holds<T>>::records(dashboard)
}

pub fn list<T>(ctx: &Context, global: &GlobalOpts, filter: T::Filter, args: QueryArgs) -> Result<()>
where
    T: Listing,
    Dashboard: Holds<T>,
{
    ctx.authorize(T::SECTION, Action::View)?;

    let mut query = Query::new().filter(filter);
    if let Some(search) = args.search {
        query = query.search(search);
    }
    match args.sort {
        Some(field) => {
            let field = field.replace('-', "_");
            if field != "id" && T::field(&field).is_none() {
                return Err(miette::miette!("{}", FieldError::unknown::<T>(&field)));
            }
            query = query.sort_by(field, args.reverse);
        }
        None if args.reverse => query = query.sort_by("id", true),
        None => {}
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }

    let lookup = ctx.dashboard.lookup();
    let entries = query.apply(store::<T>(&ctx.dashboard).list(), &lookup);
    tracing::debug!(kind = T::KIND, ?query, matched = entries.len(), "listed records");

    if args.count {
        println!("{}", entries.len());
        return Ok(());
    }

    let format = match ctx.format(global) {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    if entries.is_empty() && format == OutputFormat::Tsv {
        println!("No {} found.", T::PLURAL);
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&entries).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&entries).into_diagnostic()?;
            print!("{}", yaml);
        }
        f => {
            let rows: Vec<Row> = entries
                .iter()
                .map(|e| (e.id, T::row(e, &lookup)))
                .collect();
            print_rows(f, T::columns(), &rows, T::KIND, !global.quiet)?;
        }
    }

    Ok(())
}

pub fn show<T>(ctx: &Context, global: &GlobalOpts, args: ShowArgs) -> Result<()>
where
    T: Listing,
    Dashboard: Holds<T>,
{
    ctx.authorize(T::SECTION, Action::View)?;

    let entry = store::<T>(&ctx.dashboard)
        .get(args.id)
        .ok_or_else(|| miette::miette!("No {} found with id {}", T::KIND, args.id))?;

    match ctx.format(global) {
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(entry).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(entry).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => {
            println!("{}", entry.id);
        }
        _ => print_details(entry, &ctx.dashboard.lookup()),
    }

    Ok(())
}

/// Human-readable value of one field
fn display_field(spec: &FieldSpec, value: String, lookup: &Lookup) -> String {
    if value.is_empty() {
        return or_dash(&value).to_string();
    }
    match spec.kind {
        FieldKind::AircraftRef => match value.parse::<RecordId>() {
            Ok(id) => format!("{} (#{})", lookup.aircraft_label(id), id),
            Err(_) => value,
        },
        FieldKind::Decimal => value
            .parse::<f64>()
            .map(format_money)
            .unwrap_or(value),
        _ => value,
    }
}

fn print_details<T: Record>(entry: &Entry<T>, lookup: &Lookup) {
    let width = T::fields().iter().map(|f| f.label.len()).max().unwrap_or(0) + 1;

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{:<width$} {}",
        style("ID:").bold(),
        style(entry.id).cyan(),
        width = width
    );
    for spec in T::fields() {
        let value = entry.record.get_field(spec.name).unwrap_or_default();
        println!(
            "{:<width$} {}",
            style(format!("{}:", spec.label)).bold(),
            display_field(spec, value, lookup),
            width = width
        );
    }
    println!("{}", style("─".repeat(60)).dim());
}

/// Stage `assignments` (and prompts, when interactive) into the open draft
fn fill_draft<T: Record>(
    form: &mut FormEditor<T>,
    assignments: &[Assignment],
    interactive: bool,
    lookup: &Lookup,
) -> Result<()> {
    for assignment in assignments {
        form.set_field(&assignment.field, &assignment.value)
            .map_err(|e| miette::miette!("{}", e))?;
    }

    if interactive {
        let theme = ColorfulTheme::default();
        for spec in T::fields() {
            loop {
                let current = form
                    .draft()
                    .and_then(|d| d.get_field(spec.name))
                    .unwrap_or_default();
                let value = prompt_field(&theme, spec, &current, lookup)?;
                match form.set_field(spec.name, &value) {
                    Ok(()) => break,
                    Err(e) => eprintln!("{} {}", style("✗").red(), e),
                }
            }
        }
    }

    Ok(())
}

fn prompt_field(
    theme: &ColorfulTheme,
    spec: &FieldSpec,
    current: &str,
    lookup: &Lookup,
) -> Result<String> {
    match spec.kind {
        FieldKind::Choice(labels) => {
            let default = labels.iter().position(|l| *l == current).unwrap_or(0);
            let index = Select::with_theme(theme)
                .with_prompt(spec.label)
                .items(labels)
                .default(default)
                .interact()
                .into_diagnostic()?;
            Ok(labels[index].to_string())
        }
        FieldKind::AircraftRef if !lookup.aircraft().is_empty() => {
            let aircraft = lookup.aircraft();
            let items: Vec<String> = aircraft
                .iter()
                .map(|(id, model)| format!("{} (#{})", model, id))
                .collect();
            let default = aircraft
                .iter()
                .position(|(id, _)| id.to_string() == current)
                .unwrap_or(0);
            let index = Select::with_theme(theme)
                .with_prompt(spec.label)
                .items(&items)
                .default(default)
                .interact()
                .into_diagnostic()?;
            Ok(aircraft[index].0.to_string())
        }
        _ => {
            let prompt = match spec.kind {
                FieldKind::Date => format!("{} (YYYY-MM-DD)", spec.label),
                _ => spec.label.to_string(),
            };
            Input::<String>::with_theme(theme)
                .with_prompt(prompt)
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()
        }
    }
}

pub fn create<T>(ctx: &mut Context, global: &GlobalOpts, args: NewArgs) -> Result<()>
where
    T: Listing,
    Dashboard: Holds<T>,
{
    ctx.authorize(T::SECTION, Action::Mutate)?;

    let mut form = FormEditor::<T>::new();
    form.open_create();
    fill_draft(&mut form, &args.fields, args.interactive, &ctx.dashboard.lookup())?;

    let records = <Dashboard as Holds<T>>::records_mut(&mut ctx.dashboard);
    let commit = form.commit(records).map_err(|e| miette::miette!("{}", e))?;
    let Commit::Created(id) = commit else {
        return Err(miette::miette!("unexpected outcome creating {}: {:?}", T::KIND, commit));
    };

    if global.quiet || ctx.format(global) == OutputFormat::Id {
        println!("{}", id);
        return Ok(());
    }

    let title = store::<T>(&ctx.dashboard)
        .get(id)
        .map(|e| e.record.title().to_string())
        .unwrap_or_default();
    println!(
        "{} Created {} {}",
        style("✓").green(),
        T::KIND,
        style(id).cyan()
    );
    if !title.is_empty() {
        println!("   {}", style(title).yellow());
    }
    Ok(())
}

pub fn edit<T>(ctx: &mut Context, global: &GlobalOpts, args: EditArgs) -> Result<()>
where
    T: Listing,
    Dashboard: Holds<T>,
{
    ctx.authorize(T::SECTION, Action::Mutate)?;

    if args.fields.is_empty() && !args.interactive {
        return Err(miette::miette!(
            help = "pass FIELD=VALUE pairs or --interactive",
            "nothing to change"
        ));
    }

    let Some(before) = store::<T>(&ctx.dashboard).get(args.id).cloned() else {
        println!(
            "{} No {} with id {}; nothing changed.",
            style("!").yellow(),
            T::KIND,
            args.id
        );
        return Ok(());
    };

    let mut form = FormEditor::<T>::new();
    form.open_edit(&before);
    fill_draft(&mut form, &args.fields, args.interactive, &ctx.dashboard.lookup())?;

    let records = <Dashboard as Holds<T>>::records_mut(&mut ctx.dashboard);
    match form.commit(records).map_err(|e| miette::miette!("{}", e))? {
        Commit::Updated(id) => {
            if global.quiet {
                return Ok(());
            }
            println!("{} Updated {} {}", style("✓").green(), T::KIND, style(id).cyan());
            if let Some(after) = store::<T>(&ctx.dashboard).get(id) {
                for spec in T::fields() {
                    let old = before.record.get_field(spec.name).unwrap_or_default();
                    let new = after.record.get_field(spec.name).unwrap_or_default();
                    if old != new {
                        println!(
                            "   {}: {} → {}",
                            spec.name,
                            style(or_dash(&old)).dim(),
                            style(or_dash(&new)).yellow()
                        );
                    }
                }
            }
        }
        Commit::Vanished(id) => {
            println!(
                "{} {} {} was removed meanwhile; nothing changed.",
                style("!").yellow(),
                T::KIND,
                id
            );
        }
        Commit::Created(id) => {
            return Err(miette::miette!("unexpected create of {} {}", T::KIND, id));
        }
    }
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Ask before deleting; without a terminal the answer is no
fn confirm(prompt: &str) -> Result<bool> {
    if !console::Term::stderr().is_term() {
        eprintln!(
            "{} No terminal to confirm on; pass --yes to delete.",
            style("!").yellow()
        );
        return Ok(false);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

pub fn delete<T>(ctx: &mut Context, global: &GlobalOpts, args: DeleteArgs) -> Result<()>
where
    T: Listing,
    Dashboard: Holds<T>,
{
    ctx.authorize(T::SECTION, Action::Mutate)?;

    let Some(title) = store::<T>(&ctx.dashboard)
        .get(args.id)
        .map(|e| e.record.title().to_string())
    else {
        println!(
            "{} No {} with id {}; nothing deleted.",
            style("!").yellow(),
            T::KIND,
            args.id
        );
        return Ok(());
    };

    if !args.yes && !confirm(&format!("Delete {} {} ({})?", T::KIND, args.id, title))? {
        println!("Aborted.");
        return Ok(());
    }

    let Some(deletion) = <Dashboard as Holds<T>>::remove(&mut ctx.dashboard, args.id) else {
        return Ok(());
    };

    if global.quiet {
        return Ok(());
    }
    println!(
        "{} Deleted {} {} ({})",
        style("✓").green(),
        T::KIND,
        style(deletion.id).cyan(),
        deletion.title
    );
    for cascade in &deletion.cascaded {
        println!("   also removed {} {}(s)", cascade.count, cascade.kind);
    }
    Ok(())
}

pub fn stats<T>(ctx: &Context, global: &GlobalOpts) -> Result<()>
where
    T: Listing,
    Dashboard: Holds<T>,
{
    ctx.authorize(T::SECTION, Action::View)?;
    let summary = T::summarize(store::<T>(&ctx.dashboard).list(), &ctx.dashboard.lookup());
    print_summary(&summary, ctx.format(global))
}
