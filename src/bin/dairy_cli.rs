use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use dairy_ledger::{
    config::{self, AppConfig},
    models::{ApiResource, InwardTransaction, OutwardTransaction},
    services::{
        api_client::{ApiClient, Session},
        calculation::{format_amount, DocumentTotals, LineAmounts},
        csv_export::{write_csv, CsvRecord, ExportResource},
        invoicing::{InvoicingService, PrintOutcome},
        transactions::TransactionService,
        words::{amount_in_words, to_words, NumberingSystem},
    },
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize(cli.token.clone())?;

    match cli.command {
        Commands::Inward(command) => handle_inward_command(&context, command, cli.json).await?,
        Commands::Outward(command) => handle_outward_command(&context, command, cli.json).await?,
        Commands::Export(args) => handle_export(&context, args, cli.json).await?,
        Commands::Calc(command) => handle_calc_command(command, cli.json)?,
        Commands::Words(args) => handle_words(args, cli.json)?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "dairy-cli",
    about = "Inward/outward entries, invoices and exports for the dairy backend",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[arg(long, global = true, help = "Bearer token; overrides APP__API_TOKEN")]
    token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Inward(EntryCommands),
    #[command(subcommand)]
    Outward(EntryCommands),
    Export(ExportArgs),
    #[command(subcommand)]
    Calc(CalcCommands),
    Words(WordsArgs),
}

#[derive(Subcommand)]
enum EntryCommands {
    List,
    Get(IdArgs),
    Submit(SubmitArgs),
    Invoice(InvoiceArgs),
}

#[derive(Args)]
struct IdArgs {
    #[arg(help = "Entry identifier")]
    id: String,
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long, help = "JSON file holding the entry; an `_id` makes this an update")]
    file: PathBuf,
}

#[derive(Args)]
struct InvoiceArgs {
    #[arg(help = "Entry identifier")]
    id: String,
    #[arg(long, action = ArgAction::SetTrue, help = "Copy the printed invoice to the documents directory")]
    share: bool,
    #[arg(long, action = ArgAction::SetTrue, help = "Write the HTML to stdout instead of printing")]
    stdout: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(value_parser = parse_resource, help = "inward, outward, product, category, customer, supplier, warehouse, transport or user")]
    resource: ExportResource,
    #[arg(long, help = "Target directory (defaults to the configured export_dir)")]
    dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum CalcCommands {
    /// GST and total for one line
    Line(LineArgs),
    /// Totals for an entry stored as JSON
    Total(TotalArgs),
}

#[derive(Args)]
struct LineArgs {
    #[arg(long, help = "Quantity; non-numeric input counts as 0")]
    quantity: String,
    #[arg(long, help = "Rate per unit; non-numeric input counts as 0")]
    rate: String,
    #[arg(long, default_value = "0", help = "GST percentage")]
    gst: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum EntryKind {
    Inward,
    Outward,
}

#[derive(Args)]
struct TotalArgs {
    #[arg(long, value_enum)]
    kind: EntryKind,
    #[arg(long, help = "JSON file holding the entry")]
    file: PathBuf,
}

#[derive(Args)]
struct WordsArgs {
    #[arg(help = "Whole number to spell out")]
    number: u64,
    #[arg(long, action = ArgAction::SetTrue, help = "Use million/billion grouping")]
    international: bool,
    #[arg(long, action = ArgAction::SetTrue, help = "Wrap as `Rupees ... Only`")]
    rupees: bool,
}

struct CliContext {
    config: AppConfig,
    api: ApiClient,
}

impl CliContext {
    fn initialize(token: Option<String>) -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let mut api = ApiClient::from_config(&config).context("failed to build API client")?;
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            api = api.with_session(Session::new(token.trim()));
        }
        debug!(base_url = %api.base_url(), "CLI initialised");

        Ok(Self { config, api })
    }

    fn transactions(&self) -> TransactionService {
        TransactionService::new(self.api.clone())
    }

    fn invoicing(&self) -> InvoicingService {
        InvoicingService::from_config(self.api.clone(), &self.config)
    }
}

async fn handle_inward_command(
    context: &CliContext,
    command: EntryCommands,
    json: bool,
) -> Result<()> {
    match command {
        EntryCommands::List => {
            let entries = context
                .api
                .list::<InwardTransaction>()
                .await
                .context("failed to list inward entries")?;
            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No inward entries found");
            } else {
                entries.iter().for_each(render_inward);
            }
        }
        EntryCommands::Get(args) => {
            let entry = context
                .api
                .get::<InwardTransaction>(&args.id)
                .await
                .with_context(|| format!("failed to load inward entry {}", args.id))?;
            if json {
                print_json(&entry)?;
            } else {
                render_inward(&entry);
            }
        }
        EntryCommands::Submit(args) => {
            let entry: InwardTransaction = read_json(&args.file)?;
            let saved = context
                .transactions()
                .submit_inward(entry)
                .await
                .context("failed to save inward entry")?;
            if json {
                print_json(&saved)?;
            } else {
                println!("Saved inward entry {}", saved.invoice_no);
                render_inward(&saved);
            }
        }
        EntryCommands::Invoice(args) => {
            let invoicing = context.invoicing();
            let document = invoicing
                .inward_document(&args.id)
                .await
                .with_context(|| format!("failed to prepare invoice for {}", args.id))?;
            print_invoice(&invoicing, &document, &args, json).await?;
        }
    }
    Ok(())
}

async fn handle_outward_command(
    context: &CliContext,
    command: EntryCommands,
    json: bool,
) -> Result<()> {
    match command {
        EntryCommands::List => {
            let entries = context
                .api
                .list::<OutwardTransaction>()
                .await
                .context("failed to list outward entries")?;
            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No outward entries found");
            } else {
                entries.iter().for_each(render_outward);
            }
        }
        EntryCommands::Get(args) => {
            let entry = context
                .api
                .get::<OutwardTransaction>(&args.id)
                .await
                .with_context(|| format!("failed to load outward entry {}", args.id))?;
            if json {
                print_json(&entry)?;
            } else {
                render_outward(&entry);
            }
        }
        EntryCommands::Submit(args) => {
            let entry: OutwardTransaction = read_json(&args.file)?;
            let saved = context
                .transactions()
                .submit_outward(entry)
                .await
                .context("failed to save outward entry")?;
            if json {
                print_json(&saved)?;
            } else {
                println!("Saved outward entry {}", saved.invoice_no);
                render_outward(&saved);
            }
        }
        EntryCommands::Invoice(args) => {
            let invoicing = context.invoicing();
            let document = invoicing
                .outward_document(&args.id)
                .await
                .with_context(|| format!("failed to prepare invoice for {}", args.id))?;
            print_invoice(&invoicing, &document, &args, json).await?;
        }
    }
    Ok(())
}

async fn print_invoice(
    invoicing: &InvoicingService,
    document: &dairy_ledger::InvoiceDocument,
    args: &InvoiceArgs,
    json: bool,
) -> Result<()> {
    if args.stdout {
        println!("{}", dairy_ledger::render_invoice_html(document));
        return Ok(());
    }

    let PrintOutcome { printed, shared } = invoicing
        .print_document(document, args.share)
        .await
        .context("failed to print invoice")?;
    if json {
        print_json(&json!({ "printed": printed, "shared": shared }))?;
    } else {
        println!("Invoice written to {}", printed.display());
        if let Some(shared) = shared {
            println!("Shared copy at {}", shared.display());
        }
    }
    Ok(())
}

async fn export<T: ApiResource + CsvRecord>(
    context: &CliContext,
    dir: &Path,
    name: &str,
) -> Result<(PathBuf, usize)> {
    let records = context
        .api
        .list::<T>()
        .await
        .with_context(|| format!("failed to fetch {} records", T::NAME))?;
    let path = write_csv(dir, name, &records)
        .await
        .with_context(|| format!("failed to write {} export", name))?;
    Ok((path, records.len()))
}

async fn handle_export(context: &CliContext, args: ExportArgs, json: bool) -> Result<()> {
    use dairy_ledger::models::{Category, Customer, Product, Supplier, Transport, User, Warehouse};

    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| context.config.export_dir.clone());
    let name = args.resource.to_string();
    let (path, rows) = match args.resource {
        ExportResource::Inward => export::<InwardTransaction>(context, &dir, &name).await?,
        ExportResource::Outward => export::<OutwardTransaction>(context, &dir, &name).await?,
        ExportResource::Product => export::<Product>(context, &dir, &name).await?,
        ExportResource::Category => export::<Category>(context, &dir, &name).await?,
        ExportResource::Customer => export::<Customer>(context, &dir, &name).await?,
        ExportResource::Supplier => export::<Supplier>(context, &dir, &name).await?,
        ExportResource::Warehouse => export::<Warehouse>(context, &dir, &name).await?,
        ExportResource::Transport => export::<Transport>(context, &dir, &name).await?,
        ExportResource::User => export::<User>(context, &dir, &name).await?,
    };

    if json {
        print_json(&json!({ "path": path, "rows": rows }))?;
    } else {
        println!("Exported {} {} rows to {}", rows, name, path.display());
    }
    Ok(())
}

fn handle_calc_command(command: CalcCommands, json: bool) -> Result<()> {
    match command {
        CalcCommands::Line(args) => {
            let amounts = LineAmounts::from_input(&args.quantity, &args.rate, &args.gst)?;
            if json {
                print_json(&amounts)?;
            } else {
                println!(
                    "Base {} • GST {} • Total {}",
                    format_amount(amounts.base_amount),
                    format_amount(amounts.gst_amount),
                    format_amount(amounts.total_amount)
                );
            }
        }
        CalcCommands::Total(args) => {
            let (stored, totals) = match args.kind {
                EntryKind::Inward => {
                    let mut entry: InwardTransaction = read_json(&args.file)?;
                    let amount = entry.recalculate()?;
                    (amount, DocumentTotals::from_items(&entry.product_details, entry.rental_cost())?)
                }
                EntryKind::Outward => {
                    let mut entry: OutwardTransaction = read_json(&args.file)?;
                    let total = entry.recalculate()?;
                    (total, DocumentTotals::from_items(&entry.product_details, entry.rental_cost())?)
                }
            };
            if json {
                print_json(&json!({ "stored": stored, "totals": totals }))?;
            } else {
                render_totals(stored, &totals);
            }
        }
    }
    Ok(())
}

fn handle_words(args: WordsArgs, json: bool) -> Result<()> {
    let system = if args.international {
        NumberingSystem::International
    } else {
        NumberingSystem::Indian
    };
    let words = if args.rupees {
        amount_in_words(Decimal::from(args.number), system)
    } else {
        to_words(args.number, system)
    };

    if json {
        print_json(&json!({ "number": args.number, "words": words }))?;
    } else {
        println!("{}", words.trim_end());
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid entry", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_inward(entry: &InwardTransaction) {
    let supplier = entry
        .supplier_details
        .as_ref()
        .map(|s| s.supplier_name.as_str())
        .unwrap_or("N/A");
    println!(
        "- Inward {} • {} • supplier {} • {} items • amount {}",
        entry.invoice_no,
        entry.date,
        supplier,
        entry.product_details.len(),
        format_amount(entry.amount)
    );
}

fn render_outward(entry: &OutwardTransaction) {
    let customer = entry
        .customer_details
        .as_ref()
        .map(|c| c.customer_name.as_str())
        .unwrap_or("N/A");
    println!(
        "- Outward {} • {} • customer {} • {} items • total {} • {} • outstanding {}",
        entry.invoice_no,
        entry.date,
        customer,
        entry.product_details.len(),
        format_amount(entry.total),
        entry.payment_type,
        format_amount(entry.outstanding_payment)
    );
}

fn render_totals(stored: Decimal, totals: &DocumentTotals) {
    println!("Taxable value : {}", format_amount(totals.taxable_value));
    println!("GST           : {}", format_amount(totals.total_gst));
    println!("Rental cost   : {}", format_amount(totals.rental_cost));
    println!("Grand total   : {}", format_amount(totals.grand_total));
    println!("Stored figure : {}", format_amount(stored));
}

fn parse_resource(raw: &str) -> Result<ExportResource, String> {
    raw.parse()
        .map_err(|_| format!("unknown resource '{raw}'"))
}
