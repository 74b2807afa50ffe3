use std::path::PathBuf;

use api::backend::fetch_all;
use api::billing::{BillingError, GstBreakdown, calculate_gst};
use api::export::{ExportError, export_records, file_name};
use api::format::format_amount;
use api::models::AppointmentStatus;
use api::upload::{DEFAULT_MAX_UPLOAD_BYTES, FileUpload, UploadFeature};
use api::{ApiClient, ApiConfig, ApiError, Credentials, PageQuery, Resource, SellerBackend, SettingsKind};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing credentials; pass --token and --user-id or set SELLER_TOKEN and SELLER_USER_ID")]
    MissingCredentials,
    #[error("unknown resource `{0}` (expected one of: {list})", list = resource_slugs())]
    UnknownResource(String),
    #[error("unknown settings kind `{0}` (expected site, website or payment)")]
    UnknownSettings(String),
    #[error("unknown upload feature `{0}`")]
    UnknownFeature(String),
    #[error("unknown appointment status `{0}`")]
    UnknownStatus(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Billing(#[from] BillingError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sellerctl", about = "Seller dashboard API command line")]
struct Cli {
    #[arg(long, env = "SELLER_API_BASE_URL")]
    base_url: String,

    #[arg(long, env = "SELLER_UPLOAD_BASE_URL")]
    upload_base_url: Option<String>,

    #[arg(long, env = "SELLER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "SELLER_USER_ID")]
    user_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and print the credentials to export.
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long, env = "SELLER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    List {
        resource: String,
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Get {
        resource: String,
        id: String,
    },
    Create {
        resource: String,
        #[arg(long)]
        data: String,
    },
    Update {
        resource: String,
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        resource: String,
        id: String,
    },
    /// Change an appointment's status.
    Status {
        id: String,
        status: String,
    },
    Settings(SettingsCommand),
    Upload {
        feature: String,
        path: PathBuf,
    },
    /// Write every record of a collection to an .xlsx file.
    Export {
        resource: String,
        #[arg(long, help = "Output path; defaults to <resource>-<date>.xlsx")]
        out: Option<PathBuf>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 100)]
        page_size: u32,
    },
    /// Compute GST locally; no backend call.
    Gst {
        amount: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = false)]
        inclusive: bool,
    },
}

#[derive(Args, Debug)]
struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SettingsSubcommand {
    Get {
        kind: String,
    },
    Set {
        kind: String,
        #[arg(long)]
        data: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    if let Command::Gst { amount, rate, inclusive } = cli.command {
        let breakdown = calculate_gst(amount, rate, inclusive)?;
        for line in gst_lines(&breakdown, rate) {
            println!("{line}");
        }
        return Ok(());
    }

    let mut config = ApiConfig::from_base_url(&cli.base_url)?;
    if let Some(upload) = cli.upload_base_url.filter(|u| !u.trim().is_empty()) {
        config.upload_base_url = upload.trim().trim_end_matches('/').to_owned();
    }
    let client = ApiClient::new(&config)?;

    if let Command::Login { phone, password } = &cli.command {
        let session = client.login(phone, password).await?;
        println!("export SELLER_TOKEN={}", session.token);
        println!("export SELLER_USER_ID={}", session.user.id);
        return Ok(());
    }

    let creds = match (cli.token, cli.user_id) {
        (Some(token), Some(user_id)) if !token.is_empty() && !user_id.is_empty() => Credentials::new(token, user_id),
        _ => return Err(CliError::MissingCredentials),
    };
    run(&client, &creds, cli.command).await
}

async fn run(backend: &dyn SellerBackend, creds: &Credentials, command: Command) -> Result<(), CliError> {
    match command {
        Command::List { resource, page, limit, search } => {
            let resource = parse_resource(&resource)?;
            let query = PageQuery::from_raw(page.as_deref(), limit.as_deref(), search.as_deref());
            let page = backend.list(creds, resource, &query).await?;
            print_json(&serde_json::to_value(page)?)
        }
        Command::Get { resource, id } => {
            let record = backend.fetch(creds, parse_resource(&resource)?, &id).await?;
            print_json(&record)
        }
        Command::Create { resource, data } => {
            let resource = parse_resource(&resource)?;
            let body = parse_body(&data)?;
            resource.validate_body(&body).map_err(ApiError::from)?;
            let ack = backend.create(creds, resource, &body).await?;
            print_json(&serde_json::to_value(ack)?)
        }
        Command::Update { resource, id, data } => {
            let resource = parse_resource(&resource)?;
            let body = parse_body(&data)?;
            resource.validate_body(&body).map_err(ApiError::from)?;
            let ack = backend.update(creds, resource, &id, &body).await?;
            print_json(&serde_json::to_value(ack)?)
        }
        Command::Delete { resource, id } => {
            let ack = backend.delete(creds, parse_resource(&resource)?, &id).await?;
            print_json(&serde_json::to_value(ack)?)
        }
        Command::Status { id, status } => {
            let parsed = AppointmentStatus::from_str(&status).ok_or(CliError::UnknownStatus(status))?;
            let ack = backend.update_appointment_status(creds, &id, parsed).await?;
            print_json(&serde_json::to_value(ack)?)
        }
        Command::Settings(settings) => run_settings(backend, creds, settings).await,
        Command::Upload { feature, path } => {
            let feature = UploadFeature::from_slug(&feature).ok_or(CliError::UnknownFeature(feature))?;
            let bytes = tokio::fs::read(&path).await?;
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("upload");
            let file = FileUpload::new(name, None, bytes);
            file.validate(DEFAULT_MAX_UPLOAD_BYTES)?;
            let filename = backend.upload(creds, feature, file).await?;
            println!("{filename}");
            Ok(())
        }
        Command::Export { resource, out, search, page_size } => {
            let resource = parse_resource(&resource)?;
            let records = fetch_all(backend, creds, resource, search, page_size).await?;
            let bytes = export_records(resource.label(), resource.columns(), &records)?;
            let out = out.unwrap_or_else(|| PathBuf::from(file_name(resource.slug(), chrono::Local::now().date_naive())));
            tokio::fs::write(&out, bytes).await?;
            println!("wrote {} records to {}", records.len(), out.display());
            Ok(())
        }
        Command::Login { .. } | Command::Gst { .. } => Ok(()),
    }
}

async fn run_settings(backend: &dyn SellerBackend, creds: &Credentials, settings: SettingsCommand) -> Result<(), CliError> {
    match settings.command {
        SettingsSubcommand::Get { kind } => {
            let kind = parse_settings(&kind)?;
            let stored = backend.settings(creds, kind).await?;
            print_json(&kind.present(stored))
        }
        SettingsSubcommand::Set { kind, data } => {
            let kind = parse_settings(&kind)?;
            let body = parse_body(&data)?;
            kind.validate_body(&body).map_err(ApiError::from)?;
            let ack = backend.save_settings(creds, kind, &kind.prepare(body)).await?;
            print_json(&serde_json::to_value(ack)?)
        }
    }
}

fn parse_resource(raw: &str) -> Result<Resource, CliError> {
    Resource::from_slug(raw).ok_or_else(|| CliError::UnknownResource(raw.to_owned()))
}

fn parse_settings(raw: &str) -> Result<SettingsKind, CliError> {
    SettingsKind::from_slug(raw).ok_or_else(|| CliError::UnknownSettings(raw.to_owned()))
}

fn parse_body(raw: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str::<Value>(raw)?)
}

fn resource_slugs() -> String {
    Resource::ALL.iter().map(|r| r.slug()).collect::<Vec<_>>().join(", ")
}

fn gst_lines(breakdown: &GstBreakdown, rate: f64) -> [String; 3] {
    [
        format!("taxable  {}", format_amount(breakdown.taxable)),
        format!("gst {rate}%  {}", format_amount(breakdown.gst)),
        format!("total    {}", format_amount(breakdown.total)),
    ]
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
