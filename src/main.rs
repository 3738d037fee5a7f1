use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dnspod_ddns::config::Settings;
use dnspod_ddns::ddns::{self, DdnsTarget, UpdateOutcome};
use dnspod_ddns::dns::{
    create_client, with_cancel, CreateRecord, DdnsUpdate, DnsPodClient, DomainRef, HttpTransport,
    ModifyRecord, RecordLine, RecordListQuery, Status,
};
use dnspod_ddns::{ip, secrets};

#[derive(Parser)]
#[command(name = "dnspod-ddns")]
#[command(about = "DNSPod client - manage records and keep one pointed at your public IP")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the system location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Point the configured record at the current public IP
    Update {
        /// Use this address instead of looking it up
        #[arg(long)]
        ip: Option<IpAddr>,
    },

    /// Show the current public IP
    Ip,

    /// List domains in the account
    Domains,

    /// Enable or disable a domain
    DomainStatus { domain: DomainRef, state: Toggle },

    /// List records of a domain (id or name)
    Records {
        domain: DomainRef,
        #[arg(long)]
        sub_domain: Option<String>,
        #[arg(long = "type")]
        record_type: Option<String>,
    },

    /// Create a record and print its id
    Create {
        domain: DomainRef,
        sub_domain: String,
        value: String,
        #[arg(long = "type", default_value = "A")]
        record_type: String,
        /// Line by display name
        #[arg(long, conflicts_with = "line_id")]
        line: Option<String>,
        /// Line by id
        #[arg(long)]
        line_id: Option<String>,
        #[arg(long)]
        mx: Option<u16>,
        #[arg(long)]
        ttl: Option<u32>,
    },

    /// Change a record
    Modify {
        domain: DomainRef,
        record_id: String,
        value: String,
        sub_domain: String,
        #[arg(long = "type", default_value = "A")]
        record_type: String,
        #[arg(long, default_value = "0")]
        line_id: String,
    },

    /// Delete a record
    Remove { domain: DomainRef, record_id: String },

    /// Enable or disable a record
    RecordStatus {
        domain: DomainRef,
        record_id: String,
        state: Toggle,
    },

    /// Set a record's value through the dynamic DNS action
    Ddns {
        domain: DomainRef,
        record_id: String,
        value: String,
        #[arg(long)]
        sub_domain: Option<String>,
        #[arg(long)]
        line: Option<String>,
    },

    /// Set a record's remark
    Remark {
        domain_id: u64,
        record_id: String,
        remark: String,
    },

    /// Show the raw details of a record
    Info { domain: DomainRef, record_id: String },

    /// Store the DNSPod API token
    SetKey,

    /// Delete the stored DNSPod API token
    DeleteKey,

    /// Show configuration file location and contents
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    Enable,
    Disable,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Toggle::Enable)
    }

    fn verb(self) -> &'static str {
        match self {
            Toggle::Enable => "enable",
            Toggle::Disable => "disable",
        }
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);
    let settings = Settings::load_from(&config_path).ok();

    let log_level = settings
        .as_ref()
        .map(|s| s.general.log_level.as_str())
        .unwrap_or("info");
    init_logging(log_level);

    let api = settings
        .as_ref()
        .map(|s| s.api.clone())
        .unwrap_or_default();
    let credentials_path = secrets::credentials_path(&config_path);
    let client = || -> Result<DnsPodClient<HttpTransport>> {
        create_client(&api, secrets::get_credentials(&credentials_path)?)
    };

    match cli.command {
        Commands::Update { ip } => {
            let settings = settings.ok_or_else(|| {
                anyhow!("Configuration file not found. Run 'dnspod-ddns config' to see the expected location.")
            })?;
            let outcome = run_update(&settings, client()?, ip).await;
            println!("{}", outcome);
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }

        Commands::Ip => {
            let urls = lookup_urls(&settings);
            println!("{}", ip::get_external_ip(&urls).await?);
        }

        Commands::Domains => {
            let list = client()?.domain_list().await?;
            report_status(&list.status)?;
            for domain in &list.domains {
                println!("{:>10}  {}  (grade {}, ttl {})", domain.id, domain, domain.grade, domain.ttl);
            }
        }

        Commands::DomainStatus { domain, state } => {
            let ok = client()?.set_domain_status(&domain, state.enabled()).await?;
            print_result(ok, &format!("{} domain {}", state.verb(), domain));
        }

        Commands::Records {
            domain,
            sub_domain,
            record_type,
        } => {
            let mut query = RecordListQuery::new(domain);
            query.sub_domain = sub_domain;
            query.record_type = record_type;

            let list = client()?.record_list_filtered(&query).await?;
            report_status(&list.status)?;
            for record in &list.records {
                println!("{:>10}  {}  line={} ttl={}", record.id, record, record.line, record.ttl);
            }
        }

        Commands::Create {
            domain,
            sub_domain,
            value,
            record_type,
            line,
            line_id,
            mx,
            ttl,
        } => {
            let mut request = CreateRecord::new(domain, sub_domain, value).record_type(record_type);
            if let Some(line) = line {
                request = request.line(RecordLine::Name(line));
            }
            if let Some(line_id) = line_id {
                request = request.line(RecordLine::Id(line_id));
            }
            request.mx = mx;
            request.ttl = ttl;

            match client()?.create(&request).await? {
                Some(id) => println!("Created record {}", id),
                None => return Err(anyhow!("DNSPod refused to create the record")),
            }
        }

        Commands::Modify {
            domain,
            record_id,
            value,
            sub_domain,
            record_type,
            line_id,
        } => {
            let request = ModifyRecord::new(domain, record_id.as_str(), value, sub_domain)
                .record_type(record_type)
                .record_line_id(line_id);
            let ok = client()?.modify(&request).await?;
            print_result(ok, &format!("modify record {}", record_id));
        }

        Commands::Remove { domain, record_id } => {
            let ok = client()?.remove(&domain, &record_id).await?;
            print_result(ok, &format!("remove record {}", record_id));
        }

        Commands::RecordStatus {
            domain,
            record_id,
            state,
        } => {
            let ok = client()?
                .set_record_status(&domain, &record_id, state.enabled())
                .await?;
            print_result(ok, &format!("{} record {}", state.verb(), record_id));
        }

        Commands::Ddns {
            domain,
            record_id,
            value,
            sub_domain,
            line,
        } => {
            let mut request = DdnsUpdate::new(domain, record_id.as_str(), value);
            request.sub_domain = sub_domain;
            if let Some(line) = line {
                request = request.record_line(line);
            }
            let ok = client()?.ddns(&request).await?;
            print_result(ok, &format!("ddns update record {}", record_id));
        }

        Commands::Remark {
            domain_id,
            record_id,
            remark,
        } => {
            let ok = client()?.remark(domain_id, &record_id, &remark).await?;
            print_result(ok, &format!("remark record {}", record_id));
        }

        Commands::Info { domain, record_id } => {
            let info = client()?.info(&domain, &record_id).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::SetKey => {
            use std::io::{self, Write};

            print!("API Token ID: ");
            io::stdout().flush()?;
            let mut token_id = String::new();
            io::stdin().read_line(&mut token_id)?;
            let token_id = token_id.trim();

            let token = rpassword::prompt_password("API Token: ")?;

            secrets::store_credentials(&credentials_path, token_id, token.trim())?;
            println!("Token stored in {}", credentials_path.display());
        }

        Commands::DeleteKey => {
            secrets::delete_credentials(&credentials_path)?;
            println!("Token deleted from {}", credentials_path.display());
        }

        Commands::Config => {
            show_config(&config_path, &settings)?;
        }
    }

    Ok(())
}

/// Looks up the address if needed and runs the edit path. Ctrl-C cancels.
async fn run_update(
    settings: &Settings,
    client: DnsPodClient<HttpTransport>,
    ip: Option<IpAddr>,
) -> UpdateOutcome {
    let ip = match ip {
        Some(ip) => ip,
        None => match ip::get_external_ip(&settings.ddns.ip_lookup_urls).await {
            Ok(ip) => ip,
            Err(e) => {
                error!("Failed to determine public IP: {}", e);
                return UpdateOutcome::Failed;
            }
        },
    };

    let (cancel_tx, mut cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let target = DdnsTarget::from(&settings.ddns);
    info!("Updating {} to {}", target, ip);

    let ip = ip.to_string();
    let update = async { Ok::<_, dnspod_ddns::dns::Error>(ddns::edit_ip(&client, &target, &ip).await) };
    match with_cancel(&mut cancel_rx, update).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Update of {} aborted: {}", target, e);
            UpdateOutcome::Failed
        }
    }
}

fn lookup_urls(settings: &Option<Settings>) -> Vec<String> {
    match settings {
        Some(s) => s.ddns.ip_lookup_urls.clone(),
        None => ip::DEFAULT_LOOKUP_URLS
            .iter()
            .map(|url| url.to_string())
            .collect(),
    }
}

fn report_status(status: &Status) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(anyhow!(
            "DNSPod error (code {}): {}",
            status.code,
            status.message
        ))
    }
}

fn print_result(ok: bool, request: &str) {
    println!("{}", result_line(ok, request));
}

fn result_line(ok: bool, request: &str) -> String {
    if ok {
        format!("DNSPod accepted: {}", request)
    } else {
        format!("DNSPod refused: {}", request)
    }
}

fn show_config(config_path: &std::path::Path, settings: &Option<Settings>) -> Result<()> {
    println!("Configuration file location: {}\n", config_path.display());

    match settings {
        Some(s) => {
            println!("Current configuration:\n");
            println!("{}", toml::to_string_pretty(s)?);
        }
        None => {
            println!("Configuration file not found.");
            println!("\nCreate a configuration file at the location above.");
            println!("Example configuration:\n");
            println!(
                r#"[general]
log_level = "info"

[api]
lang = "en"
user_agent = "dnspod-ddns/0.1.0 (you@example.com)"

[ddns]
domain = "example.com"
sub_domain = "home"
record_type = "A"
"#
            );
            println!(
                "The API token is read from {} or stored with 'dnspod-ddns set-key'.",
                secrets::TOKEN_ENV
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_line_names_the_request() {
        assert_eq!(result_line(true, "remove record 42"), "DNSPod accepted: remove record 42");
        assert_eq!(
            result_line(false, &format!("{} record {}", Toggle::Disable.verb(), 42)),
            "DNSPod refused: disable record 42"
        );
        assert_eq!(
            result_line(true, &format!("remark record {}", 42)),
            "DNSPod accepted: remark record 42"
        );
    }
}
