use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tenant_lifecycle::domain::EmailAllocator;
use tenant_lifecycle::infra::{
    Argon2SecretHasher, InMemoryBackend, InMemoryUserService, MokaTenantProfileCache,
};
use tenant_lifecycle::{Service, TenantLifecycleConfig, TenantLifecycleLocalClient};
use tenant_lifecycle_sdk::{Tenant, TenantLifecycleClient, TenantProfile, TenantProfileId};

/// Tenant lifecycle tool - configuration checks and in-memory dry runs
#[derive(Parser)]
#[command(name = "tenant-lifecycle-cli")]
#[command(about = "Tenant lifecycle tool - configuration checks and in-memory dry runs")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and exit
    Check,
    /// Print the default admin email each tenant title would get
    Email {
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// Create and then delete tenants against in-memory collaborators
    Simulate {
        #[arg(required = true)]
        titles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config {
        if !Path::new(path).is_file() {
            anyhow::bail!("config file does not exist: {}", path.to_string_lossy());
        }
    }

    init_logging(cli.verbose);

    // 1) defaults -> 2) YAML (if provided) -> 3) env (TENANT_LIFECYCLE__*)
    let config = TenantLifecycleConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("Effective configuration:\n{}", to_json(&config)?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => check_config(&config),
        Commands::Email { titles } => print_emails(config, &titles).await,
        Commands::Simulate { titles } => simulate(config, &titles).await,
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    } else {
        EnvFilter::new(default_level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn to_json(config: &TenantLifecycleConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

fn check_config(config: &TenantLifecycleConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", to_json(config)?);
    Ok(())
}

async fn print_emails(config: TenantLifecycleConfig, titles: &[String]) -> Result<()> {
    let emails = EmailAllocator::new(
        Arc::new(InMemoryUserService::default()),
        config.admin_email_suffix,
        config.admin_local_part_fallback,
    );
    for title in titles {
        let local_part = emails.normalize(Some(title));
        let email = emails.allocate(&local_part).await?;
        println!("{title}\t{local_part}\t{email}");
    }
    Ok(())
}

async fn simulate(config: TenantLifecycleConfig, titles: &[String]) -> Result<()> {
    let backend = InMemoryBackend::new();
    let profile = TenantProfile {
        id: TenantProfileId(uuid::Uuid::new_v4()),
        name: "Default".to_owned(),
        description: Some("Default tenant profile".to_owned()),
        isolated_rule_engine: false,
        queues: vec![],
    };
    backend.profiles.insert(profile.clone());

    let cache = Arc::new(MokaTenantProfileCache::from_config(&config.profile_cache));
    let hasher = Arc::new(Argon2SecretHasher::default());
    let service = Service::new(backend.collaborators(cache, hasher), config);
    let client = TenantLifecycleLocalClient::new(Arc::new(service));

    let mut created = Vec::with_capacity(titles.len());
    for title in titles {
        let tenant = client
            .save_tenant(Tenant::new(title.as_str(), profile.id))
            .await?;
        let Some(tenant_id) = tenant.id else {
            anyhow::bail!("tenant '{title}' was saved without identity");
        };
        for admin in backend.users.users_of(tenant_id) {
            println!("created\t{tenant_id}\t{title}\t{}", admin.email);
        }
        created.push(tenant);
    }

    for tenant in &created {
        client.delete_tenant(tenant).await?;
        if let Some(tenant_id) = tenant.id {
            println!("deleted\t{tenant_id}\t{}", tenant.title);
        }
    }

    tracing::info!(
        tenants = created.len(),
        remaining = backend.tenants.len(),
        "Simulation finished"
    );
    Ok(())
}
