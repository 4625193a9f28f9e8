// [apps/realm-delbrigade/src/main.rs]
//! Delete-brigadier CLI (spec §4.7 Delete, §6).

use anyhow::{Context, Result};
use clap::Parser;
use realm_config::{RealmConfig, SSH_REMOTE_USERNAME};
use realm_db::{connect, ensure_schema, AllocatorRepository, ManifestRepository, SchemaNames};
use realm_models::CliEnvelope;
use realm_orchestrator::{delete_brigade, DeleteDeps};
use realm_pair_agent::PairAgentClient;
use realm_subdomain_client::SubdomainClient;
use uuid::Uuid;

#[derive(Parser)]
#[command(about = "Revokes a brigade on its pair and removes it from the database.")]
struct Cli {
    #[arg(long)]
    brigade_id: Uuid,

    /// Emit the single JSON envelope instead of newline text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let config = RealmConfig::from_env().context("loading configuration")?;

    let pool = connect(&config.db.url).await.context("connecting to database")?;
    let names = SchemaNames::new(&config.db.brigades_schema, &config.db.brigades_stats_schema, &config.db.pairs_schema)
        .context("validating schema names")?;
    ensure_schema(&pool, &names).await.context("ensuring schema")?;

    let allocator = AllocatorRepository::new(pool.clone(), names.clone());
    let manifests = ManifestRepository::new(pool, names);
    let subdomain = SubdomainClient::new(config.subdomain.api_server.clone(), config.subdomain.api_token.clone());
    let agent = PairAgentClient::new(&config.ssh_key_path, SSH_REMOTE_USERNAME);

    let deps = DeleteDeps {
        allocator: &allocator,
        manifests: &manifests,
        subdomain: &subdomain,
        agent: &agent,
        delegation_sync: &config.delegation_sync,
        keydesk_address_sync: &config.keydesk_address_sync,
        dc: &config.dc,
    };

    match delete_brigade(&deps, cli.brigade_id).await {
        Ok(()) => {
            if cli.json {
                println!("{}", serde_json::to_string(&CliEnvelope::ok("brigade deleted"))?);
            } else {
                println!("deleted {}", cli.brigade_id);
            }
            Ok(())
        }
        Err(e) => {
            if cli.json {
                println!("{}", serde_json::to_string(&CliEnvelope::error(1, e.to_string()))?);
            } else {
                eprintln!("error: {e}");
            }
            std::process::exit(1);
        }
    }
}
