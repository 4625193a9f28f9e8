// [apps/realm-replacebrigadier/src/main.rs]
//! Replace-brigadier CLI (spec §4.7 Replace, §6).

use anyhow::{Context, Result};
use clap::Parser;
use realm_config::{RealmConfig, SSH_REMOTE_USERNAME};
use realm_db::{connect, ensure_schema, AllocatorRepository, SchemaNames};
use realm_models::CliEnvelope;
use realm_orchestrator::{replace_brigadier, ReplaceFlavors};
use realm_pair_agent::PairAgentClient;
use uuid::Uuid;

#[derive(Parser)]
#[command(about = "Re-issues VPN-flavor configs for an existing brigade.")]
struct Cli {
    #[arg(long)]
    brigade_id: Uuid,

    #[arg(long)]
    wg: Option<String>,
    #[arg(long)]
    ovc: Option<String>,
    #[arg(long)]
    ipsec: Option<String>,
    #[arg(long)]
    outline: Option<String>,

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

    let allocator = AllocatorRepository::new(pool, names);
    let agent = PairAgentClient::new(&config.ssh_key_path, SSH_REMOTE_USERNAME);

    let flavors = ReplaceFlavors {
        wg: cli.wg,
        ovc: cli.ovc,
        ipsec: cli.ipsec,
        outline: cli.outline,
    };

    match replace_brigadier(&allocator, &agent, cli.brigade_id, &flavors).await {
        Ok(configs) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&CliEnvelope::ok("brigadier replaced").with_configs(configs))?
                );
            } else {
                if let Some(wg) = &configs.wg {
                    println!("wg={wg}");
                }
                if let Some(ovc) = &configs.ovc {
                    println!("ovc={ovc}");
                }
                if let Some(ipsec) = &configs.ipsec {
                    println!("ipsec={ipsec}");
                }
                if let Some(outline) = &configs.outline {
                    println!("outline={outline}");
                }
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
