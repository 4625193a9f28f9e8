// [apps/realm-addbrigade/src/main.rs]
//! Add-brigadier CLI (spec §6). A thin wire-up of `realm_orchestrator::add_brigade`
//! plus a `free-slots` diagnostic subcommand (SPEC_FULL.md C14), grounded on
//! `examples/original_source/internal/kdlib/get_free_slots.go`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use realm_config::{RealmConfig, SSH_REMOTE_USERNAME};
use realm_db::{connect, ensure_schema, AllocatorRepository, ManifestRepository, PairsRepository, SchemaNames};
use realm_models::{CliEnvelope, Person};
use realm_orchestrator::{add_brigade, AddDeps};
use realm_pair_agent::PairAgentClient;
use realm_subdomain_client::SubdomainClient;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use url::Url;
use uuid::Uuid;

#[derive(Parser)]
#[command(about = "Allocates a new brigade and instantiates it on its pair, or reports free-slot counts.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit the single JSON envelope instead of newline text.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Allocate and instantiate a new brigade.
    Add {
        #[arg(long)]
        brigade_id: Uuid,
        #[arg(long)]
        brigadier: String,
        #[arg(long)]
        person_name: String,
        #[arg(long)]
        person_desc: String,
        #[arg(long)]
        person_url: Url,
        #[arg(long)]
        dns_ipv4: Ipv4Addr,
        #[arg(long)]
        dns_ipv6: Ipv6Addr,
        /// Pin placement to a specific pair's control address instead of
        /// the usual free-slots selection.
        #[arg(long)]
        forced_control_ip: Option<IpAddr>,
    },
    /// Read-only free-slot count, either across active pairs only or all.
    FreeSlots {
        #[arg(long)]
        active_only: bool,
    },
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

    match cli.command {
        Command::FreeSlots { active_only } => {
            let allocator = AllocatorRepository::new(pool, names);
            let slots = allocator.free_slots(active_only).await.context("querying free slots")?;
            if cli.json {
                let key = if active_only { "active_free_slots" } else { "total_free_slots" };
                println!("{}", serde_json::json!({ key: slots }));
            } else {
                println!("{slots}");
            }
            Ok(())
        }
        Command::Add {
            brigade_id,
            brigadier,
            person_name,
            person_desc,
            person_url,
            dns_ipv4,
            dns_ipv6,
            forced_control_ip,
        } => {
            let allocator = AllocatorRepository::new(pool.clone(), names.clone());
            let pairs = PairsRepository::new(pool.clone(), names.clone());
            let manifests = ManifestRepository::new(pool, names);
            let subdomain = SubdomainClient::new(config.subdomain.api_server.clone(), config.subdomain.api_token.clone());
            let agent = PairAgentClient::new(&config.ssh_key_path, SSH_REMOTE_USERNAME);
            let person = Person::new(person_name, person_desc, person_url);

            let deps = AddDeps {
                allocator: &allocator,
                pairs: &pairs,
                manifests: &manifests,
                subdomain: &subdomain,
                agent: &agent,
                delegation_sync: &config.delegation_sync,
                keydesk_address_sync: &config.keydesk_address_sync,
                dns: &config.dns,
                dc: &config.dc,
            };

            match add_brigade(&deps, brigade_id, &brigadier, &person, dns_ipv4, dns_ipv6, forced_control_ip).await {
                Ok(outcome) => {
                    if cli.json {
                        let envelope = CliEnvelope::ok("brigade added")
                            .with_configs(outcome.configs)
                            .with_keydesk(outcome.keydesk_ipv6)
                            .with_free_slots(outcome.free_slots);
                        println!("{}", serde_json::to_string(&envelope)?);
                    } else {
                        println!("keydesk_ipv6={}", outcome.keydesk_ipv6);
                        println!("free_slots={}", outcome.free_slots);
                        if let Some(wg) = &outcome.configs.wg {
                            println!("wg={wg}");
                        }
                        if let Some(ovc) = &outcome.configs.ovc {
                            println!("ovc={ovc}");
                        }
                        if let Some(ipsec) = &outcome.configs.ipsec {
                            println!("ipsec={ipsec}");
                        }
                        if let Some(outline) = &outcome.configs.outline {
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
    }
}
