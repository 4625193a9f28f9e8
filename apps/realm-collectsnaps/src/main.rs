// [apps/realm-collectsnaps/src/main.rs]
//! Snapshot collector CLI (spec §4.8, C9), grounded on
//! `examples/original_source/cmd/collectsnaps/main.go` for the overall
//! shape (read config, generate PSK, walk pairs, rotate storage).

use anyhow::{Context, Result};
use clap::Parser;
use ipnet::Ipv4Net;
use realm_config::{RealmConfig, SSH_REMOTE_USERNAME};
use realm_db::{connect, ensure_schema, SchemaNames, SnapshotRepository};
use realm_pair_agent::PairAgentClient;
use realm_snapshot::{collect, generate_psk, publish_aggregate, CollectionRequest};
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(about = "Collects encrypted snapshots from every pair and publishes the aggregate.")]
struct Cli {
    /// Snapshot tag (becomes `<tag>.json` in the output directory).
    #[arg(long)]
    tag: String,

    /// Path to the realm's RSA public key (PEM), used to encrypt the PSK
    /// sent to each pair-agent.
    #[arg(long)]
    realm_public_key: PathBuf,

    /// Opaque fingerprint identifying which realm key the pair-agent should
    /// use to decrypt the PSK (spec §6 `fetchsnaps -rfp`).
    #[arg(long)]
    realm_fp: String,

    /// Directory the aggregate JSON is published into.
    #[arg(long)]
    output_dir: PathBuf,

    #[arg(long)]
    maintenance_mode: bool,

    /// Restrict collection to pairs whose endpoint falls in this CIDR.
    #[arg(long)]
    endpoint_filter: Option<Ipv4Net>,
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

    let db = SnapshotRepository::new(pool, names);
    let agent = Arc::new(PairAgentClient::new(&config.ssh_key_path, SSH_REMOTE_USERNAME));

    let pem = std::fs::read_to_string(&cli.realm_public_key).context("reading realm public key")?;
    let public_key = RsaPublicKey::from_public_key_pem(&pem).context("parsing realm public key")?;
    let psk = generate_psk(&public_key).context("generating snapshot psk")?;

    let stime: i64 = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

    let request = CollectionRequest {
        tag: &cli.tag,
        realm_fp: &cli.realm_fp,
        stime,
        maintenance_mode: cli.maintenance_mode,
        endpoint_filter: cli.endpoint_filter,
    };

    let aggregate = collect(&db, agent, &psk, request).await.context("collecting snapshots")?;

    std::fs::create_dir_all(&cli.output_dir).context("creating output directory")?;
    publish_aggregate(&cli.output_dir, &cli.tag, &aggregate).context("publishing aggregate snapshot")?;

    println!(
        "snapshot published: total_count={} errors_count={}",
        aggregate.total_count, aggregate.errors_count
    );
    Ok(())
}
