// [apps/keydesk-address-sync/src/main.rs]
//! Standalone keydesk-address-manifest reconciliation tool (spec §6,
//! SPEC_FULL.md §6 AMBIENT binaries), grounded on
//! `examples/original_source/tools/cmd/keydesk-address-sync/main.go`.

use anyhow::Context;
use realm_config::{RealmConfig, SSH_REMOTE_USERNAME};
use realm_db::{connect, ensure_schema, ManifestRepository, SchemaNames};
use realm_manifest::publish_keydesk_address_manifest;
use realm_pair_agent::PairAgentClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = RealmConfig::from_env().context("loading configuration")?;

    let pool = connect(&config.db.url).await.context("connecting to database")?;
    let names = SchemaNames::new(&config.db.brigades_schema, &config.db.brigades_stats_schema, &config.db.pairs_schema)
        .context("validating schema names")?;
    ensure_schema(&pool, &names).await.context("ensuring schema")?;

    let manifests = ManifestRepository::new(pool, names);
    let agent = PairAgentClient::new(&config.ssh_key_path, SSH_REMOTE_USERNAME);

    publish_keydesk_address_manifest(&manifests, &agent, &config.keydesk_address_sync, &config.dc.id)
        .await
        .context("publishing keydesk-address manifest")?;

    println!("keydesk-address manifest synced for dc {}", config.dc.id);
    Ok(())
}
