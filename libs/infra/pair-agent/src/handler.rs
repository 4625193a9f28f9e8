// [libs/infra/pair-agent/src/handler.rs]
//! Host-key verification policy.
//!
//! Host identity is explicitly out of scope for this transport (spec §4.2);
//! the default handler accepts any server key and logs once per session. A
//! deployment that needs pinning implements `HostKeyPolicy` and passes it to
//! [`crate::client::PairAgentClient::with_host_key_policy`].

use async_trait::async_trait;
use russh::client::Handler;
use russh_keys::key::PublicKey;

pub trait HostKeyPolicy: Send + Sync + 'static {
    fn accept(&self, server_public_key: &PublicKey) -> bool;
}

pub struct AcceptAnyHostKey;

impl HostKeyPolicy for AcceptAnyHostKey {
    fn accept(&self, _server_public_key: &PublicKey) -> bool {
        true
    }
}

pub(crate) struct RealmSshHandler<P: HostKeyPolicy> {
    pub policy: std::sync::Arc<P>,
}

#[async_trait]
impl<P: HostKeyPolicy> Handler for RealmSshHandler<P> {
    type Error = russh::Error;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        let accepted = self.policy.accept(server_public_key);
        if !accepted {
            tracing::warn!("pair-agent host key rejected by policy");
        }
        Ok(accepted)
    }
}
