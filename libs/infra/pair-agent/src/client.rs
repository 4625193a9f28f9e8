// [libs/infra/pair-agent/src/client.rs]
use crate::dechunk::dechunk;
use crate::errors::PairAgentError;
use crate::handler::{AcceptAnyHostKey, HostKeyPolicy, RealmSshHandler};
use russh::client::{self, Msg};
use russh::{Channel, ChannelMsg};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Default per-invocation timeout (spec §6/§9): one SSH session, one
/// command, no internal retry — callers retry per their own policy.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const SSH_PORT: u16 = 22;

pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_status: Option<u32>,
}

impl CommandOutput {
    /// Decodes `stdout` as HTTP chunked transfer encoding (the pair-agent's
    /// response framing, spec §6).
    pub fn dechunked_stdout(&self) -> Result<Vec<u8>, PairAgentError> {
        dechunk(&self.stdout)
    }
}

pub struct PairAgentClient<P: HostKeyPolicy = AcceptAnyHostKey> {
    ssh_key_path: PathBuf,
    username: String,
    timeout: Duration,
    host_key_policy: Arc<P>,
}

impl PairAgentClient<AcceptAnyHostKey> {
    pub fn new(ssh_key_path: impl AsRef<Path>, username: impl Into<String>) -> Self {
        Self {
            ssh_key_path: ssh_key_path.as_ref().to_path_buf(),
            username: username.into(),
            timeout: DEFAULT_TIMEOUT,
            host_key_policy: Arc::new(AcceptAnyHostKey),
        }
    }
}

// Manual impl: deriving `Clone` would add an unneeded `P: Clone` bound —
// the policy is only ever held behind an `Arc`, which clones regardless.
impl<P: HostKeyPolicy> Clone for PairAgentClient<P> {
    fn clone(&self) -> Self {
        Self {
            ssh_key_path: self.ssh_key_path.clone(),
            username: self.username.clone(),
            timeout: self.timeout,
            host_key_policy: self.host_key_policy.clone(),
        }
    }
}

impl<P: HostKeyPolicy> PairAgentClient<P> {
    pub fn with_host_key_policy(mut self, policy: Arc<P>) -> Self {
        self.host_key_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Re-keys this client to a different remote username, leaving the SSH
    /// key, timeout, and host-key policy untouched. The sync host and the
    /// brigade pairs are two different machines with independent SSH
    /// accounts (spec.md's `user@host:port` connect strings), so manifest
    /// publishing authenticates as the sync host's configured user rather
    /// than the pair-agent's fixed remote user.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Runs exactly one command over a fresh SSH session, returning stdout
    /// and stderr verbatim (stdout is still chunk-framed; use
    /// [`CommandOutput::dechunked_stdout`] to decode it).
    #[instrument(skip(self, command, stdin), fields(host = %host))]
    pub async fn invoke(&self, host: IpAddr, command: &str, stdin: Option<&[u8]>) -> Result<CommandOutput, PairAgentError> {
        tokio::time::timeout(self.timeout, self.invoke_inner(host, command, stdin))
            .await
            .map_err(|_| PairAgentError::Timeout(self.timeout))?
    }

    async fn invoke_inner(&self, host: IpAddr, command: &str, stdin: Option<&[u8]>) -> Result<CommandOutput, PairAgentError> {
        let key = russh_keys::load_secret_key(&self.ssh_key_path, None)
            .map_err(|e| PairAgentError::KeyLoad(self.ssh_key_path.clone(), e.to_string()))?;

        let config = Arc::new(client::Config::default());
        let handler = RealmSshHandler { policy: self.host_key_policy.clone() };

        let mut handle = client::connect(config, (host, SSH_PORT), handler).await?;

        let authenticated = handle.authenticate_publickey(&self.username, Arc::new(key)).await?;
        if !authenticated {
            return Err(PairAgentError::AuthRejected(self.username.clone()));
        }

        let mut channel: Channel<Msg> = handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        if let Some(payload) = stdin {
            channel.data(payload).await?;
        }
        channel.eof().await?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_status = None;

        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => stdout.extend_from_slice(&data),
                Some(ChannelMsg::ExtendedData { data, .. }) => stderr.extend_from_slice(&data),
                Some(ChannelMsg::ExitStatus { exit_status: status }) => exit_status = Some(status),
                Some(ChannelMsg::Close) | Some(ChannelMsg::Eof) | None => break,
                Some(_) => {}
            }
        }

        if let Some(status) = exit_status {
            if status != 0 {
                tracing::warn!(status, stderr = %String::from_utf8_lossy(&stderr), "pair-agent command exited non-zero");
            }
        }

        Ok(CommandOutput { stdout, stderr, exit_status })
    }
}
