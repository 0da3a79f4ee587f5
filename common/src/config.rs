use std::path::PathBuf;
use std::time::Duration;

use crate::policy::{AddressFilter, EvictionPolicy, MissingHostPolicy, SortKey};

pub const DATA_FILE: &str = "data.json";
pub const HOSTS_FILE: &str = "hosts";
pub const IMPORT_FILE: &str = "hosts.txt";
pub const PARALLEL_LIMIT: usize = 1 << 7;
pub const FAILED_LIMIT: u32 = 3;
pub const PROBE_PORT: u16 = 80;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
pub const PUBLISH_SAMPLE: u32 = 5;
pub const CREDENTIAL_VAR: &str = "password";

#[derive(Debug, Clone)]
pub struct Config {
    /// Persisted mapping, rewritten after every run.
    pub data_file: PathBuf,
    /// Listing produced by the `build` command.
    pub hosts_file: PathBuf,
    /// Manually maintained `<address> <hostname>` pairs read by `import`.
    pub import_file: PathBuf,
    /// Maximum number of lookups or probes in flight at once.
    pub workers: usize,
    /// Failure count compared against [`Config::eviction`] on each failed probe.
    pub failure_threshold: u32,
    pub eviction: EvictionPolicy,
    pub address_filter: AddressFilter,
    pub sort_key: SortKey,
    pub missing_hosts: MissingHostPolicy,
    pub probe_port: u16,
    pub probe_timeout: Duration,
    pub publish: PublishConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE),
            hosts_file: PathBuf::from(HOSTS_FILE),
            import_file: PathBuf::from(IMPORT_FILE),
            workers: PARALLEL_LIMIT,
            failure_threshold: FAILED_LIMIT,
            eviction: EvictionPolicy::default(),
            address_filter: AddressFilter::default(),
            sort_key: SortKey::default(),
            missing_hosts: MissingHostPolicy::default(),
            probe_port: PROBE_PORT,
            probe_timeout: PROBE_TIMEOUT,
            publish: PublishConfig::default(),
        }
    }
}

/// Settings for pushing the refreshed files to a remote repository.
///
/// Publishing only happens when the variable named by `credential_var` is set
/// and a one in `sample` draw succeeds.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub enabled: bool,
    pub credential_var: String,
    pub sample: u32,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    /// Remote URL, `{credential}` is replaced with the secret.
    pub remote_url: Option<String>,
    pub branch: String,
    pub message: String,
    /// Repository checkout the git steps run in; the process cwd when unset.
    pub workdir: Option<PathBuf>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            credential_var: CREDENTIAL_VAR.to_string(),
            sample: PUBLISH_SAMPLE,
            user_name: None,
            user_email: None,
            remote_url: None,
            branch: String::from("master"),
            message: String::from("daily update"),
            workdir: None,
        }
    }
}
