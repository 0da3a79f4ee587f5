pub mod build;
pub mod import;
pub mod publish;
pub mod resolve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use hostmap_common::config::{
    self, Config, DATA_FILE, FAILED_LIMIT, HOSTS_FILE, IMPORT_FILE, PARALLEL_LIMIT, PROBE_PORT,
    PUBLISH_SAMPLE, PublishConfig,
};
use hostmap_common::policy::{AddressFilter, EvictionPolicy, MissingHostPolicy, SortKey};

#[derive(Parser)]
#[command(name = "hostmap")]
#[command(about = "Keeps a hosts file of reachable addresses up to date.")]
pub struct CommandLine {
    /// Defaults to `resolve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Persisted host mapping
    #[arg(long, global = true, default_value = DATA_FILE)]
    pub data: PathBuf,

    /// Listing written by `build`
    #[arg(long, global = true, default_value = HOSTS_FILE)]
    pub hosts: PathBuf,

    /// File read by `import`
    #[arg(long, global = true, default_value = IMPORT_FILE)]
    pub import_file: PathBuf,

    /// Maximum lookups or probes in flight
    #[arg(short = 'j', long, global = true, default_value_t = PARALLEL_LIMIT)]
    pub workers: usize,

    /// Failure count at which an address becomes eligible for eviction
    #[arg(long, global = true, default_value_t = FAILED_LIMIT)]
    pub threshold: u32,

    /// Eviction comparison: `at` (>=) or `above` (>)
    #[arg(long, global = true, default_value = "at")]
    pub eviction: EvictionPolicy,

    /// IPv4 heuristic: `dot` or `short`
    #[arg(long, global = true, default_value = "dot")]
    pub filter: AddressFilter,

    /// Hostname ordering: `reversed` or `lexical`
    #[arg(long, global = true, default_value = "reversed")]
    pub sort: SortKey,

    /// Drop hosts that the resolver reports as nonexistent
    #[arg(long, global = true)]
    pub prune_missing: bool,

    /// TCP port used for reachability probes
    #[arg(long, global = true, default_value_t = PROBE_PORT)]
    pub port: u16,

    /// Probe timeout in seconds
    #[arg(long, global = true, default_value_t = config::PROBE_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Never push results, even with a credential set
    #[arg(long, global = true)]
    pub no_publish: bool,

    /// Publish on one run in N
    #[arg(long, global = true, default_value_t = PUBLISH_SAMPLE)]
    pub publish_sample: u32,

    #[arg(long, global = true)]
    pub git_user: Option<String>,

    #[arg(long, global = true)]
    pub git_email: Option<String>,

    /// Remote URL, `{credential}` is replaced with the secret
    #[arg(long, global = true)]
    pub git_remote: Option<String>,

    #[arg(long, global = true, default_value = "master")]
    pub git_branch: String,

    /// Repository to publish from, defaults to the current directory
    #[arg(long, global = true)]
    pub git_dir: Option<PathBuf>,

    /// More output, repeat for trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Re-resolve every host and merge new addresses
    #[command(alias = "r")]
    Resolve,
    /// Probe every address and write the hosts file
    #[command(alias = "b")]
    Build,
    /// Merge the import file into the mapping
    #[command(alias = "i")]
    Import,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Resolve)
    }

    pub fn config(&self) -> Config {
        let missing_hosts = if self.prune_missing {
            MissingHostPolicy::Remove
        } else {
            MissingHostPolicy::Keep
        };

        Config {
            data_file: self.data.clone(),
            hosts_file: self.hosts.clone(),
            import_file: self.import_file.clone(),
            workers: self.workers,
            failure_threshold: self.threshold,
            eviction: self.eviction,
            address_filter: self.filter,
            sort_key: self.sort,
            missing_hosts,
            probe_port: self.port,
            probe_timeout: Duration::from_secs(self.timeout),
            publish: PublishConfig {
                enabled: !self.no_publish,
                sample: self.publish_sample,
                user_name: self.git_user.clone(),
                user_email: self.git_email.clone(),
                remote_url: self.git_remote.clone(),
                branch: self.git_branch.clone(),
                workdir: self.git_dir.clone(),
                ..PublishConfig::default()
            },
        }
    }
}
