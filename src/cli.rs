use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(name = "kubectl-historical-logs")]
#[command(about = "Fetch historical logs for pods and workloads from the log exploration API")]
#[command(group(ArgGroup::new("workload").multiple(false)))]
pub struct Cli {
    /// Resource to fetch logs for, e.g. deployment=my-app or statefulset/db
    pub resource: Option<String>,

    /// Namespace
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Pod name
    #[arg(long)]
    pub podname: Option<String>,

    /// Relative time window, e.g. 30m or 00h30m
    #[arg(long)]
    pub tail: Option<String>,

    /// Only return logs after this time
    #[arg(long = "start-time")]
    pub start_time: Option<String>,

    /// Only return logs before this time
    #[arg(long = "end-time")]
    pub end_time: Option<String>,

    /// Log level, e.g. info or error
    #[arg(long)]
    pub level: Option<String>,

    /// Maximum number of log lines to display (0-1000, 0 shows everything)
    #[arg(long, allow_hyphen_values = true)]
    pub limit: Option<String>,

    /// Deployment name
    #[arg(long, group = "workload")]
    pub deployment: Option<String>,

    /// DaemonSet name
    #[arg(long, group = "workload")]
    pub daemonset: Option<String>,

    /// StatefulSet name
    #[arg(long, group = "workload")]
    pub statefulset: Option<String>,

    /// Log exploration API url (discovered from the cluster route when unset)
    #[arg(long, env = "LOG_EXPLORATION_API_URL")]
    pub api_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Context
    #[arg(long)]
    pub context: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
