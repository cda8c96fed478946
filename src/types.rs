use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Largest value accepted for `--limit`.
pub const MAX_LIMIT: u16 = 1000;

/// Maximum number of log lines to display. Zero means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(u16);

impl Limit {
    pub fn new(value: u16) -> Option<Self> {
        (value <= MAX_LIMIT).then_some(Self(value))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    pub fn is_unlimited(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Deployment,
    DaemonSet,
    StatefulSet,
}

impl WorkloadKind {
    /// Name used in user facing messages, e.g. `daemon set "x" not found`.
    pub fn display_name(self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "deployment",
            WorkloadKind::DaemonSet => "daemon set",
            WorkloadKind::StatefulSet => "stateful set",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkloadKind::Deployment => "deployment",
            WorkloadKind::DaemonSet => "daemonset",
            WorkloadKind::StatefulSet => "statefulset",
        };
        f.write_str(s)
    }
}

impl FromStr for WorkloadKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deployment" | "deployments" | "deploy" => Ok(WorkloadKind::Deployment),
            "daemonset" | "daemonsets" | "ds" => Ok(WorkloadKind::DaemonSet),
            "statefulset" | "statefulsets" | "sts" => Ok(WorkloadKind::StatefulSet),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadReference {
    pub kind: WorkloadKind,
    pub name: String,
    pub namespace: String,
}

/// Positional resource argument, `kind=name` or `kind/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub kind: String,
    pub name: String,
}

/// Validated filter for a single request against the log exploration api.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub namespace: Option<String>,
    pub podname: Option<String>,
    pub tail: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub level: Option<String>,
    pub limit: Option<Limit>,
    pub workload: Option<WorkloadReference>,
}

/// Body returned by `/logs/filter`.
#[derive(Debug, Default, Deserialize)]
pub struct LogResponse {
    #[serde(rename = "Logs", default)]
    pub logs: Vec<String>,
}

impl LogQuery {
    /// Narrow the query to the pods selected by a workload. Replaces any pod name
    /// given on the command line.
    pub fn with_resolved_pods(mut self, pods: &[String]) -> Self {
        self.podname = Some(pods.join(",")).filter(|p| !p.is_empty());
        self
    }
}
