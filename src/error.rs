use thiserror::Error;

use crate::types::WorkloadKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("incorrect \"limit\" value entered, an integer value between 0 and 1000 is required")]
    InvalidLimit,

    #[error("only one of {0} may be given")]
    ConflictingWorkloads(String),

    #[error("unsupported resource '{0}', expected deployment, daemonset, statefulset or pod")]
    UnsupportedResource(String),

    #[error("{} \"{name}\" not found in namespace \"{namespace}\"", .kind.display_name())]
    WorkloadNotFound {
        kind: WorkloadKind,
        name: String,
        namespace: String,
    },

    #[error("kubernetes api request failed: {0}")]
    Kube(#[from] kube::Error),

    #[error("log exploration api request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("log exploration api returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("invalid api url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(
        "could not determine the log exploration api url; pass --api-url or set LOG_EXPLORATION_API_URL"
    )]
    ApiUrlNotFound,

    #[error("no logs present, or input parameters were invalid")]
    NoLogs,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
