//! Validation of user supplied filters into a [`LogQuery`].

use tracing::debug;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::types::{Limit, LogQuery, WorkloadKind, WorkloadReference};
use crate::utils::parse_resource_spec;

/// Filter inputs exactly as the user typed them.
#[derive(Debug, Clone, Default)]
pub struct LogParameters {
    pub namespace: Option<String>,
    pub podname: Option<String>,
    pub tail: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub level: Option<String>,
    pub limit: Option<String>,
    pub deployment: Option<String>,
    pub daemonset: Option<String>,
    pub statefulset: Option<String>,
    pub resource: Option<String>,
}

impl From<&Cli> for LogParameters {
    fn from(cli: &Cli) -> Self {
        Self {
            namespace: cli.namespace.clone(),
            podname: cli.podname.clone(),
            tail: cli.tail.clone(),
            start_time: cli.start_time.clone(),
            end_time: cli.end_time.clone(),
            level: cli.level.clone(),
            limit: cli.limit.clone(),
            deployment: cli.deployment.clone(),
            daemonset: cli.daemonset.clone(),
            statefulset: cli.statefulset.clone(),
            resource: cli.resource.clone(),
        }
    }
}

/// Parse a limit string. Accepts integers in `0..=1000`.
pub fn parse_limit(value: &str) -> Result<Limit> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|v| u16::try_from(v).ok())
        .and_then(Limit::new)
        .ok_or(Error::InvalidLimit)
}

/// Like [`parse_limit`], but an absent or blank value means no limit was given.
pub fn parse_optional_limit(value: Option<&str>) -> Result<Option<Limit>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_limit(v).map(Some),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl LogQuery {
    /// Validate `params`. Workloads are looked up in `--namespace` when given,
    /// otherwise in `default_namespace`.
    pub fn resolve(params: LogParameters, default_namespace: &str) -> Result<Self> {
        let limit = parse_optional_limit(params.limit.as_deref())?;
        let namespace = non_empty(params.namespace);
        let mut podname = non_empty(params.podname);

        let mut selected: Vec<(WorkloadKind, String)> = [
            (WorkloadKind::Deployment, params.deployment),
            (WorkloadKind::DaemonSet, params.daemonset),
            (WorkloadKind::StatefulSet, params.statefulset),
        ]
        .into_iter()
        .filter_map(|(kind, name)| non_empty(name).map(|n| (kind, n)))
        .collect();

        if let Some(resource) = non_empty(params.resource) {
            let spec = parse_resource_spec(&resource)?;
            if spec.kind.eq_ignore_ascii_case("pod") || spec.kind.eq_ignore_ascii_case("pods") {
                if podname.is_some() {
                    return Err(Error::ConflictingWorkloads(
                        "--podname and a pod resource".to_string(),
                    ));
                }
                podname = Some(spec.name);
            } else {
                let kind = spec
                    .kind
                    .parse::<WorkloadKind>()
                    .map_err(|_| Error::UnsupportedResource(resource.clone()))?;
                selected.push((kind, spec.name));
            }
        }

        if selected.len() > 1 {
            return Err(Error::ConflictingWorkloads(
                "--deployment, --daemonset, --statefulset or a workload resource".to_string(),
            ));
        }

        let workload = selected.pop().map(|(kind, name)| WorkloadReference {
            kind,
            name,
            namespace: namespace
                .clone()
                .unwrap_or_else(|| default_namespace.to_string()),
        });

        let query = LogQuery {
            namespace,
            podname,
            tail: non_empty(params.tail),
            start_time: non_empty(params.start_time),
            end_time: non_empty(params.end_time),
            level: non_empty(params.level),
            limit,
            workload,
        };
        debug!("Resolved log query: {:?}", query);
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit_in_range() {
        for value in ["0", "1", "5", "999", "1000", " 42 "] {
            assert!(parse_limit(value).is_ok(), "limit {value} should be accepted");
        }
        assert_eq!(parse_limit("5").unwrap().get(), 5);
    }

    #[test]
    fn test_parse_limit_rejected() {
        for value in ["-1", "-5", "1001", "65536", "abc", "5.0", "", "1e3"] {
            let err = parse_limit(value).unwrap_err();
            assert!(matches!(err, Error::InvalidLimit), "limit {value:?}");
        }
    }

    #[test]
    fn test_invalid_limit_message() {
        assert_eq!(
            parse_limit("-2").unwrap_err().to_string(),
            "incorrect \"limit\" value entered, an integer value between 0 and 1000 is required"
        );
    }

    #[test]
    fn test_parse_optional_limit_blank() {
        assert_eq!(parse_optional_limit(None).unwrap(), None);
        assert_eq!(parse_optional_limit(Some("  ")).unwrap(), None);
        assert!(parse_optional_limit(Some("0")).unwrap().unwrap().is_unlimited());
    }

    #[test]
    fn test_resolve_no_parameters() {
        let query = LogQuery::resolve(LogParameters::default(), "default").unwrap();
        assert_eq!(query, LogQuery::default());
    }

    #[test]
    fn test_resolve_passes_fields_through() {
        let params = LogParameters {
            namespace: Some("openshift-logging".to_string()),
            podname: Some("openshift-logging-1234".to_string()),
            tail: Some("30m".to_string()),
            level: Some("error".to_string()),
            start_time: Some(String::new()),
            limit: Some("5".to_string()),
            ..Default::default()
        };
        let query = LogQuery::resolve(params, "default").unwrap();
        assert_eq!(query.namespace.as_deref(), Some("openshift-logging"));
        assert_eq!(query.podname.as_deref(), Some("openshift-logging-1234"));
        assert_eq!(query.tail.as_deref(), Some("30m"));
        assert_eq!(query.level.as_deref(), Some("error"));
        assert_eq!(query.start_time, None);
        assert_eq!(query.limit.map(Limit::get), Some(5));
        assert!(query.workload.is_none());
    }

    #[test]
    fn test_resolve_rejects_negative_limit() {
        let params = LogParameters {
            limit: Some("-5".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            LogQuery::resolve(params, "default"),
            Err(Error::InvalidLimit)
        ));
    }

    #[test]
    fn test_resolve_workload_flag_uses_namespace() {
        let params = LogParameters {
            namespace: Some("openshift-logging".to_string()),
            daemonset: Some("collector".to_string()),
            ..Default::default()
        };
        let query = LogQuery::resolve(params, "default").unwrap();
        assert_eq!(
            query.workload,
            Some(WorkloadReference {
                kind: WorkloadKind::DaemonSet,
                name: "collector".to_string(),
                namespace: "openshift-logging".to_string(),
            })
        );
    }

    #[test]
    fn test_resolve_workload_defaults_namespace() {
        let params = LogParameters {
            resource: Some("deployment=openshift-deployment".to_string()),
            ..Default::default()
        };
        let query = LogQuery::resolve(params, "my-project").unwrap();
        let workload = query.workload.unwrap();
        assert_eq!(workload.kind, WorkloadKind::Deployment);
        assert_eq!(workload.name, "openshift-deployment");
        assert_eq!(workload.namespace, "my-project");
        assert_eq!(query.namespace, None);
    }

    #[test]
    fn test_resolve_pod_resource() {
        let params = LogParameters {
            resource: Some("pod/my-pod".to_string()),
            ..Default::default()
        };
        let query = LogQuery::resolve(params, "default").unwrap();
        assert_eq!(query.podname.as_deref(), Some("my-pod"));
        assert!(query.workload.is_none());
    }

    #[test]
    fn test_resolve_conflicting_workloads() {
        let params = LogParameters {
            statefulset: Some("db".to_string()),
            resource: Some("deployment/app".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            LogQuery::resolve(params, "default"),
            Err(Error::ConflictingWorkloads(_))
        ));
    }

    #[test]
    fn test_resolve_unsupported_resource() {
        let params = LogParameters {
            resource: Some("job/backup".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            LogQuery::resolve(params, "default"),
            Err(Error::UnsupportedResource(_))
        ));
    }
}
