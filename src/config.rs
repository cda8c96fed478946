//! Resolution of the log exploration API endpoint.
//!
//! An explicit `--api-url` (or `LOG_EXPLORATION_API_URL`) wins; otherwise the
//! OpenShift route exposing the API is looked up in the cluster. When the
//! route cannot be read, its default host is derived from the API server
//! host (`api.<domain>` becomes `<route>-<namespace>.apps.<domain>`).

use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::kubernetes::ClusterApi;
use crate::request::filter_url;

/// Namespace the log exploration API is deployed to.
pub const API_ROUTE_NAMESPACE: &str = "openshift-logging";

/// Name of the route exposing the log exploration API.
pub const API_ROUTE_NAME: &str = "log-exploration-api-route";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Full url of the `/logs/filter` endpoint
    pub api_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    pub async fn resolve<C: ClusterApi>(cli: &Cli, cluster: &C) -> Result<Self> {
        let root = match cli.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => parse_api_url(url)?,
            None => discover_api_url(cluster).await?,
        };
        let api_url = filter_url(&root)?;
        debug!("Using log exploration api at {}", api_url);
        Ok(Self {
            api_url,
            timeout: Duration::from_secs(cli.timeout),
        })
    }
}

/// Parse a user supplied url, assuming http when no scheme is given.
fn parse_api_url(url: &str) -> Result<Url> {
    let url = url.trim();
    let with_scheme = if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };
    Url::parse(&with_scheme).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Default host of the API route for a cluster whose API server is `api.<domain>`.
pub fn route_host_from_cluster(cluster_host: &str) -> Option<String> {
    let domain = cluster_host.strip_prefix("api.")?;
    if domain.is_empty() {
        return None;
    }
    Some(format!(
        "{}-{}.apps.{}",
        API_ROUTE_NAME, API_ROUTE_NAMESPACE, domain
    ))
}

async fn discover_api_url<C: ClusterApi>(cluster: &C) -> Result<Url> {
    let (host, tls) = match cluster
        .route_host(API_ROUTE_NAMESPACE, API_ROUTE_NAME)
        .await?
    {
        Some(route) => {
            info!(
                "Discovered route {}/{} at {}",
                API_ROUTE_NAMESPACE, API_ROUTE_NAME, route.host
            );
            (route.host, route.tls)
        }
        None => {
            let host = cluster
                .cluster_host()
                .and_then(route_host_from_cluster)
                .ok_or(Error::ApiUrlNotFound)?;
            warn!(
                "Route {}/{} not readable, assuming {}",
                API_ROUTE_NAMESPACE, API_ROUTE_NAME, host
            );
            (host, false)
        }
    };
    let scheme = if tls { "https" } else { "http" };
    Url::parse(&format!("{}://{}/", scheme, host)).map_err(|source| Error::InvalidUrl {
        url: host,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::KubeCluster;
    use crate::kubernetes::fake::FakeCluster;
    use axum::http::StatusCode;
    use axum::{Json, Router};
    use clap::Parser;
    use serde_json::json;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["kubectl-historical-logs"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_explicit_url_wins() {
        let cluster = FakeCluster::default().with_route(
            API_ROUTE_NAMESPACE,
            API_ROUTE_NAME,
            "route.example.com",
            false,
        );
        let config = ApiConfig::resolve(
            &cli(&["--api-url", "http://localhost:8080", "--timeout", "5"]),
            &cluster,
        )
        .await
        .unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/logs/filter");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_url_without_scheme() {
        let config = ApiConfig::resolve(
            &cli(&["--api-url", "log-exploration-api-route-openshift-logging.apps.com"]),
            &FakeCluster::default(),
        )
        .await
        .unwrap();
        assert_eq!(
            config.api_url.as_str(),
            "http://log-exploration-api-route-openshift-logging.apps.com/logs/filter"
        );
    }

    #[tokio::test]
    async fn test_discovers_route() {
        let cluster = FakeCluster::default().with_route(
            API_ROUTE_NAMESPACE,
            API_ROUTE_NAME,
            "logs.apps.example.com",
            true,
        );
        let config = ApiConfig::resolve(&cli(&["--api-url", ""]), &cluster)
            .await
            .unwrap();
        assert_eq!(
            config.api_url.as_str(),
            "https://logs.apps.example.com/logs/filter"
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_missing_route() {
        let err = ApiConfig::resolve(&cli(&["--api-url", ""]), &FakeCluster::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ApiUrlNotFound));
    }

    #[tokio::test]
    async fn test_missing_route_uses_cluster_domain() {
        let cluster =
            FakeCluster::default().with_cluster_host("api.ci.devcluster.openshift.com");
        let config = ApiConfig::resolve(&cli(&["--api-url", ""]), &cluster)
            .await
            .unwrap();
        assert_eq!(
            config.api_url.as_str(),
            "http://log-exploration-api-route-openshift-logging.apps.ci.devcluster.openshift.com\
             /logs/filter"
        );
    }

    #[tokio::test]
    async fn test_missing_route_on_plain_cluster() {
        let cluster = FakeCluster::default().with_cluster_host("10.0.0.1");
        let err = ApiConfig::resolve(&cli(&["--api-url", ""]), &cluster)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ApiUrlNotFound));
    }

    #[tokio::test]
    async fn test_forbidden_route_uses_cluster_domain() {
        let app = Router::new().fallback(|| async {
            let status = json!({
                "kind": "Status",
                "apiVersion": "v1",
                "metadata": {},
                "status": "Failure",
                "message": "routes.route.openshift.io \"log-exploration-api-route\" is forbidden",
                "reason": "Forbidden",
                "code": 403
            });
            (StatusCode::FORBIDDEN, Json(status))
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let kube_config = kube::Config::new(format!("http://{}", addr).parse().unwrap());
        let client = kube::Client::try_from(kube_config).unwrap();
        let cluster = KubeCluster::new(client, Some("api.example.com".to_string()));

        let config = ApiConfig::resolve(&cli(&["--api-url", ""]), &cluster)
            .await
            .unwrap();
        assert_eq!(
            config.api_url.as_str(),
            "http://log-exploration-api-route-openshift-logging.apps.example.com/logs/filter"
        );
    }

    #[test]
    fn test_route_host_from_cluster() {
        assert_eq!(
            route_host_from_cluster("api.example.com").as_deref(),
            Some("log-exploration-api-route-openshift-logging.apps.example.com")
        );
        assert_eq!(route_host_from_cluster("api."), None);
        assert_eq!(route_host_from_cluster("kubernetes.default.svc"), None);
    }
}
