mod cli;
mod config;
mod error;
mod kubernetes;
mod output;
mod params;
mod request;
mod types;
mod utils;

use anyhow::Context;
use clap::Parser;
use kube::{Client, config as kubeconfig};
use tracing::{debug, info, warn};

use cli::Cli;
use config::ApiConfig;
use kubernetes::{ClusterApi, KubeCluster, resolve_workload_pods};
use params::LogParameters;
use request::LogsClient;
use types::LogQuery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Reject bad input before talking to any API
    let params = LogParameters::from(&cli);
    params::parse_optional_limit(params.limit.as_deref())?;

    let cluster = initialize_cluster(cli.context.as_deref()).await?;
    let query = LogQuery::resolve(params, cluster.client.default_namespace())?;

    let api = ApiConfig::resolve(&cli, &cluster).await?;
    let logs_client = LogsClient::new(api.api_url, api.timeout)?;

    let logs = fetch_logs(&cluster, &logs_client, query)
        .await
        .with_context(|| format!("Failed to fetch logs from {}", logs_client.base()))?;

    let mut stdout = std::io::stdout().lock();
    let printed = output::print_logs(&mut stdout, &logs, cli.limit.as_deref().unwrap_or(""))?;
    debug!("Printed {} of {} log line(s)", printed, logs.len());
    Ok(())
}

async fn initialize_cluster(context: Option<&str>) -> anyhow::Result<KubeCluster> {
    let config = match context {
        Some(ctx) => kubeconfig::Config::from_kubeconfig(&kubeconfig::KubeConfigOptions {
            context: Some(ctx.to_string()),
            ..Default::default()
        })
        .await
        .map_err(|e| anyhow::anyhow!("Context '{}' not found in kubeconfig: {}", ctx, e))?,
        None => kubeconfig::Config::infer()
            .await
            .context("Failed to load kubeconfig")?,
    };
    info!(
        "Using cluster {} (namespace {})",
        config.cluster_url, config.default_namespace
    );
    let cluster_host = config.cluster_url.host().map(str::to_string);
    Ok(KubeCluster::new(Client::try_from(config)?, cluster_host))
}

/// Resolve the query's workload, if any, and fetch the matching log lines.
async fn fetch_logs<C: ClusterApi>(
    cluster: &C,
    logs_client: &LogsClient,
    mut query: LogQuery,
) -> error::Result<Vec<String>> {
    if let Some(workload) = query.workload.clone() {
        if query.podname.is_some() {
            warn!(
                "Both a pod name and {}/{} were given; using the pods of {}",
                workload.kind, workload.name, workload.kind
            );
        }
        let pods = resolve_workload_pods(cluster, &workload).await?;
        if pods.is_empty() {
            warn!(
                "{}/{} in namespace {} has no pods",
                workload.kind, workload.name, workload.namespace
            );
            return Ok(Vec::new());
        }
        query = query.with_resolved_pods(&pods);
    }
    logs_client.fetch(&query).await
}
