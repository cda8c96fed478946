use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::{Api, ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::{Client, ResourceExt};
use std::fmt::Debug;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::{WorkloadKind, WorkloadReference};
use crate::utils::selector_to_labels_string;

/// External host of an OpenShift route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHost {
    pub host: String,
    pub tls: bool,
}

/// Read-only view of the cluster needed to resolve workloads and the API route.
pub trait ClusterApi {
    /// Selector of the named workload, or `None` if it does not exist.
    async fn workload_selector(
        &self,
        kind: WorkloadKind,
        name: &str,
        namespace: &str,
    ) -> Result<Option<LabelSelector>>;

    /// Names of the pods in `namespace` matching `selector`.
    async fn list_pod_names(&self, namespace: &str, selector: &LabelSelector)
    -> Result<Vec<String>>;

    /// Host of the named OpenShift route, or `None` if it does not exist or
    /// cannot be read.
    async fn route_host(&self, namespace: &str, name: &str) -> Result<Option<RouteHost>>;

    /// Host name of the cluster API server, e.g. `api.example.com`.
    fn cluster_host(&self) -> Option<&str>;
}

/// Names of the pods currently selected by `workload`.
pub async fn resolve_workload_pods<C: ClusterApi>(
    cluster: &C,
    workload: &WorkloadReference,
) -> Result<Vec<String>> {
    let selector = cluster
        .workload_selector(workload.kind, &workload.name, &workload.namespace)
        .await?
        .ok_or_else(|| Error::WorkloadNotFound {
            kind: workload.kind,
            name: workload.name.clone(),
            namespace: workload.namespace.clone(),
        })?;

    if selector_to_labels_string(&selector).is_none() {
        debug!(
            "Selector for {}/{} is empty or unsupported; no pods selected",
            workload.kind, workload.name
        );
        return Ok(Vec::new());
    }

    let mut pods = cluster
        .list_pod_names(&workload.namespace, &selector)
        .await?;
    pods.sort();
    info!(
        "Resolved {}/{} in namespace {} to {} pod(s)",
        workload.kind,
        workload.name,
        workload.namespace,
        pods.len()
    );
    Ok(pods)
}

trait HasSelector {
    fn get_selector(&self) -> Option<&LabelSelector>;
}

impl HasSelector for Deployment {
    fn get_selector(&self) -> Option<&LabelSelector> {
        self.spec.as_ref().map(|s| &s.selector)
    }
}

impl HasSelector for StatefulSet {
    fn get_selector(&self) -> Option<&LabelSelector> {
        self.spec.as_ref().map(|s| &s.selector)
    }
}

impl HasSelector for DaemonSet {
    fn get_selector(&self) -> Option<&LabelSelector> {
        self.spec.as_ref().map(|s| &s.selector)
    }
}

async fn get_selector_generic<T>(
    client: &Client,
    name: &str,
    namespace: &str,
) -> Result<Option<LabelSelector>>
where
    T: k8s_openapi::Resource<Scope = k8s_openapi::NamespaceResourceScope>
        + k8s_openapi::Metadata<Ty = k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta>
        + HasSelector
        + serde::de::DeserializeOwned
        + Clone
        + Debug,
{
    let api: Api<T> = Api::namespaced(client.clone(), namespace);
    let res = api.get_opt(name).await?;
    // A workload without a spec selects nothing
    Ok(res.map(|r| r.get_selector().cloned().unwrap_or_default()))
}

const ROUTE_GROUP: &str = "route.openshift.io";

/// Cluster reached through the active kubeconfig context.
#[derive(Clone)]
pub struct KubeCluster {
    pub client: Client,
    pub cluster_host: Option<String>,
}

impl KubeCluster {
    pub fn new(client: Client, cluster_host: Option<String>) -> Self {
        Self {
            client,
            cluster_host,
        }
    }
}

impl ClusterApi for KubeCluster {
    async fn workload_selector(
        &self,
        kind: WorkloadKind,
        name: &str,
        namespace: &str,
    ) -> Result<Option<LabelSelector>> {
        debug!("Looking up {} {} in namespace {}", kind, name, namespace);
        match kind {
            WorkloadKind::Deployment => {
                get_selector_generic::<Deployment>(&self.client, name, namespace).await
            }
            WorkloadKind::DaemonSet => {
                get_selector_generic::<DaemonSet>(&self.client, name, namespace).await
            }
            WorkloadKind::StatefulSet => {
                get_selector_generic::<StatefulSet>(&self.client, name, namespace).await
            }
        }
    }

    async fn list_pod_names(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<Vec<String>> {
        let Some(labels) = selector_to_labels_string(selector) else {
            return Ok(Vec::new());
        };
        debug!("Listing pods in {} with selector {}", namespace, labels);
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pods = api.list(&ListParams::default().labels(&labels)).await?;
        Ok(pods.items.iter().map(|p| p.name_any()).collect())
    }

    async fn route_host(&self, namespace: &str, name: &str) -> Result<Option<RouteHost>> {
        let gvk = GroupVersionKind::gvk(ROUTE_GROUP, "v1", "Route");
        let ar = ApiResource::from_gvk(&gvk);
        let api: Api<DynamicObject> = Api::namespaced_with(self.client.clone(), namespace, &ar);
        // get_opt maps a 404 to None, which also covers clusters without the route api
        let route = match api.get_opt(name).await {
            Ok(route) => route,
            Err(kube::Error::Api(err)) if err.code == 403 => {
                warn!(
                    "Not allowed to read route {}/{}: {}",
                    namespace, name, err.message
                );
                None
            }
            Err(e) => return Err(e.into()),
        };
        Ok(route.and_then(|r| {
            let spec = r.data.get("spec")?;
            let host = spec.get("host")?.as_str()?.to_string();
            let tls = spec.get("tls").is_some_and(|t| !t.is_null());
            Some(RouteHost { host, tls })
        }))
    }

    fn cluster_host(&self) -> Option<&str> {
        self.cluster_host.as_deref()
    }
}
