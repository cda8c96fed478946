use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::ResourceSpec;

/// Parse a resource argument of the form `kind=name` or `kind/name`.
/// A bare name refers to a pod.
pub fn parse_resource_spec(s: &str) -> Result<ResourceSpec> {
    let s = s.trim();
    let (kind, name) = match s.split_once(['=', '/']) {
        Some((kind, name)) => (kind.trim(), name.trim()),
        None => ("pod", s),
    };
    if kind.is_empty() || name.is_empty() || name.contains(['=', '/']) {
        return Err(Error::UnsupportedResource(s.to_string()));
    }
    Ok(ResourceSpec {
        kind: kind.to_string(),
        name: name.to_string(),
    })
}

/// Convert a LabelSelector to the string form accepted by the list API.
/// Returns `None` for a selector without any requirements, or one using an
/// operator that cannot be expressed; such a selector must match nothing.
pub fn selector_to_labels_string(selector: &LabelSelector) -> Option<String> {
    let mut parts: Vec<String> = selector
        .match_labels
        .iter()
        .flatten()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    for expr in selector.match_expressions.iter().flatten() {
        let values = expr.values.as_deref().unwrap_or_default().join(",");
        match expr.operator.as_str() {
            "In" => parts.push(format!("{} in ({})", expr.key, values)),
            "NotIn" => parts.push(format!("{} notin ({})", expr.key, values)),
            "Exists" => parts.push(expr.key.clone()),
            "DoesNotExist" => parts.push(format!("!{}", expr.key)),
            op => {
                warn!("Unsupported operator '{}' for label '{}' in selector", op, expr.key);
                return None;
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}
