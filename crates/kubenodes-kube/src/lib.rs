//! # kubenodes-kube
//!
//! [`NodeSource`] backed by the Kubernetes API through `kube`.
//!
//! The client is built from the ambient environment: the kubeconfig file
//! (optionally a named context) or the in-cluster service account.
//! Credentials are whatever that environment already provides.

#![deny(unsafe_code)]

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::api::{Api, ListParams};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use kubenodes_core::{NodeSource, SourceError};
use tracing::{debug, warn};

/// Lists nodes from the API server of the configured cluster.
#[derive(Clone)]
pub struct KubeNodeSource {
    client: Client,
}

impl KubeNodeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the kubeconfig `context`, or infer the
    /// configuration (current context, then in-cluster) when `None`.
    pub async fn connect(context: Option<&str>) -> Result<Self, SourceError> {
        let config = match context {
            Some(context) => {
                debug!(context, "loading kubeconfig context");
                let options = KubeConfigOptions {
                    context: Some(context.to_string()),
                    ..KubeConfigOptions::default()
                };
                Config::from_kubeconfig(&options)
                    .await
                    .map_err(|e| SourceError::Config(e.to_string()))?
            }
            None => Config::infer()
                .await
                .map_err(|e| SourceError::Config(e.to_string()))?,
        };
        let client = Client::try_from(config).map_err(classify)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl NodeSource for KubeNodeSource {
    async fn list_nodes(&self, label_selector: Option<&str>) -> Result<Vec<Node>, SourceError> {
        let api: Api<Node> = Api::all(self.client.clone());
        let mut params = ListParams::default();
        if let Some(selector) = label_selector {
            params = params.labels(selector);
        }
        let list = api.list(&params).await.map_err(|e| {
            let err = classify(e);
            warn!(kind = err.error_kind(), error = %err, "node list failed");
            err
        })?;
        debug!(count = list.items.len(), "listed nodes");
        Ok(list.items)
    }
}

/// Map a `kube` client error onto [`SourceError`].
pub fn classify(err: kube::Error) -> SourceError {
    match err {
        kube::Error::Api(response) => SourceError::from_status(response.code, response.message),
        kube::Error::Auth(e) => SourceError::Authentication(e.to_string()),
        kube::Error::InferConfig(e) => SourceError::Config(e.to_string()),
        other => SourceError::Transport(other.to_string()),
    }
}
