//! Node list query.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use parking_lot::Mutex;

use crate::errors::SourceError;

/// Control-plane client capable of listing nodes.
#[async_trait]
pub trait NodeSource: Send + Sync {
    /// List every current node, filtered by `label_selector` when given.
    ///
    /// Performs exactly one query; no retries.
    async fn list_nodes(&self, label_selector: Option<&str>) -> Result<Vec<Node>, SourceError>;
}

/// Node source returning a fixed node list, or a fixed error.
///
/// Records every selector it was queried with.
pub struct StaticNodeSource {
    result: Result<Vec<Node>, SourceError>,
    selectors: Mutex<Vec<Option<String>>>,
}

impl StaticNodeSource {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            result: Ok(nodes),
            selectors: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            result: Err(error),
            selectors: Mutex::new(Vec::new()),
        }
    }

    /// Selectors passed to each `list_nodes` call, in call order.
    pub fn selectors(&self) -> Vec<Option<String>> {
        self.selectors.lock().clone()
    }
}

#[async_trait]
impl NodeSource for StaticNodeSource {
    async fn list_nodes(&self, label_selector: Option<&str>) -> Result<Vec<Node>, SourceError> {
        self.selectors.lock().push(label_selector.map(str::to_string));
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::NodeBuilder;

    #[tokio::test]
    async fn static_source_records_selectors() {
        let source = StaticNodeSource::new(vec![NodeBuilder::new("n1").build()]);
        let nodes = source.list_nodes(Some("disktype=ssd")).await.unwrap();
        assert_eq!(nodes.len(), 1);
        let _ = source.list_nodes(None).await.unwrap();
        assert_eq!(
            source.selectors(),
            vec![Some("disktype=ssd".to_string()), None]
        );
    }

    #[tokio::test]
    async fn failing_source_returns_error() {
        let source = StaticNodeSource::failing(SourceError::Transport("refused".into()));
        let err = source.list_nodes(None).await.unwrap_err();
        assert_eq!(err.error_kind(), "transport_error");
    }
}
