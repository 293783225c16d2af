//! Resource catalog
//!
//! The catalog stands in for the cloud API the completion providers query.
//! [`InMemoryCatalog`] serves fixed data after a configurable delay so the
//! background population path behaves like it would against a real service.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kinds of resources the catalog lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Environment,
    Cluster,
    Topic,
    ServiceAccount,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Environment => "environment",
            ResourceKind::Cluster => "Kafka cluster",
            ResourceKind::Topic => "topic",
            ResourceKind::ServiceAccount => "service account",
        };
        f.write_str(name)
    }
}

/// A listed resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Source of resource listings
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>>;
}

/// Catalog backed by fixed data
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    environments: Vec<Resource>,
    clusters: Vec<Resource>,
    topics: Vec<Resource>,
    service_accounts: Vec<Resource>,
    latency: Duration,
}

impl InMemoryCatalog {
    /// Empty catalog answering immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with a small demo organisation
    pub fn sample(latency: Duration) -> Self {
        Self::new()
            .with(ResourceKind::Environment, Resource::new("env-a1b2c", "production"))
            .with(ResourceKind::Environment, Resource::new("env-d3e4f", "staging"))
            .with(ResourceKind::Cluster, Resource::new("lkc-12345", "orders"))
            .with(ResourceKind::Cluster, Resource::new("lkc-67890", "analytics"))
            .with(ResourceKind::Topic, Resource::new("orders.created", "orders"))
            .with(ResourceKind::Topic, Resource::new("orders.shipped", "orders"))
            .with(ResourceKind::Topic, Resource::new("clickstream", "analytics"))
            .with(ResourceKind::ServiceAccount, Resource::new("sa-0a1b2", "ci-deployer"))
            .with(ResourceKind::ServiceAccount, Resource::new("sa-3c4d5", "connect-worker"))
            .with_latency(latency)
    }

    pub fn with(mut self, kind: ResourceKind, resource: Resource) -> Self {
        self.bucket_mut(kind).push(resource);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn bucket(&self, kind: ResourceKind) -> &Vec<Resource> {
        match kind {
            ResourceKind::Environment => &self.environments,
            ResourceKind::Cluster => &self.clusters,
            ResourceKind::Topic => &self.topics,
            ResourceKind::ServiceAccount => &self.service_accounts,
        }
    }

    fn bucket_mut(&mut self, kind: ResourceKind) -> &mut Vec<Resource> {
        match kind {
            ResourceKind::Environment => &mut self.environments,
            ResourceKind::Cluster => &mut self.clusters,
            ResourceKind::Topic => &mut self.topics,
            ResourceKind::ServiceAccount => &mut self.service_accounts,
        }
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        tracing::trace!(%kind, "catalog listing");
        Ok(self.bucket(kind).clone())
    }
}
