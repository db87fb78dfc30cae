//! Wire types for the cluster monitoring REST API.
//!
//! Field names match the backend's JSON tags exactly; these structs are the
//! single source of truth for what the dashboard can display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for registering a new cluster endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClusterRequest {
    pub name: String,
    pub api_endpoint: String,
    pub username: String,
    pub password: String,
}

/// A registered cluster as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub api_endpoint: String,
    pub status: String,
    pub proxmox_version: String,
    pub node_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response of `GET /api/v1/clusters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterList {
    pub clusters: Vec<Cluster>,
    pub total: u64,
}

/// A single physical disk on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub device: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub model: String,
    pub serial: String,
    pub vendor: String,
    /// SSD wear indicator; -1 when the device does not report one.
    pub wearout: i32,
    pub health: String,
    pub used: String,
}

/// Disk inventory of one node, with a per-node error when the node could
/// not be queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDisks {
    pub node_name: String,
    pub status: String,
    pub disks: Vec<Disk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `GET /api/v1/clusters/{id}/disks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDisks {
    pub cluster_id: String,
    pub cluster_name: String,
    pub nodes: Vec<NodeDisks>,
    pub total_disks: u64,
}

/// Live health of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub node_name: String,
    pub status: String,
    /// CPU usage percentage (0-100).
    pub cpu_usage: f64,
    /// Memory in bytes.
    pub memory_used: u64,
    pub memory_total: u64,
    /// Memory usage percentage (0-100).
    pub memory_usage: f64,
    /// Swap in bytes.
    pub swap_used: u64,
    pub swap_total: u64,
    /// Swap usage percentage (0-100).
    pub swap_usage: f64,
    /// Uptime in seconds.
    pub uptime: u64,
    /// Load average [1min, 5min, 15min].
    pub load_avg: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate VM/container counts across the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub total_vms: u32,
    pub running_vms: u32,
    pub total_containers: u32,
    pub running_containers: u32,
}

/// Response of `GET /api/v1/clusters/{id}/status`. The resource the
/// polling controller tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterStatus {
    pub cluster_id: String,
    pub cluster_name: String,
    pub nodes: Vec<NodeStatus>,
    pub resource_summary: ResourceSummary,
    pub fetched_at: DateTime<Utc>,
}

/// Error envelope the backend returns with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
}
