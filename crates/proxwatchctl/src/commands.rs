//! One handler per subcommand.

use anyhow::{bail, Context, Result};
use proxwatch_api::types::RegisterClusterRequest;
use proxwatch_api::ApiClient;
use tracing::debug;

use crate::display;

pub async fn list(client: &ApiClient, json: bool) -> Result<()> {
    let clusters = client
        .list_clusters()
        .await
        .context("failed to list clusters")?;
    debug!(total = clusters.total, "listed clusters");
    if json {
        println!("{}", serde_json::to_string_pretty(&clusters)?);
    } else {
        display::print_cluster_list(&clusters);
    }
    Ok(())
}

pub async fn register(
    client: &ApiClient,
    name: String,
    api_endpoint: String,
    username: String,
    password: String,
) -> Result<()> {
    let request = RegisterClusterRequest {
        name,
        api_endpoint,
        username,
        password,
    };
    let cluster = client
        .register_cluster(&request)
        .await
        .context("failed to register cluster")?;
    debug!(id = %cluster.id, "cluster registered");
    println!("Registered cluster {} ({})", cluster.name, cluster.id);
    Ok(())
}

pub async fn show(client: &ApiClient, id: &str) -> Result<()> {
    let cluster = client
        .cluster(id)
        .await
        .with_context(|| format!("failed to fetch cluster {id}"))?;
    display::print_cluster(&cluster);
    Ok(())
}

pub async fn delete(client: &ApiClient, id: &str, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete without --yes");
    }
    client
        .delete_cluster(id)
        .await
        .with_context(|| format!("failed to delete cluster {id}"))?;
    debug!(id, "cluster deleted");
    println!("Deleted cluster {id}");
    Ok(())
}

pub async fn disks(client: &ApiClient, id: &str) -> Result<()> {
    let disks = client
        .cluster_disks(id)
        .await
        .with_context(|| format!("failed to fetch disks for cluster {id}"))?;
    display::print_disks(&disks);
    Ok(())
}

pub async fn status(client: &ApiClient, id: &str, json: bool) -> Result<()> {
    let status = client
        .cluster_status(id)
        .await
        .with_context(|| format!("failed to fetch status for cluster {id}"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        display::print_status(Some(&status), None, None);
    }
    Ok(())
}
