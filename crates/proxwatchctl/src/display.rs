//! Terminal rendering for cluster data.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use proxwatch_api::types::{Cluster, ClusterDisks, ClusterList, ClusterStatus, NodeStatus};
use proxwatch_api::ApiError;

/// Color a cluster or node status string.
pub fn status_badge(status: &str) -> String {
    match status {
        "online" | "connected" => format!("{}", status.green()),
        "offline" | "error" | "disconnected" => format!("{}", status.red()),
        _ => format!("{}", status.yellow()),
    }
}

/// Color a usage percentage by pressure.
pub fn usage_cell(percent: f64) -> String {
    let text = format!("{percent:5.1}%");
    if percent < 70.0 {
        format!("{}", text.green())
    } else if percent < 90.0 {
        format!("{}", text.yellow())
    } else {
        format!("{}", text.red())
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

pub fn print_cluster_list(list: &ClusterList) {
    if list.clusters.is_empty() {
        println!("No clusters registered.");
        return;
    }
    println!(
        "{:<38} {:<20} {:<12} {:<10} {:>5}",
        "ID".bold(),
        "NAME".bold(),
        "STATUS".bold(),
        "VERSION".bold(),
        "NODES".bold()
    );
    for cluster in &list.clusters {
        println!(
            "{:<38} {:<20} {:<12} {:<10} {:>5}",
            cluster.id,
            cluster.name,
            status_badge(&cluster.status),
            cluster.proxmox_version,
            cluster.node_count
        );
    }
    println!("\n{} cluster(s)", list.total);
}

pub fn print_cluster(cluster: &Cluster) {
    println!("{}", cluster.name.bold());
    println!("  id:              {}", cluster.id);
    println!("  endpoint:        {}", cluster.api_endpoint);
    println!("  status:          {}", status_badge(&cluster.status));
    println!("  proxmox version: {}", cluster.proxmox_version);
    println!("  nodes:           {}", cluster.node_count);
    println!("  registered:      {}", cluster.created_at);
    println!("  updated:         {}", cluster.updated_at);
}

pub fn print_disks(disks: &ClusterDisks) {
    println!(
        "{} - {} disk(s)\n",
        disks.cluster_name.bold(),
        disks.total_disks
    );
    for node in &disks.nodes {
        println!("{} [{}]", node.node_name.bold(), status_badge(&node.status));
        if let Some(error) = &node.error {
            println!("  {}", format!("error: {error}").red());
            continue;
        }
        println!(
            "  {:<14} {:<6} {:>9} {:<22} {:<8} {:>7}",
            "DEVICE", "TYPE", "SIZE", "MODEL", "HEALTH", "WEAR"
        );
        for disk in &node.disks {
            let wear = if disk.wearout >= 0 {
                format!("{}%", disk.wearout)
            } else {
                "-".to_string()
            };
            println!(
                "  {:<14} {:<6} {:>9} {:<22} {:<8} {:>7}",
                disk.device,
                disk.kind,
                format_bytes(disk.size),
                disk.model,
                disk.health,
                wear
            );
        }
        println!();
    }
}

fn format_node(out: &mut String, node: &NodeStatus) {
    let _ = writeln!(
        out,
        "{} [{}]  up {}",
        node.node_name.bold(),
        status_badge(&node.status),
        format_uptime(node.uptime)
    );
    if let Some(error) = &node.error {
        let _ = writeln!(out, "  {}", format!("error: {error}").red());
        return;
    }
    let _ = writeln!(out, "  cpu:    {}", usage_cell(node.cpu_usage));
    let _ = writeln!(
        out,
        "  memory: {} ({} / {})",
        usage_cell(node.memory_usage),
        format_bytes(node.memory_used),
        format_bytes(node.memory_total)
    );
    let _ = writeln!(
        out,
        "  swap:   {} ({} / {})",
        usage_cell(node.swap_usage),
        format_bytes(node.swap_used),
        format_bytes(node.swap_total)
    );
    if node.load_avg.len() == 3 {
        let _ = writeln!(
            out,
            "  load:   {:.2} {:.2} {:.2}",
            node.load_avg[0], node.load_avg[1], node.load_avg[2]
        );
    }
}

/// Header line for the live watch view.
pub fn watch_header(period: Duration) -> String {
    if period.is_zero() {
        "proxwatch | automatic refresh off | Ctrl-C to exit".to_string()
    } else {
        format!(
            "proxwatch | refreshing every {}s | Ctrl-C to exit",
            period.as_secs()
        )
    }
}

/// Render a full status view. `error` is rendered alongside whatever data
/// is present: a transient failure keeps showing the last good snapshot.
/// Before the first-ever settle there is nothing to show but "Loading...".
pub fn format_status(
    status: Option<&ClusterStatus>,
    error: Option<&ApiError>,
    last_updated: Option<&DateTime<Utc>>,
) -> String {
    let mut out = String::new();
    if let Some(error) = error {
        let _ = writeln!(out, "{}\n", format!("refresh failed: {error}").red());
    }
    let Some(status) = status else {
        if error.is_none() {
            out.push_str("Loading...\n");
        }
        return out;
    };

    let _ = writeln!(out, "{}", status.cluster_name.bold().underline());
    let summary = &status.resource_summary;
    let _ = writeln!(
        out,
        "VMs: {}/{} running    Containers: {}/{} running",
        summary.running_vms, summary.total_vms, summary.running_containers, summary.total_containers
    );
    if let Some(at) = last_updated {
        let _ = writeln!(out, "last updated: {}", at.format("%H:%M:%S"));
    }
    out.push('\n');
    for node in &status.nodes {
        format_node(&mut out, node);
        out.push('\n');
    }
    out
}

pub fn print_status(
    status: Option<&ClusterStatus>,
    error: Option<&ApiError>,
    last_updated: Option<&DateTime<Utc>>,
) {
    print!("{}", format_status(status, error, last_updated));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(8_589_934_592), "8.0 GiB");
    }

    #[test]
    fn uptime_is_humanized() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(3_660), "1h 1m");
        assert_eq!(format_uptime(90_000), "1d 1h");
    }

    fn sample_status() -> ClusterStatus {
        ClusterStatus {
            cluster_id: "c1".to_string(),
            cluster_name: "homelab".to_string(),
            nodes: vec![NodeStatus {
                node_name: "pve1".to_string(),
                status: "online".to_string(),
                cpu_usage: 12.5,
                memory_used: 8_589_934_592,
                memory_total: 34_359_738_368,
                memory_usage: 25.0,
                swap_used: 0,
                swap_total: 4_294_967_296,
                swap_usage: 0.0,
                uptime: 86_400,
                load_avg: vec![0.5, 0.4, 0.3],
                error: None,
            }],
            resource_summary: proxwatch_api::types::ResourceSummary {
                total_vms: 4,
                running_vms: 3,
                total_containers: 2,
                running_containers: 2,
            },
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn unsettled_state_renders_a_loading_frame() {
        let frame = format_status(None, None, None);
        assert!(frame.contains("Loading..."));
    }

    #[test]
    fn error_with_stale_data_renders_both() {
        let status = sample_status();
        let error = ApiError::Transport("connection refused".to_string());
        let frame = format_status(Some(&status), Some(&error), None);
        assert!(frame.contains("refresh failed"));
        assert!(frame.contains("homelab"));
        assert!(frame.contains("pve1"));
    }

    #[test]
    fn frames_and_headers_are_plain_ascii() {
        let status = sample_status();
        let error = ApiError::Transport("boom".to_string());
        for text in [
            watch_header(Duration::ZERO),
            watch_header(Duration::from_secs(30)),
            format_status(None, None, None),
            format_status(Some(&status), Some(&error), None),
        ] {
            assert!(text.is_ascii(), "non-ascii output in: {text:?}");
        }
    }
}
