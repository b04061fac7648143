//! Cluster colors.
//!
//! Clusters are free-form tag strings, so the lookup is a closed table of
//! the labels we know about with a gray fallback for everything else.

/// Color used for clusters not in the table.
pub const DEFAULT_COLOR: &str = "#9ca3af";

/// Returns the display color for a cluster label.
pub fn cluster_color(cluster: &str) -> &'static str {
    match cluster {
        "math" => "#3b82f6",
        "cs" => "#10b981",
        "physics" => "#8b5cf6",
        "biology" => "#22c55e",
        "chemistry" => "#f97316",
        "philosophy" => "#f59e0b",
        "history" => "#a16207",
        "literature" => "#ec4899",
        "project" => "#ef4444",
        "idea" => "#eab308",
        "journal" => "#06b6d4",
        "reference" => "#64748b",
        _ => DEFAULT_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_clusters() {
        assert_eq!(cluster_color("math"), "#3b82f6");
        assert_ne!(cluster_color("cs"), DEFAULT_COLOR);
        assert_eq!(cluster_color("uncategorized"), DEFAULT_COLOR);
        assert_eq!(cluster_color("Math"), DEFAULT_COLOR);
    }
}
