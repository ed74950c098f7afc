//! Build summary of the assets in a graph

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::asset_graph::AssetGraph;

/// Size and timing of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub file_path: Utf8PathBuf,
    pub size: u64,
    pub time: u64,
}

/// Totals over every asset plus the largest ones, biggest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetGraphReport {
    pub total_size: u64,
    pub total_time: u64,
    pub total_assets: usize,
    pub largest_assets: Vec<AssetSummary>,
}

impl AssetGraphReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl AssetGraph {
    /// Report listing up to `GraphOptions::largest_asset_count` assets
    pub fn report(&self) -> AssetGraphReport {
        self.report_with_limit(self.options().largest_asset_count)
    }

    pub fn report_with_limit(&self, limit: usize) -> AssetGraphReport {
        let mut summaries: Vec<AssetSummary> = self
            .assets()
            .map(|asset| AssetSummary {
                file_path: asset.file_path.clone(),
                size: asset.stats.size,
                time: asset.stats.time,
            })
            .collect();

        let total_size = summaries
            .iter()
            .fold(0u64, |total, summary| total.saturating_add(summary.size));
        let total_time = summaries
            .iter()
            .fold(0u64, |total, summary| total.saturating_add(summary.time));
        let total_assets = summaries.len();

        // stable sort keeps insertion order among equal sizes
        summaries.sort_by(|a, b| b.size.cmp(&a.size));
        summaries.truncate(limit);

        AssetGraphReport {
            total_size,
            total_time,
            total_assets,
            largest_assets: summaries,
        }
    }
}
