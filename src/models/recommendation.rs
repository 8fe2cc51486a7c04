use serde::Serialize;
use uuid::Uuid;

use super::activity::ActivityItem;

/// Raw hits per collaborator, reported back to the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounts {
    pub maps: usize,
    pub web: usize,
}

/// Aggregate facts about one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineMeta {
    pub request_id: Uuid,
    pub source_counts: SourceCounts,
    /// Provider calls that failed or timed out and were replaced by
    /// local estimates
    pub provider_errors: usize,
    pub fallback_used: bool,
    pub elapsed_ms: u64,
}

/// The pipeline's output contract: an ordered list of scored items
/// (length ≤ the target count) plus run metadata.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSet {
    pub items: Vec<ActivityItem>,
    pub meta: PipelineMeta,
}
