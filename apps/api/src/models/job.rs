use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub default_pipeline_id: Option<Uuid>,
}

/// One named step in a hiring pipeline. `order` drives stage selection;
/// ties are broken by list position (stable sort in the approval path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStage {
    pub id: Uuid,
    pub name: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: Uuid,
    pub name: String,
    pub stages: Vec<PipelineStage>,
}

impl Pipeline {
    /// The entry stage: minimum `order`, original position breaking ties.
    /// None when the pipeline has no stages — a stageless pipeline is
    /// legal, candidates just land unstaged.
    pub fn first_stage(&self) -> Option<&PipelineStage> {
        let mut sorted: Vec<&PipelineStage> = self.stages.iter().collect();
        sorted.sort_by_key(|s| s.order);
        sorted.first().copied()
    }
}
