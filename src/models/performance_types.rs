use serde::Deserialize;

/// Aggregate precision/recall statistics for a trained iteration, plus
/// the per-tag breakdown.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationPerformance {
    #[serde(default)]
    pub per_tag_performance: Vec<TagPerformance>,
    pub precision: f64,
    pub precision_std_deviation: f64,
    pub recall: f64,
    pub recall_std_deviation: f64,
    #[serde(default)]
    pub average_precision: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPerformance {
    pub id: String,
    pub name: String,
    pub precision: f64,
    pub precision_std_deviation: f64,
    pub recall: f64,
    pub recall_std_deviation: f64,
    #[serde(default)]
    pub average_precision: f64,
}

/// How the trained model scored one training image: the ground-truth tags
/// it was uploaded with and the model's predictions against them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePerformance {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<ImageTag>,
    #[serde(default)]
    pub predictions: Vec<PredictionResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTag {
    pub tag_id: String,
    pub tag_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub probability: f64,
    pub tag_id: String,
    pub tag_name: String,
}
