use crate::models::performance_types::{ImagePerformance, IterationPerformance, TagPerformance};
use std::fmt::Write;

/// Marker printed next to a prediction that agrees with the ground truth.
const MATCH_MARK: &str = "[ok]";
/// Marker printed next to a prediction that does not.
const MISS_MARK: &str = "[x]";

/// Renders a chrono duration as hh:mm:ss, clamping negative values to zero.
pub fn format_duration(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// A probability as a truncated integer percentage.
pub fn format_probability(probability: f64) -> String {
    format!("{}%", (probability * 100.0) as i64)
}

pub fn render_iteration_performance(performance: &IterationPerformance) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Iteration performance statistics");
    let _ = writeln!(out, "    AveragePrecision:      {}", performance.average_precision);
    let _ = writeln!(out, "    Precision:             {}", performance.precision);
    let _ = writeln!(out, "    PrecisionStdDeviation: {}", performance.precision_std_deviation);
    let _ = writeln!(out, "    Recall:                {}", performance.recall);
    let _ = writeln!(out, "    RecallStdDeviation:    {}", performance.recall_std_deviation);
    let _ = writeln!(out);
    out
}

/// One block per image: the ground-truth tag, then each prediction with a
/// match/miss marker. Images the service returns without a ground-truth
/// tag are skipped.
pub fn render_image_performances(performances: &[ImagePerformance]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Image performance statistics");

    for performance in performances {
        let truth = match performance.tags.first() {
            Some(tag) => tag,
            None => continue,
        };
        let _ = writeln!(out, "    {}", truth.tag_name);

        for prediction in &performance.predictions {
            let mark = if prediction.tag_name == truth.tag_name {
                MATCH_MARK
            } else {
                MISS_MARK
            };
            let _ = writeln!(
                out,
                "        Tag: {} - Probability: {} {}",
                prediction.tag_name,
                format_probability(prediction.probability),
                mark
            );
        }
    }

    let _ = writeln!(out);
    out
}

pub fn render_per_tag_performance(tags: &[TagPerformance]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Per tag performance");

    for tag in tags {
        let _ = writeln!(out, "    {}", tag.name);
        let _ = writeln!(out, "        Precision:             {}", tag.precision);
        let _ = writeln!(out, "        PrecisionStdDeviation: {}", tag.precision_std_deviation);
        let _ = writeln!(out, "        Recall:                {}", tag.recall);
        let _ = writeln!(out, "        RecallStdDeviation:    {}", tag.recall_std_deviation);
    }

    let _ = writeln!(out);
    out
}
