use super::diff::set_delta;
use crate::risk::RiskResult;

/// Trace text used when two evaluations are indistinguishable
pub const NO_RISK_CHANGE: &str = "No significant risk factor changes";

/// Render the human-readable summary of what changed between two evaluations
///
/// Segments, in order and only when non-empty: tier change, score change,
/// added reasons, removed reasons. Joined with ` | `.
pub fn render_risk_trace(before: &RiskResult, after: &RiskResult) -> String {
    let mut segments = Vec::new();

    if before.risk_level != after.risk_level {
        segments.push(format!(
            "Risk {} → {}",
            before.risk_level, after.risk_level
        ));
    }
    if before.total_score != after.total_score {
        segments.push(format!(
            "Score {} → {}",
            before.total_score, after.total_score
        ));
    }

    let (added, removed) = set_delta(&before.reasons, &after.reasons);
    if !added.is_empty() {
        segments.push(format!("Added: {}", added.join(", ")));
    }
    if !removed.is_empty() {
        segments.push(format!("Removed: {}", removed.join(", ")));
    }

    if segments.is_empty() {
        NO_RISK_CHANGE.to_string()
    } else {
        segments.join(" | ")
    }
}
