use chrono::NaiveDate;

use super::domain::ScoredLead;

pub const EXPORT_COLUMNS: [&str; 11] = [
    "name",
    "role",
    "company",
    "intent",
    "score",
    "reasoning",
    "rule_score",
    "ai_score",
    "role_points",
    "industry_points",
    "completeness_points",
];

/// Download name for an export generated on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("lead-scores-{}.csv", date.format("%Y-%m-%d"))
}

/// Render results as CSV. Free-text columns are always quoted; numeric columns and the intent
/// label are written bare. Rows are separated by `\n` with no trailing newline.
pub fn results_to_csv(results: &[ScoredLead]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(EXPORT_COLUMNS.join(","));

    for result in results {
        let breakdown = &result.rule_breakdown;
        let row = [
            quote(&result.name),
            quote(&result.role),
            quote(&result.company),
            result.intent.label().to_string(),
            result.score.to_string(),
            quote(&result.reasoning),
            result.rule_score().to_string(),
            result.ai_score().to_string(),
            breakdown.role_score.to_string(),
            breakdown.industry_score.to_string(),
            breakdown.completeness_score.to_string(),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
