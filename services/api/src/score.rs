use crate::infra::build_lead_service;
use clap::{Args, ValueEnum};
use lead_intent::config::AppConfig;
use lead_intent::error::AppError;
use lead_intent::telemetry;
use lead_intent::workflows::qualification::{results_to_csv, OfferSubmission, ScoredLead};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file describing the offer (name, value_props, ideal_use_cases)
    #[arg(long)]
    pub(crate) offer: PathBuf,
    /// CSV lead sheet with name, role, company, industry, location, linkedin_bio columns
    #[arg(long)]
    pub(crate) leads: PathBuf,
    /// Output format for the scored leads
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub(crate) format: OutputFormat,
    /// Write the results to a file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let submission: OfferSubmission = serde_json::from_str(&fs::read_to_string(&args.offer)?)?;
    let lead_sheet = fs::read_to_string(&args.leads)?;

    let service = build_lead_service(&config);
    service.create_offer(submission)?;
    service.upload_leads(&lead_sheet)?;
    let results = service.score().await?;

    let rendered = render(&results, args.format)?;
    match args.output {
        Some(path) => {
            fs::write(&path, rendered)?;
            eprintln!("Scored {} leads -> {}", results.len(), path.display());
        }
        None => emit(&rendered, &mut io::stdout().lock())?,
    }

    Ok(())
}

/// Writes the export, and nothing else, followed by a newline.
fn emit<W: Write>(rendered: &str, out: &mut W) -> Result<(), AppError> {
    writeln!(out, "{rendered}")?;
    out.flush()?;
    Ok(())
}

fn render(results: &[ScoredLead], format: OutputFormat) -> Result<String, AppError> {
    match format {
        OutputFormat::Csv => Ok(results_to_csv(results)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_intent::workflows::qualification::{Intent, RuleBreakdown};

    fn result() -> ScoredLead {
        ScoredLead {
            name: "Jane Doe".to_string(),
            role: "VP Sales".to_string(),
            company: "Acme".to_string(),
            intent: Intent::Medium,
            score: 80,
            reasoning: "Decision maker.".to_string(),
            rule_breakdown: RuleBreakdown {
                role_score: 20,
                role_reason: "Decision maker role".to_string(),
                industry_score: 20,
                industry_reason: "Exact ICP match".to_string(),
                completeness_score: 10,
                completeness_reason: "All fields present".to_string(),
            },
        }
    }

    #[test]
    fn csv_output_uses_export_layout() {
        let rendered = render(&[result()], OutputFormat::Csv).expect("renders");
        let mut lines = rendered.lines();
        assert!(lines.next().expect("header").starts_with("name,role,company"));
        assert_eq!(
            lines.next(),
            Some("\"Jane Doe\",\"VP Sales\",\"Acme\",Medium,80,\"Decision maker.\",50,30,20,20,10")
        );
    }

    #[test]
    fn emitted_output_is_exactly_the_export() {
        let rendered = render(&[result(), result()], OutputFormat::Json).expect("renders");
        let mut out = Vec::new();

        emit(&rendered, &mut out).expect("writes");

        let written = String::from_utf8(out).expect("utf-8");
        assert_eq!(written, format!("{rendered}\n"));
        let payload: serde_json::Value =
            serde_json::from_str(&written).expect("whole output is one JSON document");
        assert_eq!(payload.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn json_output_lists_scored_leads() {
        let rendered = render(&[result()], OutputFormat::Json).expect("renders");
        let payload: serde_json::Value = serde_json::from_str(&rendered).expect("json");
        assert_eq!(payload[0]["intent"], "Medium");
        assert_eq!(payload[0]["rule_breakdown"]["industry_score"], 20);
    }
}
