use std::io::Read;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::domain::{next_lead_id, Lead};

/// Columns every lead sheet must provide, matched case-insensitively.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "role",
    "company",
    "industry",
    "location",
    "linkedin_bio",
];

#[derive(Debug, thiserror::Error)]
pub enum LeadImportError {
    #[error("invalid lead CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV must contain at least a header and one data row")]
    NoRows,
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },
}

/// Column positions of the required fields within a sheet.
struct ColumnMap([usize; 6]);

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self, LeadImportError> {
        let mut positions = [0usize; 6];
        let mut missing = Vec::new();

        for (slot, column) in REQUIRED_COLUMNS.iter().enumerate() {
            match headers.iter().position(|header| header == column) {
                Some(index) => positions[slot] = index,
                None => missing.push(column.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self(positions))
        } else {
            Err(LeadImportError::MissingColumns {
                missing,
                found: headers.to_vec(),
            })
        }
    }

    fn lead_from(&self, row: &csv::StringRecord, uploaded_at: DateTime<Utc>) -> Option<Lead> {
        let field = |slot: usize| row.get(self.0[slot]).unwrap_or_default().to_string();

        let name = field(0);
        if name.is_empty() {
            return None;
        }

        Some(Lead {
            id: next_lead_id(),
            name,
            role: field(1),
            company: field(2),
            industry: field(3),
            location: field(4),
            linkedin_bio: field(5),
            uploaded_at,
        })
    }
}

/// Parse a lead sheet. Rows with a different field count than the header are skipped and rows
/// without a name are dropped.
pub fn parse_leads<R: Read>(
    reader: R,
    uploaded_at: DateTime<Utc>,
) -> Result<Vec<Lead>, LeadImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        rows.push(record?);
    }
    if rows.is_empty() {
        return Err(LeadImportError::NoRows);
    }

    let columns = ColumnMap::resolve(&headers)?;

    let mut leads = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in &rows {
        if row.len() != headers.len() {
            skipped += 1;
            continue;
        }
        match columns.lead_from(row, uploaded_at) {
            Some(lead) => leads.push(lead),
            None => skipped += 1,
        }
    }

    debug!(parsed = leads.len(), skipped, "lead sheet parsed");
    Ok(leads)
}
