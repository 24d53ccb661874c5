//! Customer Endpoints
//!
//! CSV import and the client-generated import template.

use serde::Deserialize;

use super::{ApiClient, ApiError, OPPORTUNITIES};
use crate::models::Opportunity;

/// UTF-8 BOM keeps spreadsheet apps from mangling accented names.
pub const CSV_TEMPLATE: &str = "\u{FEFF}name,email,phone\nNguyen Van A,nguyenvana@example.com,0901234567\n";
pub const CSV_TEMPLATE_FILE: &str = "customers_template.csv";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub message: String,
    /// Per-row failures, e.g. "Row 4: ..."
    #[serde(default)]
    pub errors: Vec<String>,
}

pub fn is_csv(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".csv")
}

pub async fn import_customers(
    client: &ApiClient,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<ImportSummary, ApiError> {
    let response = client
        .upload("customers/import/", "file", file_name, "text/csv", bytes)
        .await?;
    let summary: ImportSummary = response.json()?;
    log::info!("[API] customer import: {} ({} row errors)", summary.message, summary.errors.len());
    Ok(summary)
}

pub async fn customer_opportunities(client: &ApiClient, customer: u32) -> Result<Vec<Opportunity>, ApiError> {
    OPPORTUNITIES
        .all(client, &[("customer", customer.to_string())])
        .await
}

#[cfg(test)]
mod tests {
    use super::super::mock::{json_response, MockTransport};
    use super::super::RequestBody;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_has_bom_and_header() {
        assert!(CSV_TEMPLATE.starts_with('\u{FEFF}'));
        assert_eq!(CSV_TEMPLATE.trim_start_matches('\u{FEFF}').lines().next(), Some("name,email,phone"));
        assert_eq!(CSV_TEMPLATE.lines().count(), 2);
    }

    #[test]
    fn test_is_csv() {
        assert!(is_csv("leads.CSV"));
        assert!(!is_csv("leads.xlsx"));
    }

    #[tokio::test]
    async fn test_import_uploads_file_field() {
        let mock = MockTransport::new(|_| {
            json_response(200, json!({"message": "Imported 2 customers.", "errors": []}))
        });
        let client = mock.default_client();

        let summary = import_customers(&client, "leads.csv", b"name\nA\nB\n".to_vec()).await.unwrap();
        assert_eq!(summary.message, "Imported 2 customers.");

        match &mock.requests()[0].body {
            RequestBody::File { field, file_name, .. } => {
                assert_eq!(field, "file");
                assert_eq!(file_name, "leads.csv");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }
}
