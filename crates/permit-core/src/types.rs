//! Permit records and the response shapes built from them

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// A file attached to a permit. Only meaningful inside its parent [`Permit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_id: String,
    pub filename: String,
    pub document_type: String,
    pub upload_date: String,
    pub file_url: String,
}

/// Permit lifecycle status. Serialized with the exact display names clients filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermitStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Complete,
    Rejected,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl PermitStatus {
    pub const ALL: [PermitStatus; 5] = [
        PermitStatus::Pending,
        PermitStatus::InProgress,
        PermitStatus::Complete,
        PermitStatus::Rejected,
        PermitStatus::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermitStatus::Pending => "Pending",
            PermitStatus::InProgress => "In Progress",
            PermitStatus::Complete => "Complete",
            PermitStatus::Rejected => "Rejected",
            PermitStatus::OnHold => "On Hold",
        }
    }
}

impl fmt::Display for PermitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the display names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for PermitStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermitStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A building permit as stored by the permit source.
///
/// `improvement_amount` is kept as a JSON number so single-record lookups
/// return it exactly as it was stored (`1600`, not `1600.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permit {
    pub permit_id: String,
    pub property_address: PropertyAddress,
    pub status: PermitStatus,
    pub date_submitted: NaiveDate,
    pub improvement_amount: serde_json::Number,
    pub documents: Vec<Document>,
}

impl Permit {
    pub fn simplify(&self) -> SimplifiedPermit {
        SimplifiedPermit {
            permit_id: self.permit_id.clone(),
            status: self.status,
        }
    }
}

/// List-view projection of a [`Permit`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedPermit {
    pub permit_id: String,
    pub status: PermitStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: usize,
    pub per_page: u32,
    pub total: usize,
}

/// Navigation links. `next`/`prev` are omitted from the JSON when there is no such page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse {
    pub data: Vec<SimplifiedPermit>,
    pub meta: PageMeta,
    pub links: PageLinks,
}

/// Machine-readable error codes returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    RateLimitExceeded,
    ServerError,
}

/// A single rejected query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_uses_display_names() {
        assert_eq!(
            serde_json::to_value(PermitStatus::InProgress).unwrap(),
            json!("In Progress")
        );
        assert_eq!("On Hold".parse::<PermitStatus>(), Ok(PermitStatus::OnHold));
        assert!("pending".parse::<PermitStatus>().is_err());
        assert!("InProgress".parse::<PermitStatus>().is_err());
    }

    #[test]
    fn test_permit_round_trips_verbatim() {
        let raw = json!({
            "permitId": "f47ac10b-58cc-4372-a567-0e02b2c3d479",
            "propertyAddress": {
                "street": "7 Gravelly Point Rd",
                "city": "Highlands",
                "state": "NJ",
                "zip": "07732"
            },
            "status": "Complete",
            "dateSubmitted": "2025-03-27",
            "improvementAmount": 1600,
            "documents": [{
                "documentId": "DOC-2025-0101",
                "filename": "permit.pdf",
                "documentType": "Floodplain Development Permit",
                "uploadDate": "2025-03-27",
                "fileUrl": "https://permits.example.com/files/permit.pdf"
            }]
        });

        let permit: Permit = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(permit.date_submitted, NaiveDate::from_ymd_opt(2025, 3, 27).unwrap());
        assert_eq!(serde_json::to_value(&permit).unwrap(), raw);
    }

    #[test]
    fn test_links_omit_missing_pages() {
        let links = PageLinks {
            self_link: "/v1/permits?page=1&perPage=5".to_string(),
            next: None,
            prev: None,
        };
        assert_eq!(
            serde_json::to_value(links).unwrap(),
            json!({ "self": "/v1/permits?page=1&perPage=5" })
        );
    }

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse::new(ErrorCode::ValidationError, "Invalid query parameters")
            .with_errors(vec![FieldError::new("perPage", "too big")]);
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({
                "code": "validationError",
                "message": "Invalid query parameters",
                "errors": [{ "field": "perPage", "message": "too big" }]
            })
        );

        let plain = ErrorResponse::new(ErrorCode::RateLimitExceeded, "slow down");
        assert_eq!(
            serde_json::to_value(plain).unwrap(),
            json!({ "code": "rateLimitExceeded", "message": "slow down" })
        );
    }
}
