//! Consent document wire types
//!
//! The consent frontend sends camelCase field names; stored records use
//! snake_case (see `types::record::ConsentRecord`).

use serde::{Deserialize, Serialize};

/// Itemized consent flags
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentDetails {
    pub research_participation: bool,
    pub data_collection: bool,
    pub data_sharing: bool,
    pub contact_permission: bool,
}

/// Consent submission or update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRequest {
    /// Participant record number, also the record owner id
    pub medical_record_number: String,
    pub consent_given: bool,
    pub consent_details: ConsentDetails,
}

/// Latest consent state for one participant
#[derive(Debug, Clone, Serialize)]
pub struct ConsentStatus {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_given: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_details: Option<ConsentDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub message: String,
}
