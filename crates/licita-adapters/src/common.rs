//! Mapping plumbing shared by every adapter.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use licita_core::{
    DocumentGroup, DocumentLink, PayloadDocumentGroup, PayloadSheet, Sheet, SourceAttribution,
    SourceId, SourcePayload,
};

use crate::normalize::repair_date;
use crate::AdapterError;

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Build the attribution record for this feed, snapshotting the raw payload
/// verbatim alongside its content hash.
pub fn attribution(
    source: SourceId,
    payload: &SourcePayload,
    received_at: DateTime<Utc>,
) -> Result<SourceAttribution, AdapterError> {
    let snapshot = serde_json::to_string(payload)
        .map_err(|err| AdapterError::Message(format!("serializing payload snapshot: {err}")))?;
    let body_sha256 = sha256_hex(snapshot.as_bytes());
    Ok(SourceAttribution {
        name: source.canonical_name().to_string(),
        country: source.country().to_string(),
        source_url: payload.source_url.clone(),
        link_url: payload.link_url.clone(),
        raw_body_snapshot: snapshot,
        body_sha256,
        attributed_at: received_at,
    })
}

/// Reject payloads without the case-file identity every feed must carry.
pub fn validate_identity(source: SourceId, payload: &SourcePayload) -> Result<(), AdapterError> {
    if payload.expedient.trim().is_empty() {
        return Err(AdapterError::MissingField {
            source_name: source.canonical_name(),
            field: "expedient",
        });
    }
    if payload.name.trim().is_empty() {
        return Err(AdapterError::MissingField {
            source_name: source.canonical_name(),
            field: "name",
        });
    }
    Ok(())
}

pub fn validate_source_url(source: SourceId, payload: &SourcePayload) -> Result<(), AdapterError> {
    let present = payload
        .source_url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());
    if present {
        Ok(())
    } else {
        Err(AdapterError::MissingField {
            source_name: source.canonical_name(),
            field: "sourceUrl",
        })
    }
}

/// Repair publication dates inside attached document groups.
pub fn documents(groups: &[PayloadDocumentGroup], offset_hours: i64) -> Vec<DocumentGroup> {
    groups
        .iter()
        .map(|group| DocumentGroup {
            publication_date: group
                .publication_date
                .as_deref()
                .and_then(|raw| repair_date(raw, offset_hours)),
            name: group.name.clone(),
            documents: group
                .documents
                .iter()
                .map(|doc| DocumentLink {
                    name: doc.name.clone(),
                    url: doc.url.clone(),
                })
                .collect(),
        })
        .collect()
}

pub fn sheets(sheets: &[PayloadSheet]) -> Vec<Sheet> {
    sheets
        .iter()
        .map(|sheet| Sheet {
            name: sheet.name.clone(),
            url: sheet.url.clone(),
        })
        .collect()
}

/// Optional payload field with blank values collapsed to `None`, so that an
/// empty string never drives a sparse-merge overwrite.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parent expedient trimmed to `None` when empty.
pub fn parent_expedient(payload: &SourcePayload) -> Option<String> {
    payload
        .parent_expedient
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
