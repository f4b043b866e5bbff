//! Reference entities resolved against the taxonomy store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vocab::PlayerType;

/// A Common Procurement Vocabulary classification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpvRef {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub code: String,
    pub iso_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub iso_code: String,
    pub symbol: String,
}

/// Contracting bodies and bidders. Identity key is the slug of the display
/// name; `find or create` against that slug is the only creation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub player_type: PlayerType,
    pub country: Option<Country>,
    pub languages: Vec<String>,
    pub email: Option<String>,
    pub tax_identification_number: Option<String>,
    pub web_url: Option<String>,
    pub activity: Option<String>,
    pub town: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Organization {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, player_type: PlayerType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            name: name.into(),
            player_type,
            country: None,
            languages: Vec::new(),
            email: None,
            tax_identification_number: None,
            web_url: None,
            activity: None,
            town: None,
            street: None,
            postal_code: None,
            phone: None,
            fax: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn to_ref(&self) -> OrganizationRef {
        OrganizationRef {
            id: self.id,
            slug: self.slug.clone(),
            name: self.name.clone(),
        }
    }
}

/// Lightweight organization reference embedded in tender records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRef {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
}
