//! Search subscriptions and the tender/subscription match pairings they
//! produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::taxonomy::{CpvRef, OrganizationRef};
use crate::vocab::{EmailFrequency, NotificationChannel, TenderStatus};

/// Owning account of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    /// Accounts that are not allowed customers keep their match pairings but
    /// never receive dispatches.
    pub is_allowed_customer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub email: String,
}

/// Match parameters of one subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MatchParameters {
    pub keywords: Vec<String>,
    pub exclude_words: Vec<String>,
    pub cpv_codes: Vec<CpvRef>,
    pub excluded_cpv_codes: Vec<CpvRef>,
    /// Location entries in `key/value` form, e.g. `country/España`.
    pub locations: Vec<String>,
    pub excluded_locations: Vec<String>,
    pub min_budget_no_taxes: Option<f64>,
    pub max_budget_no_taxes: Option<f64>,
    pub contractors: Vec<OrganizationRef>,
    pub status: Vec<TenderStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub id: Uuid,
    pub name: String,
    pub account: Account,
    /// Named users sharing the subscription.
    pub users: Vec<UserRef>,
    /// Bare watcher addresses notified alongside the named users.
    pub emails: Vec<String>,
    pub parameters: MatchParameters,
    pub email_frequency: EmailFrequency,
    pub notification_channel: NotificationChannel,
    pub is_active: bool,
    pub is_archived: bool,
}

impl SearchCriteria {
    pub fn is_evaluable(&self) -> bool {
        self.is_active && !self.is_archived
    }
}

/// Recorded match between a subscription and a tender; at most one per
/// `(tender, criteria)` pair, which is what makes re-evaluation and
/// notification idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderAccount {
    pub id: Uuid,
    pub tender_id: Uuid,
    pub search_criteria_id: Uuid,
    pub account_id: Uuid,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
}
