//! Evaluation loop over the active subscriptions.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use licita_core::{EmailFrequency, NotificationChannel, SearchCriteria, Tender};
use licita_store::{CriteriaStore, StoreError, TenderAccountStore};

use crate::notify::{NotificationDispatcher, TenderNotice};
use crate::predicates::matches_parameters;

/// Policy knobs for predicates the stored criteria do not pin down.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchPolicy {
    /// Whether an empty contractor allow-list matches every contracting
    /// organization (vacuous true, like locations and status) or none.
    pub empty_contractor_list_matches: bool,
}

impl MatchPolicy {
    pub fn from_env() -> Self {
        Self {
            empty_contractor_list_matches: std::env::var("LICITA_MATCH_EMPTY_CONTRACTORS")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationSummary {
    pub evaluated: usize,
    pub matched: Vec<Uuid>,
    pub notified: usize,
}

pub struct MatchEngine {
    criteria: Arc<dyn CriteriaStore>,
    pairings: Arc<dyn TenderAccountStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    policy: MatchPolicy,
}

impl MatchEngine {
    pub fn new(
        criteria: Arc<dyn CriteriaStore>,
        pairings: Arc<dyn TenderAccountStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            criteria,
            pairings,
            dispatcher,
            policy,
        }
    }

    /// Evaluate one tender against every active subscription. Pairings are
    /// find-or-create, so re-running against an unchanged tender neither
    /// duplicates pairings nor re-notifies.
    pub async fn evaluate(&self, tender: &Tender) -> Result<EvaluationSummary, StoreError> {
        let mut summary = EvaluationSummary::default();
        for criteria in self.criteria.list_active().await? {
            if !criteria.is_evaluable() {
                continue;
            }
            summary.evaluated += 1;
            if !matches_parameters(tender, &criteria.parameters, self.policy) {
                continue;
            }
            summary.matched.push(criteria.id);

            let pairing = self
                .pairings
                .find_or_create(tender.id, criteria.id, criteria.account.id)
                .await?;
            if !pairing.created {
                debug!(tender = %tender.id, criteria = %criteria.id, "pairing already recorded");
                continue;
            }
            if criteria.email_frequency != EmailFrequency::RealTime {
                continue;
            }
            if !criteria.account.is_allowed_customer {
                debug!(criteria = %criteria.id, "account not allowed, skipping dispatch");
                continue;
            }
            summary.notified += self.dispatch(tender, &criteria).await;
        }
        Ok(summary)
    }

    /// Fire-and-forget delivery; each recipient is isolated so one failure
    /// cannot abort the rest.
    async fn dispatch(&self, tender: &Tender, criteria: &SearchCriteria) -> usize {
        let notice = TenderNotice {
            tender_id: tender.id,
            tender_name: tender.name.clone(),
            expedient: tender.expedient.clone(),
            criteria_id: criteria.id,
            criteria_name: criteria.name.clone(),
            account_name: criteria.account.name.clone(),
        };

        if criteria.notification_channel == NotificationChannel::Chat {
            return match self
                .dispatcher
                .notify(NotificationChannel::Chat, &[], &notice)
                .await
            {
                Ok(()) => 1,
                Err(err) => {
                    warn!(criteria = %criteria.id, error = %err, "chat dispatch failed");
                    0
                }
            };
        }

        let mut delivered = 0;
        let recipients = criteria
            .users
            .iter()
            .map(|user| user.email.clone())
            .chain(criteria.emails.iter().cloned());
        for address in recipients {
            match self
                .dispatcher
                .notify(
                    NotificationChannel::Email,
                    std::slice::from_ref(&address),
                    &notice,
                )
                .await
            {
                Ok(()) => delivered += 1,
                Err(err) => {
                    warn!(criteria = %criteria.id, %address, error = %err, "email dispatch failed");
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use licita_core::{
        Account, ContractType, CpvRef, MatchParameters, Procedure, TenderStatus, UserRef,
    };
    use licita_store::MemoryStore;

    use crate::notify::DispatchError;

    use super::*;

    // Recorded (channel, recipients) pairs.
    #[derive(Default)]
    struct RecordingDispatcher {
        sent: Mutex<Vec<(NotificationChannel, Vec<String>)>>,
        fail_addresses: Vec<String>,
    }

    #[async_trait]
    impl NotificationDispatcher for RecordingDispatcher {
        async fn notify(
            &self,
            channel: NotificationChannel,
            recipients: &[String],
            _notice: &TenderNotice,
        ) -> Result<(), DispatchError> {
            if recipients.iter().any(|r| self.fail_addresses.contains(r)) {
                return Err(DispatchError::Message("bounced".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((channel, recipients.to_vec()));
            Ok(())
        }
    }

    fn tender_named(name: &str) -> Tender {
        let now = Utc::now();
        Tender {
            id: uuid::Uuid::new_v4(),
            slug: "t".into(),
            expedient: "EXP".into(),
            name: name.to_string(),
            contract_type: ContractType::Obras,
            procedure: Procedure::Abierto,
            status: TenderStatus::Publicada,
            cpv_codes: vec![CpvRef {
                id: uuid::Uuid::new_v4(),
                code: "45000000".into(),
                name: "Obras".into(),
            }],
            contracting_organization: None,
            success_bidder_organization: None,
            location_text: None,
            locations: BTreeMap::new(),
            country: None,
            currency: None,
            sources: vec![],
            documents: vec![],
            sheets: vec![],
            consultation: None,
            submission_deadline_date: None,
            expedient_created_at: None,
            expedient_updated_at: None,
            budget_no_taxes: None,
            contract_estimated_value: None,
            award_amount: None,
            result: None,
            bidders_number: None,
            is_adjudication: false,
            is_minor_contract: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn criteria_with(keywords: Vec<&str>, users: Vec<&str>, watchers: Vec<&str>) -> SearchCriteria {
        SearchCriteria {
            id: uuid::Uuid::new_v4(),
            name: "obras en andalucía".into(),
            account: Account {
                id: uuid::Uuid::new_v4(),
                name: "ACME Ingeniería".into(),
                is_allowed_customer: true,
            },
            users: users
                .into_iter()
                .map(|email| UserRef {
                    id: uuid::Uuid::new_v4(),
                    email: email.to_string(),
                })
                .collect(),
            emails: watchers.into_iter().map(String::from).collect(),
            parameters: MatchParameters {
                keywords: keywords.into_iter().map(String::from).collect(),
                ..MatchParameters::default()
            },
            email_frequency: EmailFrequency::RealTime,
            notification_channel: NotificationChannel::Email,
            is_active: true,
            is_archived: false,
        }
    }

    fn engine_with(
        store: Arc<MemoryStore>,
        dispatcher: Arc<RecordingDispatcher>,
        policy: MatchPolicy,
    ) -> MatchEngine {
        MatchEngine::new(store.clone(), store, dispatcher, policy)
    }

    fn open_policy() -> MatchPolicy {
        MatchPolicy {
            empty_contractor_list_matches: true,
        }
    }

    #[tokio::test]
    async fn re_evaluation_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_criteria(criteria_with(
                vec!["pavimentación"],
                vec!["ana@example.es"],
                vec![],
            ))
            .await;
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let engine = engine_with(store.clone(), dispatcher.clone(), open_policy());
        let tender = tender_named("Obras de pavimentación urbana");

        let first = engine.evaluate(&tender).await.unwrap();
        assert_eq!(first.matched.len(), 1);
        assert_eq!(first.notified, 1);

        let second = engine.evaluate(&tender).await.unwrap();
        assert_eq!(second.matched.len(), 1);
        assert_eq!(second.notified, 0);

        assert_eq!(store.pairing_count().await, 1);
        assert_eq!(dispatcher.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn users_and_watchers_each_get_one_email() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_criteria(criteria_with(
                vec!["obras"],
                vec!["ana@example.es", "luis@example.es"],
                vec!["watcher@example.org"],
            ))
            .await;
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let engine = engine_with(store.clone(), dispatcher.clone(), open_policy());

        let summary = engine.evaluate(&tender_named("Obras de drenaje")).await.unwrap();
        assert_eq!(summary.notified, 3);
        let sent = dispatcher.sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|(channel, _)| *channel == NotificationChannel::Email));
    }

    #[tokio::test]
    async fn one_bounced_recipient_does_not_block_the_rest() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_criteria(criteria_with(
                vec!["obras"],
                vec!["bounce@example.es", "ok@example.es"],
                vec![],
            ))
            .await;
        let dispatcher = Arc::new(RecordingDispatcher {
            fail_addresses: vec!["bounce@example.es".into()],
            ..RecordingDispatcher::default()
        });
        let engine = engine_with(store.clone(), dispatcher.clone(), open_policy());

        let summary = engine.evaluate(&tender_named("Obras menores")).await.unwrap();
        assert_eq!(summary.notified, 1);
        let sent = dispatcher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, vec!["ok@example.es".to_string()]);
    }

    #[tokio::test]
    async fn chat_channel_dispatches_once_without_recipients() {
        let store = Arc::new(MemoryStore::new());
        let mut criteria = criteria_with(vec!["obras"], vec!["ana@example.es"], vec![]);
        criteria.notification_channel = NotificationChannel::Chat;
        store.seed_criteria(criteria).await;
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let engine = engine_with(store.clone(), dispatcher.clone(), open_policy());

        let summary = engine.evaluate(&tender_named("Obras de saneamiento")).await.unwrap();
        assert_eq!(summary.notified, 1);
        let sent = dispatcher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, NotificationChannel::Chat);
        assert!(sent[0].1.is_empty());
    }

    #[tokio::test]
    async fn non_realtime_and_disallowed_accounts_record_but_never_dispatch() {
        let store = Arc::new(MemoryStore::new());
        let mut daily = criteria_with(vec!["obras"], vec!["ana@example.es"], vec![]);
        daily.email_frequency = EmailFrequency::Daily;
        let mut blocked = criteria_with(vec!["obras"], vec!["luis@example.es"], vec![]);
        blocked.account.is_allowed_customer = false;
        store.seed_criteria(daily).await;
        store.seed_criteria(blocked).await;
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let engine = engine_with(store.clone(), dispatcher.clone(), open_policy());

        let summary = engine.evaluate(&tender_named("Obras ferroviarias")).await.unwrap();
        assert_eq!(summary.matched.len(), 2);
        assert_eq!(summary.notified, 0);
        assert_eq!(store.pairing_count().await, 2);
        assert!(dispatcher.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn archived_criteria_are_not_evaluated() {
        let store = Arc::new(MemoryStore::new());
        let mut archived = criteria_with(vec!["obras"], vec!["ana@example.es"], vec![]);
        archived.is_archived = true;
        store.seed_criteria(archived).await;
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let engine = engine_with(store.clone(), dispatcher.clone(), open_policy());

        let summary = engine.evaluate(&tender_named("Obras de fachada")).await.unwrap();
        assert_eq!(summary.evaluated, 0);
        assert!(summary.matched.is_empty());
    }
}
