//! The audit recorder
//!
//! Turns model lifecycle events into audit records: resolves the description
//! and actor, computes the attribute diff and hands the record to a sink.

use std::sync::Arc;

use tracing::debug;

use super::diff::{diff_against, DiffPolicy};
use super::entry::{AuditRecord, Subject};
use super::headline::headline;
use super::sink::{LogSink, LogStatus};
use crate::auth::{AuthContext, NameResolver, UserDisplayResolver};
use crate::config::Settings;
use crate::error::AuditResult;
use crate::models::{ActorIdentity, Attributes, ModelEvent, ModelSnapshot, Principal};

/// Records create, update and delete events on models
///
/// Every entry point returns the record it wrote, or `None` when the event
/// was suppressed or logging is disabled.
#[derive(Clone)]
pub struct AuditRecorder {
    log_name: String,
    sink: Arc<dyn LogSink>,
    resolver: Arc<dyn UserDisplayResolver>,
    status: LogStatus,
    policy: DiffPolicy,
}

impl AuditRecorder {
    /// Create a recorder writing to `log_name` on `sink`
    pub fn new(log_name: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            log_name: log_name.into(),
            sink,
            resolver: Arc::new(NameResolver),
            status: LogStatus::default(),
            policy: DiffPolicy::default(),
        }
    }

    /// Create a recorder configured from user settings
    pub fn from_settings(settings: &Settings, sink: Arc<dyn LogSink>) -> Self {
        Self::new(settings.log_name.clone(), sink)
            .with_log_status(settings.log_status())
            .with_policy(settings.diff_policy())
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn UserDisplayResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_log_status(mut self, status: LogStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_policy(mut self, policy: DiffPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// A recorder sharing this one's sink and settings but writing to another log
    pub fn using_log(&self, log_name: impl Into<String>) -> Self {
        Self {
            log_name: log_name.into(),
            ..self.clone()
        }
    }

    pub fn log_name(&self) -> &str {
        &self.log_name
    }

    pub fn log_status(&self) -> &LogStatus {
        &self.status
    }

    /// Dispatch a lifecycle event to the matching handler
    pub fn handle(
        &self,
        event: ModelEvent,
        auth: &dyn AuthContext,
        model: &ModelSnapshot,
    ) -> AuditResult<Option<AuditRecord>> {
        self.handle_described(event, auth, model, None)
    }

    /// Dispatch a lifecycle event, replacing the generated description
    ///
    /// The per-event rules still apply: Created diffs every attribute,
    /// Updated diffs the reported changes and may be suppressed, Deleted
    /// carries no diff.
    pub fn handle_described(
        &self,
        event: ModelEvent,
        auth: &dyn AuthContext,
        model: &ModelSnapshot,
        description: Option<&str>,
    ) -> AuditResult<Option<AuditRecord>> {
        match event {
            ModelEvent::Created => self.emit_against(
                auth,
                model,
                event,
                description,
                Some(&model.attributes),
                &Attributes::new(),
            ),
            ModelEvent::Updated => {
                if self.policy.suppresses_update(&model.changes) {
                    debug!(
                        subject_type = %model.type_name,
                        "Skipping update that only touched an ignored field"
                    );
                    return Ok(None);
                }
                self.emit(auth, model, event, description, Some(&model.changes))
            }
            ModelEvent::Deleted => self.emit(auth, model, event, description, None),
        }
    }

    /// Log a freshly created model; every loggable attribute counts as new
    pub fn on_created(
        &self,
        auth: &dyn AuthContext,
        model: &ModelSnapshot,
    ) -> AuditResult<Option<AuditRecord>> {
        self.handle_described(ModelEvent::Created, auth, model, None)
    }

    /// Log the fields the last save changed
    pub fn on_updated(
        &self,
        auth: &dyn AuthContext,
        model: &ModelSnapshot,
    ) -> AuditResult<Option<AuditRecord>> {
        self.handle_described(ModelEvent::Updated, auth, model, None)
    }

    /// Log a deletion; no attributes are recorded
    pub fn on_deleted(
        &self,
        auth: &dyn AuthContext,
        model: &ModelSnapshot,
    ) -> AuditResult<Option<AuditRecord>> {
        self.handle_described(ModelEvent::Deleted, auth, model, None)
    }

    /// Build and write a record for an explicit candidate set
    ///
    /// Created events diff against an empty original, every other event
    /// against the model's original values. `description` replaces the
    /// generated "<Model> <Event>" text; the actor suffix is still appended.
    pub fn emit(
        &self,
        auth: &dyn AuthContext,
        model: &ModelSnapshot,
        event: ModelEvent,
        description: Option<&str>,
        candidate: Option<&Attributes>,
    ) -> AuditResult<Option<AuditRecord>> {
        match event {
            ModelEvent::Created => {
                self.emit_against(auth, model, event, description, candidate, &Attributes::new())
            }
            _ => self.emit_against(auth, model, event, description, candidate, &model.original),
        }
    }

    fn emit_against(
        &self,
        auth: &dyn AuthContext,
        model: &ModelSnapshot,
        event: ModelEvent,
        description: Option<&str>,
        candidate: Option<&Attributes>,
        original: &Attributes,
    ) -> AuditResult<Option<AuditRecord>> {
        let mut description = match description {
            Some(text) => text.to_string(),
            None => format!("{} {}", headline(&model.type_name), event),
        };

        // The suffix is only added when someone is logged in at all
        if let Some(principal) = auth.current_user()? {
            description.push_str(&format!(" by {}", self.actor(auth, Some(&principal))));
        }

        let properties = diff_against(model, candidate, original, &self.policy);
        let record = AuditRecord::new(
            self.log_name.clone(),
            event,
            description,
            Subject::of(model),
            properties,
        );

        if !self.status.is_enabled() {
            debug!(log_name = %self.log_name, event = %event, "Activity logging disabled");
            return Ok(None);
        }

        self.sink.append(&record)?;

        debug!(
            log_name = %record.log_name,
            event = %record.event,
            subject_type = %record.subject.subject_type,
            changed = record.properties.as_ref().map_or(0, |p| p.len()),
            "Audit record written"
        );

        Ok(Some(record))
    }

    /// Display identity for a principal
    ///
    /// No principal and placeholder principals both read as "Anonymous";
    /// full users go through the display resolver.
    pub fn actor(&self, auth: &dyn AuthContext, principal: Option<&Principal>) -> ActorIdentity {
        match principal {
            Some(principal) if auth.is_authenticated_full_user(principal) => {
                ActorIdentity::Named(self.resolver.display_name(principal))
            }
            _ => ActorIdentity::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAuthContext;
    use crate::audit::sink::MemoryLogSink;
    use crate::error::{AuditError, AuthError, SinkError};
    use crate::models::UserIdentity;
    use serde_json::{json, Value};

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn recorder() -> (AuditRecorder, MemoryLogSink) {
        let sink = MemoryLogSink::new();
        let recorder = AuditRecorder::new("Model", Arc::new(sink.clone()));
        (recorder, sink)
    }

    fn jane() -> StaticAuthContext {
        StaticAuthContext::authenticated(UserIdentity::new("7").with_name("Jane Doe"))
    }

    struct FailingSink;

    impl LogSink for FailingSink {
        fn append(&self, _record: &AuditRecord) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("down for maintenance".into()))
        }
    }

    struct BrokenSession;

    impl AuthContext for BrokenSession {
        fn current_user(&self) -> Result<Option<Principal>, AuthError> {
            Err(AuthError::Unavailable("session store unreachable".into()))
        }
    }

    struct UppercaseResolver;

    impl UserDisplayResolver for UppercaseResolver {
        fn display_name(&self, principal: &Principal) -> String {
            principal.id().to_uppercase()
        }
    }

    #[test]
    fn test_created_logs_filtered_attributes() {
        let (recorder, sink) = recorder();
        let model = ModelSnapshot::new("invoice_item")
            .with_key(1)
            .with_attributes(attrs(json!({"amount": 10, "created_at": "2025-01-01T00:00:00Z"})));

        let record = recorder
            .on_created(&StaticAuthContext::guest(), &model)
            .unwrap()
            .unwrap();

        assert_eq!(record.description, "Invoice Item Created");
        assert_eq!(record.event, ModelEvent::Created);
        let properties = record.properties.as_ref().unwrap();
        assert_eq!(properties.attributes, attrs(json!({"amount": 10})));
        assert_eq!(properties.old, attrs(json!({"amount": null})));
        assert_eq!(sink.records(), vec![record]);
    }

    #[test]
    fn test_created_ignores_synced_original() {
        let (recorder, _sink) = recorder();
        let values = attrs(json!({"title": "Hello", "body": "World"}));
        let model = ModelSnapshot::new("post")
            .with_attributes(values.clone())
            .with_original(values.clone());

        let record = recorder.on_created(&jane(), &model).unwrap().unwrap();
        assert_eq!(record.properties.unwrap().attributes, values);
    }

    #[test]
    fn test_updated_logs_changes_against_original() {
        let (recorder, _sink) = recorder();
        let model = ModelSnapshot::new("invoice")
            .with_attributes(attrs(json!({"status": "paid", "total": 10})))
            .with_original(attrs(json!({"status": "pending", "total": 10})))
            .with_changes(attrs(json!({"status": "paid"})));

        let record = recorder.on_updated(&jane(), &model).unwrap().unwrap();

        assert_eq!(record.description, "Invoice Updated by Jane Doe");
        let properties = record.properties.unwrap();
        assert_eq!(properties.attributes, attrs(json!({"status": "paid"})));
        assert_eq!(properties.old, attrs(json!({"status": "pending"})));
    }

    #[test]
    fn test_updated_with_only_remember_token_is_suppressed() {
        let (recorder, sink) = recorder();
        let model = ModelSnapshot::new("user")
            .with_original(attrs(json!({"remember_token": "old"})))
            .with_changes(attrs(json!({"remember_token": "new"})));

        assert!(recorder.on_updated(&jane(), &model).unwrap().is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_updated_with_remember_token_and_more_is_logged() {
        let (recorder, _sink) = recorder();
        let model = ModelSnapshot::new("user")
            .with_hidden(["remember_token"])
            .with_original(attrs(json!({"remember_token": "old", "name": "Jane"})))
            .with_changes(attrs(json!({"remember_token": "new", "name": "Janet"})));

        let record = recorder.on_updated(&jane(), &model).unwrap().unwrap();
        let properties = record.properties.unwrap();
        assert_eq!(properties.attributes, attrs(json!({"name": "Janet"})));
    }

    #[test]
    fn test_updated_without_real_changes_still_emits() {
        let (recorder, sink) = recorder();
        let model = ModelSnapshot::new("invoice")
            .with_original(attrs(json!({"status": "paid"})))
            .with_changes(attrs(json!({"status": "paid"})));

        let record = recorder.on_updated(&jane(), &model).unwrap().unwrap();
        assert!(record.properties.is_none());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_deleted_has_no_properties() {
        let (recorder, _sink) = recorder();
        let model = ModelSnapshot::new("blog_post")
            .with_key(3)
            .with_attributes(attrs(json!({"title": "Gone"})))
            .with_original(attrs(json!({"title": "Was here"})));

        let record = recorder.on_deleted(&jane(), &model).unwrap().unwrap();
        assert_eq!(record.description, "Blog Post Deleted by Jane Doe");
        assert!(record.properties.is_none());
        assert_eq!(record.subject.subject_id, Some(json!(3)));
    }

    #[test]
    fn test_description_suffix_trichotomy() {
        let (recorder, _sink) = recorder();
        let model = ModelSnapshot::new("invoice");

        let guest = recorder
            .on_deleted(&StaticAuthContext::guest(), &model)
            .unwrap()
            .unwrap();
        assert_eq!(guest.description, "Invoice Deleted");

        let generic = recorder
            .on_deleted(
                &StaticAuthContext::authenticated(Principal::generic("basic-auth")),
                &model,
            )
            .unwrap()
            .unwrap();
        assert_eq!(generic.description, "Invoice Deleted by Anonymous");

        let user = recorder.on_deleted(&jane(), &model).unwrap().unwrap();
        assert_eq!(user.description, "Invoice Deleted by Jane Doe");
    }

    #[test]
    fn test_actor_without_principal_is_anonymous() {
        let (recorder, _sink) = recorder();
        let actor = recorder.actor(&StaticAuthContext::guest(), None);
        assert_eq!(actor, ActorIdentity::Anonymous);
    }

    #[test]
    fn test_custom_resolver() {
        let (recorder, _sink) = recorder();
        let recorder = recorder.with_resolver(Arc::new(UppercaseResolver));
        let auth = StaticAuthContext::authenticated(UserIdentity::new("jane"));

        let record = recorder
            .on_deleted(&auth, &ModelSnapshot::new("invoice"))
            .unwrap()
            .unwrap();
        assert_eq!(record.description, "Invoice Deleted by JANE");
    }

    #[test]
    fn test_explicit_description_keeps_actor_suffix() {
        let (recorder, _sink) = recorder();
        let model = ModelSnapshot::new("invoice").with_original(attrs(json!({"total": 10})));
        let candidate = attrs(json!({"total": 12}));

        let record = recorder
            .emit(
                &jane(),
                &model,
                ModelEvent::Updated,
                Some("Invoice total corrected"),
                Some(&candidate),
            )
            .unwrap()
            .unwrap();

        assert_eq!(record.description, "Invoice total corrected by Jane Doe");
        assert_eq!(record.properties.unwrap().old, attrs(json!({"total": 10})));
    }

    #[test]
    fn test_described_update_keeps_diff() {
        let (recorder, _sink) = recorder();
        let model = ModelSnapshot::new("invoice")
            .with_original(attrs(json!({"status": "pending"})))
            .with_changes(attrs(json!({"status": "paid"})));

        let record = recorder
            .handle_described(ModelEvent::Updated, &jane(), &model, Some("Invoice settled"))
            .unwrap()
            .unwrap();

        assert_eq!(record.description, "Invoice settled by Jane Doe");
        let properties = record.properties.unwrap();
        assert_eq!(properties.attributes, attrs(json!({"status": "paid"})));
        assert_eq!(properties.old, attrs(json!({"status": "pending"})));
    }

    #[test]
    fn test_described_remember_token_update_is_suppressed() {
        let (recorder, sink) = recorder();
        let model =
            ModelSnapshot::new("user").with_changes(attrs(json!({"remember_token": "x"})));

        let record = recorder
            .handle_described(ModelEvent::Updated, &jane(), &model, Some("Token rotated"))
            .unwrap();

        assert!(record.is_none());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_described_create_keeps_attributes() {
        let (recorder, _sink) = recorder();
        let values = attrs(json!({"title": "Hi"}));
        let model = ModelSnapshot::new("post")
            .with_attributes(values.clone())
            .with_original(values.clone());

        let record = recorder
            .handle_described(
                ModelEvent::Created,
                &StaticAuthContext::guest(),
                &model,
                Some("Post drafted"),
            )
            .unwrap()
            .unwrap();

        assert_eq!(record.description, "Post drafted");
        assert_eq!(record.properties.unwrap().attributes, values);
    }

    #[test]
    fn test_emit_created_ignores_synced_original() {
        let (recorder, _sink) = recorder();
        let values = attrs(json!({"title": "Hi"}));
        let model = ModelSnapshot::new("post").with_original(values.clone());

        let record = recorder
            .emit(&jane(), &model, ModelEvent::Created, None, Some(&values))
            .unwrap()
            .unwrap();

        let properties = record.properties.unwrap();
        assert_eq!(properties.attributes, values);
        assert_eq!(properties.old, attrs(json!({"title": null})));
    }

    #[test]
    fn test_handle_dispatches() {
        let (recorder, sink) = recorder();
        let model = ModelSnapshot::new("invoice");
        let guest = StaticAuthContext::guest();

        for event in [ModelEvent::Created, ModelEvent::Updated, ModelEvent::Deleted] {
            recorder.handle(event, &guest, &model).unwrap();
        }

        let events: Vec<ModelEvent> = sink.records().iter().map(|r| r.event).collect();
        assert_eq!(
            events,
            vec![ModelEvent::Created, ModelEvent::Updated, ModelEvent::Deleted]
        );
    }

    #[test]
    fn test_using_log_overrides_channel() {
        let (recorder, sink) = recorder();
        let billing = recorder.using_log("Billing");

        billing
            .on_deleted(&StaticAuthContext::guest(), &ModelSnapshot::new("invoice"))
            .unwrap();

        assert_eq!(recorder.log_name(), "Model");
        assert_eq!(sink.records()[0].log_name, "Billing");
    }

    #[test]
    fn test_disabled_status_skips_sink() {
        let (recorder, sink) = recorder();
        let status = LogStatus::new(false);
        let recorder = recorder.with_log_status(status.clone());
        let model = ModelSnapshot::new("invoice");
        let guest = StaticAuthContext::guest();

        assert!(recorder.on_deleted(&guest, &model).unwrap().is_none());
        assert!(sink.is_empty());

        status.enable();
        assert!(recorder.on_deleted(&guest, &model).unwrap().is_some());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_sink_errors_propagate() {
        let recorder = AuditRecorder::new("Model", Arc::new(FailingSink));
        let err = recorder
            .on_deleted(&StaticAuthContext::guest(), &ModelSnapshot::new("invoice"))
            .unwrap_err();

        assert!(matches!(err, AuditError::Sink(SinkError::Unavailable(_))));
    }

    #[test]
    fn test_auth_errors_propagate() {
        let (recorder, sink) = recorder();
        let err = recorder
            .on_deleted(&BrokenSession, &ModelSnapshot::new("invoice"))
            .unwrap_err();

        assert!(err.is_auth());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.log_name = "Orders".into();
        settings.enabled = false;

        let sink = MemoryLogSink::new();
        let recorder = AuditRecorder::from_settings(&settings, Arc::new(sink.clone()));

        assert_eq!(recorder.log_name(), "Orders");
        assert!(!recorder.log_status().is_enabled());
    }
}
