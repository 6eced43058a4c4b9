//! Client state and its transitions.
//!
//! # Responsibility
//! - Hold the local cache, the form draft, the in-flight flag and the banner.
//! - Turn each [`ClientEvent`] into a new state plus the effects to run.
//!
//! # Invariants
//! - `apply` never mutates `self`; it returns a fresh state.
//! - At most one create is in flight; submits while `loading` are ignored.
//! - Only the newest banner can be expired by its timer.

use std::time::Duration;

use namebook_core::{NameRecord, NewName};

use crate::validate::validate_draft;

/// How long an error banner stays up without manual dismissal.
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_secs(5);

pub const CREATE_FAILED_MESSAGE: &str = "Error adding name. Please try again.";

/// Form field of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    FirstName,
    LastName,
}

/// Unsubmitted form contents; never validated on keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameDraft {
    pub first_name: String,
    pub last_name: String,
}

/// Transient error message tagged with its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    names: Vec<NameRecord>,
    draft: NameDraft,
    loading: bool,
    error: Option<ErrorBanner>,
    last_generation: u64,
}

/// Inputs to the reducer: user actions and completed effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Started,
    NamesLoaded(Vec<NameRecord>),
    LoadFailed,
    FieldChanged(DraftField, String),
    SubmitRequested,
    CreateSucceeded(NameRecord),
    CreateFailed,
    ErrorDismissed,
    ErrorExpired { generation: u64 },
}

/// Work the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchNames,
    CreateName(NewName),
    ScheduleDismiss { generation: u64, after: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ClientState,
    pub effects: Vec<Effect>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[NameRecord] {
        &self.names
    }

    pub fn draft(&self) -> &NameDraft {
        &self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Submitting..."
        } else {
            "Submit"
        }
    }

    pub fn apply(&self, event: ClientEvent) -> Transition {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            ClientEvent::Started => effects.push(Effect::FetchNames),
            ClientEvent::NamesLoaded(names) => next.names = names,
            // The cache stays as it was; the driver logs the failure.
            ClientEvent::LoadFailed => {}
            ClientEvent::FieldChanged(DraftField::FirstName, value) => {
                next.draft.first_name = value;
            }
            ClientEvent::FieldChanged(DraftField::LastName, value) => {
                next.draft.last_name = value;
            }
            ClientEvent::SubmitRequested if self.loading => {}
            ClientEvent::SubmitRequested => match validate_draft(&self.draft, &self.names) {
                Ok(name) => {
                    next.loading = true;
                    next.error = None;
                    effects.push(Effect::CreateName(name));
                }
                Err(err) => {
                    effects.push(next.raise(err.to_string()));
                }
            },
            ClientEvent::CreateSucceeded(record) => {
                next.loading = false;
                next.names.insert(0, record);
                next.draft = NameDraft::default();
            }
            ClientEvent::CreateFailed => {
                next.loading = false;
                effects.push(next.raise(CREATE_FAILED_MESSAGE.to_string()));
            }
            ClientEvent::ErrorDismissed => next.error = None,
            ClientEvent::ErrorExpired { generation } => {
                if next
                    .error
                    .as_ref()
                    .is_some_and(|banner| banner.generation == generation)
                {
                    next.error = None;
                }
            }
        }

        Transition {
            state: next,
            effects,
        }
    }

    fn raise(&mut self, message: String) -> Effect {
        self.last_generation += 1;
        let generation = self.last_generation;
        self.error = Some(ErrorBanner {
            message,
            generation,
        });
        Effect::ScheduleDismiss {
            generation,
            after: ERROR_DISMISS_AFTER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: i64, first: &str, last: &str) -> NameRecord {
        let now = Utc::now();
        NameRecord {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn with_draft(state: ClientState, first: &str, last: &str) -> ClientState {
        let state = state
            .apply(ClientEvent::FieldChanged(DraftField::FirstName, first.to_string()))
            .state;
        state
            .apply(ClientEvent::FieldChanged(DraftField::LastName, last.to_string()))
            .state
    }

    #[test]
    fn start_requests_a_fetch() {
        let t = ClientState::new().apply(ClientEvent::Started);
        assert_eq!(t.effects, vec![Effect::FetchNames]);
        assert_eq!(t.state, ClientState::new());
    }

    #[test]
    fn apply_leaves_the_original_untouched() {
        let before = ClientState::new();
        let _ = before.apply(ClientEvent::FieldChanged(DraftField::FirstName, "Ada".into()));
        assert_eq!(before.draft().first_name, "");
    }

    #[test]
    fn blank_submit_raises_required_error_without_create() {
        let t = with_draft(ClientState::new(), "Ada", "  ").apply(ClientEvent::SubmitRequested);

        assert_eq!(
            t.state.error().map(|b| b.message.as_str()),
            Some("Both first name and last name are required")
        );
        assert!(!t.state.is_loading());
        assert_eq!(
            t.effects,
            vec![Effect::ScheduleDismiss {
                generation: 1,
                after: ERROR_DISMISS_AFTER
            }]
        );
    }

    #[test]
    fn valid_submit_sets_loading_and_requests_create() {
        let t = with_draft(ClientState::new(), " Ada ", "Lovelace").apply(ClientEvent::SubmitRequested);

        assert!(t.state.is_loading());
        assert_eq!(t.state.submit_label(), "Submitting...");
        match t.effects.as_slice() {
            [Effect::CreateName(name)] => assert_eq!(name.first_name(), "Ada"),
            other => panic!("unexpected effects: {other:?}"),
        }

        let again = t.state.apply(ClientEvent::SubmitRequested);
        assert!(again.effects.is_empty(), "second submit while in flight is ignored");
    }

    #[test]
    fn success_prepends_record_and_clears_draft() {
        let loaded = ClientState::new()
            .apply(ClientEvent::NamesLoaded(vec![record(1, "Alan", "Turing")]))
            .state;
        let pending = with_draft(loaded, "Ada", "Lovelace")
            .apply(ClientEvent::SubmitRequested)
            .state;

        let done = pending
            .apply(ClientEvent::CreateSucceeded(record(2, "Ada", "Lovelace")))
            .state;
        let ids: Vec<_> = done.names().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(done.draft(), &NameDraft::default());
        assert_eq!(done.submit_label(), "Submit");
    }

    #[test]
    fn failure_keeps_list_and_draft() {
        let loaded = ClientState::new()
            .apply(ClientEvent::NamesLoaded(vec![record(1, "Alan", "Turing")]))
            .state;
        let pending = with_draft(loaded, "Ada", "Lovelace")
            .apply(ClientEvent::SubmitRequested)
            .state;

        let failed = pending.apply(ClientEvent::CreateFailed).state;
        assert_eq!(failed.names().len(), 1);
        assert_eq!(failed.draft().first_name, "Ada");
        assert!(!failed.is_loading());
        assert_eq!(
            failed.error().map(|b| b.message.as_str()),
            Some(CREATE_FAILED_MESSAGE)
        );
    }

    #[test]
    fn stale_timer_does_not_dismiss_newer_banner() {
        let first = ClientState::new().apply(ClientEvent::SubmitRequested).state;
        let second = first.apply(ClientEvent::SubmitRequested).state;
        assert_eq!(second.error().map(|b| b.generation), Some(2));

        let after_stale = second.apply(ClientEvent::ErrorExpired { generation: 1 }).state;
        assert!(after_stale.error().is_some());

        let after_current = after_stale
            .apply(ClientEvent::ErrorExpired { generation: 2 })
            .state;
        assert!(after_current.error().is_none());
    }

    #[test]
    fn manual_dismiss_clears_banner() {
        let raised = ClientState::new().apply(ClientEvent::SubmitRequested).state;
        assert!(raised.error().is_some());
        assert!(raised.apply(ClientEvent::ErrorDismissed).state.error().is_none());
    }

    #[test]
    fn load_failure_keeps_empty_cache_and_shows_nothing() {
        let t = ClientState::new().apply(ClientEvent::LoadFailed);
        assert!(t.state.names().is_empty());
        assert!(t.state.error().is_none());
        assert!(t.effects.is_empty());
    }
}
