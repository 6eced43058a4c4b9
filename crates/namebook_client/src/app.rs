//! Effect driver: feeds events through the reducer and runs the effects.
//!
//! # Invariants
//! - Every network call completes into exactly one follow-up event.
//! - No failure escapes as an error; failures become state or log lines.
//! - Dismiss timers are deadlines checked by [`NameApp::expire_errors`].

use std::collections::VecDeque;
use std::time::Instant;

use log::{info, warn};

use crate::api::{ClientError, NamesApi};
use crate::state::{ClientEvent, ClientState, DraftField, Effect};
use crate::token::TokenProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingDismiss {
    generation: u64,
    due: Instant,
}

/// One client instance: state plus its injected capabilities.
pub struct NameApp<A: NamesApi, T: TokenProvider> {
    api: A,
    tokens: T,
    state: ClientState,
    timers: Vec<PendingDismiss>,
}

impl<A: NamesApi, T: TokenProvider> NameApp<A, T> {
    pub fn new(api: A, tokens: T) -> Self {
        Self {
            api,
            tokens,
            state: ClientState::new(),
            timers: Vec::new(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Initial load; failures leave the cache empty.
    pub async fn load(&mut self) {
        self.dispatch(ClientEvent::Started).await;
    }

    pub async fn change_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.dispatch(ClientEvent::FieldChanged(field, value.into()))
            .await;
    }

    pub async fn submit(&mut self) {
        self.dispatch(ClientEvent::SubmitRequested).await;
    }

    pub async fn dismiss_error(&mut self) {
        self.dispatch(ClientEvent::ErrorDismissed).await;
    }

    /// Fires every dismiss timer due at `now`.
    pub async fn expire_errors(&mut self, now: Instant) {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|timer| timer.due <= now);
        self.timers = pending;
        for timer in due {
            self.dispatch(ClientEvent::ErrorExpired {
                generation: timer.generation,
            })
            .await;
        }
    }

    /// Earliest pending dismiss deadline, if any.
    pub fn next_dismiss_at(&self) -> Option<Instant> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    async fn dispatch(&mut self, event: ClientEvent) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let transition = self.state.apply(event);
            self.state = transition.state;
            for effect in transition.effects {
                if let Some(follow_up) = self.run(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    async fn run(&mut self, effect: Effect) -> Option<ClientEvent> {
        match effect {
            Effect::FetchNames => match self.api.list_names().await {
                Ok(names) => {
                    info!(
                        "event=names_load module=client status=ok count={}",
                        names.len()
                    );
                    Some(ClientEvent::NamesLoaded(names))
                }
                Err(err) => {
                    warn!("event=names_load module=client status=error error={err}");
                    Some(ClientEvent::LoadFailed)
                }
            },
            Effect::CreateName(name) => {
                let result = match self.tokens.csrf_token() {
                    Some(token) => self.api.create_name(&name, &token).await,
                    None => Err(ClientError::MissingToken),
                };
                match result {
                    Ok(record) => {
                        info!(
                            "event=name_create module=client status=ok id={}",
                            record.id
                        );
                        Some(ClientEvent::CreateSucceeded(record))
                    }
                    Err(err) => {
                        warn!("event=name_create module=client status=error error={err}");
                        Some(ClientEvent::CreateFailed)
                    }
                }
            }
            Effect::ScheduleDismiss { generation, after } => {
                self.timers.push(PendingDismiss {
                    generation,
                    due: Instant::now() + after,
                });
                None
            }
        }
    }
}
