//! Terminal client for Namebook.
//!
//! # Responsibility
//! - Keep a local cache of names, the form draft and a transient banner.
//! - Validate drafts locally before any network call.
//! - Talk to the server through the [`NamesApi`] seam.
//!
//! # Invariants
//! - State changes only through [`ClientState::apply`].
//! - Network failures become banners or log lines, never panics.

#![forbid(unsafe_code)]

pub mod api;
pub mod app;
pub mod http;
pub mod render;
pub mod repl;
pub mod state;
pub mod token;
pub mod validate;

pub use api::{ClientError, ClientResult, NamesApi};
pub use app::NameApp;
pub use http::HttpNamesApi;
pub use render::{render_table, render_view, EMPTY_LIST_MESSAGE};
pub use repl::{parse_command, ReplCommand};
pub use state::{
    ClientEvent, ClientState, DraftField, Effect, ErrorBanner, NameDraft, Transition,
    CREATE_FAILED_MESSAGE, ERROR_DISMISS_AFTER,
};
pub use token::{MetaTagTokenProvider, StaticTokenProvider, TokenProvider};
pub use validate::{validate_draft, DraftError};
