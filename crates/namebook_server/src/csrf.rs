//! Per-session anti-forgery tokens and the Tower layer that enforces them.
//!
//! `GET /` issues a session cookie and embeds the session's token in the page.
//! Mutating requests must echo that token in `X-CSRF-TOKEN`.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::{header, HeaderMap, Method, Request, StatusCode};
use log::{debug, warn};
use tower::{Layer, Service};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "namebook_session";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Laravel-compatible "page expired" status for token mismatches.
pub const CSRF_MISMATCH_STATUS: u16 = 419;

/// Idle time after which a session and its token are forgotten.
pub const SESSION_LIFETIME: Duration = Duration::from_secs(120 * 60);

/// Upper bound on live sessions; the least recently seen one is evicted.
pub const MAX_SESSIONS: usize = 10_000;

/// Session id and the anti-forgery token bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub session_id: String,
    pub token: String,
    /// True when the session was created by this call and needs a cookie.
    pub is_new: bool,
}

impl SessionToken {
    pub fn set_cookie_value(&self) -> String {
        format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.session_id
        )
    }
}

#[derive(Debug)]
struct SessionEntry {
    token: String,
    last_seen: Instant,
    /// Breaks `last_seen` ties when choosing an eviction victim.
    touch: u64,
}

/// In-memory session → token table with idle expiry and a size cap.
#[derive(Debug)]
pub struct CsrfTokens {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    lifetime: Duration,
    max_sessions: usize,
    touches: AtomicU64,
}

impl Default for CsrfTokens {
    fn default() -> Self {
        Self::with_limits(SESSION_LIFETIME, MAX_SESSIONS)
    }
}

impl CsrfTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// `max_sessions` below one is treated as one.
    pub fn with_limits(lifetime: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            lifetime,
            max_sessions: max_sessions.max(1),
            touches: AtomicU64::new(0),
        }
    }

    /// Returns the token for a live session, or opens a new session.
    pub fn issue(&self, session_id: Option<&str>) -> SessionToken {
        let now = Instant::now();
        let mut sessions = self.lock();
        self.prune_expired(&mut sessions, now);

        if let Some(id) = session_id {
            if let Some(entry) = sessions.get_mut(id) {
                entry.last_seen = now;
                entry.touch = self.next_touch();
                return SessionToken {
                    session_id: id.to_string(),
                    token: entry.token.clone(),
                    is_new: false,
                };
            }
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| (entry.last_seen, entry.touch))
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    debug!("event=session_evict module=api status=ok reason=capacity");
                }
                None => break,
            }
        }

        let session_id = Uuid::new_v4().simple().to_string();
        let token = Uuid::new_v4().simple().to_string();
        sessions.insert(
            session_id.clone(),
            SessionEntry {
                token: token.clone(),
                last_seen: now,
                touch: self.next_touch(),
            },
        );
        SessionToken {
            session_id,
            token,
            is_new: true,
        }
    }

    /// Expired sessions never verify; a match refreshes the session.
    pub fn verify(&self, session_id: &str, token: &str) -> bool {
        let now = Instant::now();
        let mut sessions = self.lock();
        self.prune_expired(&mut sessions, now);

        match sessions.get_mut(session_id) {
            Some(entry) if entry.token == token => {
                entry.last_seen = now;
                entry.touch = self.next_touch();
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_touch(&self) -> u64 {
        self.touches.fetch_add(1, Ordering::Relaxed)
    }

    fn prune_expired(&self, sessions: &mut HashMap<String, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.lifetime);
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!("event=session_prune module=api status=ok count={pruned}");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
        // The map stays consistent even if a holder panicked mid-request.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reads the session id from the `Cookie` header.
pub fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok())
}

/// Tower `Layer` that rejects unsafe requests without a valid token.
#[derive(Clone)]
pub struct CsrfLayer {
    tokens: Arc<CsrfTokens>,
}

impl CsrfLayer {
    pub fn new(tokens: Arc<CsrfTokens>) -> Self {
        Self { tokens }
    }
}

impl<S> Layer<S> for CsrfLayer {
    type Service = CsrfService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CsrfService {
            inner,
            tokens: self.tokens.clone(),
        }
    }
}

/// Tower `Service` produced by [`CsrfLayer`].
#[derive(Clone)]
pub struct CsrfService<S> {
    inner: S,
    tokens: Arc<CsrfTokens>,
}

impl<S> Service<Request<Body>> for CsrfService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let accepted = is_safe_method(req.method()) || self.has_valid_token(req.headers());
        if !accepted {
            warn!(
                "event=csrf_check module=api status=rejected method={} path={}",
                req.method(),
                req.uri().path()
            );
        }

        Box::pin(async move {
            if !accepted {
                return Ok(mismatch_response());
            }
            let resp = inner
                .call(req)
                .await
                .unwrap_or_else(|infallible| match infallible {});
            Ok(resp.into_response())
        })
    }
}

impl<S> CsrfService<S> {
    fn has_valid_token(&self, headers: &HeaderMap) -> bool {
        match (session_from_headers(headers), token_from_headers(headers)) {
            (Some(session_id), Some(token)) => self.tokens.verify(&session_id, token),
            _ => false,
        }
    }
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn mismatch_response() -> Response {
    let status =
        StatusCode::from_u16(CSRF_MISMATCH_STATUS).unwrap_or(StatusCode::FORBIDDEN);
    let body = serde_json::json!({ "message": "CSRF token mismatch." });
    (status, axum::Json(body)).into_response()
}
