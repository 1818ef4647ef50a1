//! Request-scoped session context.
//!
//! Sessions live in a [`SessionStore`] keyed by a random id carried in the
//! `medayu_sid` cookie. Each request loads its [`SessionData`] into a
//! [`RequestContext`]; handlers read the bound manager, push one-shot flash
//! messages and re-populated form values, and hand the context back through
//! [`RequestContext::redirect`] or [`RequestContext::render`], which persist it.
//! Flashes and form values are consumed by the next page that renders them.
//!
//! Entries idle longer than the store's timeout are dropped. Anonymous
//! sessions (no bound manager) are also capped in number; when the cap is
//! reached the least recently touched anonymous session is evicted.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use medayu_core::ManagerId;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "medayu_sid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub manager: Option<ManagerId>,
    pub flashes: Vec<Flash>,
    pub form: Option<serde_json::Value>,
}

impl SessionData {
    fn is_empty(&self) -> bool {
        self.manager.is_none() && self.flashes.is_empty() && self.form.is_none()
    }
}

/// Sessions untouched for this long are discarded.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Most anonymous sessions kept at once.
pub const ANONYMOUS_SESSION_LIMIT: usize = 256;

#[derive(Debug)]
struct Entry {
    data: SessionData,
    touched: Instant,
}

/// Server-side session storage.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Entry>,
    idle_timeout: Duration,
    anonymous_limit: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(SESSION_IDLE_TIMEOUT, ANONYMOUS_SESSION_LIMIT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_timeout: Duration, anonymous_limit: usize) -> Self {
        SessionStore {
            sessions: DashMap::new(),
            idle_timeout,
            anonymous_limit,
        }
    }

    /// Returns the session under `id` unless it has gone idle.
    pub fn load(&self, id: &Uuid) -> Option<SessionData> {
        self.sessions
            .remove_if(id, |_, entry| entry.touched.elapsed() > self.idle_timeout);
        self.sessions.get(id).map(|entry| entry.data.clone())
    }

    pub fn save(&self, id: Uuid, data: SessionData) {
        if data.manager.is_none() && !self.sessions.contains_key(&id) {
            self.make_room_for_anonymous();
        }
        self.sessions.insert(
            id,
            Entry {
                data,
                touched: Instant::now(),
            },
        );
    }

    pub fn remove(&self, id: &Uuid) {
        self.sessions.remove(id);
    }

    /// Drops every idle session and returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.touched.elapsed() <= self.idle_timeout);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn anonymous_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| entry.data.manager.is_none())
            .count()
    }

    fn make_room_for_anonymous(&self) {
        if self.anonymous_count() < self.anonymous_limit {
            return;
        }
        let idle = self.evict_idle();
        if idle > 0 {
            tracing::debug!(removed = idle, "evicted idle sessions");
        }
        while self.anonymous_count() >= self.anonymous_limit {
            let oldest = self
                .sessions
                .iter()
                .filter(|entry| entry.data.manager.is_none())
                .min_by_key(|entry| entry.touched)
                .map(|entry| *entry.key());
            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                    tracing::debug!(session = %id, "evicted oldest anonymous session");
                }
                None => break,
            }
        }
    }
}

/// The session state of one request.
#[derive(Debug)]
pub struct RequestContext {
    sessions: Arc<SessionStore>,
    id: Uuid,
    /// Whether the client already holds `id` in its cookie.
    known_to_client: bool,
    data: SessionData,
}

impl RequestContext {
    /// Loads the session named by the request's cookie.
    ///
    /// Unknown or malformed ids start a fresh session under a new id.
    pub fn from_headers(sessions: Arc<SessionStore>, headers: &HeaderMap) -> Self {
        let existing = session_id_from_headers(headers)
            .and_then(|id| sessions.load(&id).map(|data| (id, data)));
        match existing {
            Some((id, data)) => RequestContext {
                sessions,
                id,
                known_to_client: true,
                data,
            },
            None => RequestContext {
                sessions,
                id: Uuid::new_v4(),
                known_to_client: false,
                data: SessionData::default(),
            },
        }
    }

    pub fn manager(&self) -> Option<ManagerId> {
        self.data.manager
    }

    /// Binds a manager to the session under a fresh session id.
    pub fn sign_in(&mut self, manager: ManagerId) {
        self.rotate();
        self.data.manager = Some(manager);
    }

    /// Drops the bound manager and any pending form values.
    pub fn sign_out(&mut self) {
        self.rotate();
        self.data.manager = None;
        self.data.form = None;
    }

    fn rotate(&mut self) {
        self.sessions.remove(&self.id);
        self.id = Uuid::new_v4();
        self.known_to_client = false;
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.data.flashes.push(Flash {
            kind: FlashKind::Success,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.data.flashes.push(Flash {
            kind: FlashKind::Error,
            message: message.into(),
        });
    }

    /// Keeps submitted values so the next form render can re-populate them.
    pub fn keep_form<T: Serialize>(&mut self, values: &T) {
        match serde_json::to_value(values) {
            Ok(value) => self.data.form = Some(value),
            Err(err) => tracing::warn!(error = %err, "could not keep form values"),
        }
    }

    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.data.flashes)
    }

    pub fn take_form(&mut self) -> Option<serde_json::Value> {
        self.data.form.take()
    }

    /// Persists the session and answers `303 See Other` to `to`.
    pub fn redirect(self, to: &str) -> Response {
        let mut response = Redirect::to(to).into_response();
        self.persist(response.headers_mut());
        response
    }

    /// Persists the session and answers with `page` as JSON.
    pub fn render<T: Serialize>(self, page: T) -> Response {
        let mut response = Json(page).into_response();
        self.persist(response.headers_mut());
        response
    }

    fn persist(self, headers: &mut HeaderMap) {
        if self.data.is_empty() {
            self.sessions.remove(&self.id);
            return;
        }
        if !self.known_to_client {
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, self.id
            );
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.append(SET_COOKIE, value);
            }
        }
        self.sessions.save(self.id, self.data);
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::from_headers(
            state.sessions.clone(),
            &parts.headers,
        ))
    }
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn set_cookie_id(response: &Response) -> Uuid {
        let raw = response.headers()[SET_COOKIE].to_str().unwrap();
        let value = raw.split(';').next().unwrap();
        Uuid::parse_str(value.trim_start_matches("medayu_sid=")).unwrap()
    }

    #[test]
    fn parses_cookie_among_others() {
        let id = Uuid::new_v4();
        let headers = cookie_headers(&format!("theme=dark; medayu_sid={}; lang=id", id));
        assert_eq!(session_id_from_headers(&headers), Some(id));
        assert_eq!(session_id_from_headers(&cookie_headers("medayu_sid=nope")), None);
    }

    #[test]
    fn anonymous_empty_session_is_not_stored() {
        let store = Arc::new(SessionStore::new());
        let ctx = RequestContext::from_headers(store.clone(), &HeaderMap::new());
        let response = ctx.redirect("/login");
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn flashes_are_one_shot() {
        let store = Arc::new(SessionStore::new());
        let mut ctx = RequestContext::from_headers(store.clone(), &HeaderMap::new());
        ctx.error("Photo is required");
        ctx.keep_form(&serde_json::json!({ "ordinal": "abc" }));
        let response = ctx.redirect("/manager/carousel/create-form");
        let id = set_cookie_id(&response);

        let headers = cookie_headers(&format!("medayu_sid={}", id));
        let mut next = RequestContext::from_headers(store.clone(), &headers);
        let flashes = next.take_flashes();
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].kind, FlashKind::Error);
        assert_eq!(next.take_form().unwrap()["ordinal"], "abc");
        next.render(serde_json::json!({}));

        // Consumed: the emptied session is dropped.
        let mut third = RequestContext::from_headers(store.clone(), &headers);
        assert!(third.take_flashes().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn sign_in_rotates_the_session_id() {
        let store = Arc::new(SessionStore::new());
        let mut ctx = RequestContext::from_headers(store.clone(), &HeaderMap::new());
        ctx.error("Password is required");
        let first = set_cookie_id(&ctx.redirect("/login"));

        let mut ctx = RequestContext::from_headers(
            store.clone(),
            &cookie_headers(&format!("medayu_sid={}", first)),
        );
        ctx.sign_in(ManagerId(1));
        let response = ctx.redirect("/manager/dashboard");
        let second = set_cookie_id(&response);

        assert_ne!(first, second);
        assert!(store.load(&first).is_none());
        assert_eq!(store.load(&second).unwrap().manager, Some(ManagerId(1)));
    }

    #[test]
    fn unknown_session_id_is_replaced() {
        let store = Arc::new(SessionStore::new());
        let forged = Uuid::new_v4();
        let mut ctx = RequestContext::from_headers(
            store.clone(),
            &cookie_headers(&format!("medayu_sid={}", forged)),
        );
        ctx.success("hello");
        let issued = set_cookie_id(&ctx.redirect("/login"));
        assert_ne!(issued, forged);
        assert_eq!(store.len(), 1);
    }

    fn anonymous_flash(store: &Arc<SessionStore>) -> Uuid {
        let mut ctx = RequestContext::from_headers(store.clone(), &HeaderMap::new());
        ctx.error("You do not have access to this page");
        set_cookie_id(&ctx.redirect("/login"))
    }

    #[test]
    fn anonymous_sessions_are_capped() {
        let store = Arc::new(SessionStore::with_limits(SESSION_IDLE_TIMEOUT, 4));
        let first = anonymous_flash(&store);
        for _ in 0..50 {
            anonymous_flash(&store);
        }
        assert_eq!(store.len(), 4);
        // The oldest anonymous session made room for the newer ones.
        assert!(store.load(&first).is_none());
    }

    #[test]
    fn signed_in_sessions_survive_the_anonymous_cap() {
        let store = Arc::new(SessionStore::with_limits(SESSION_IDLE_TIMEOUT, 2));
        let mut ctx = RequestContext::from_headers(store.clone(), &HeaderMap::new());
        ctx.sign_in(ManagerId(7));
        let signed_in = set_cookie_id(&ctx.redirect("/manager/dashboard"));
        for _ in 0..10 {
            anonymous_flash(&store);
        }
        assert_eq!(store.len(), 3);
        assert_eq!(store.load(&signed_in).unwrap().manager, Some(ManagerId(7)));
    }

    #[test]
    fn idle_sessions_expire() {
        let store = Arc::new(SessionStore::with_limits(Duration::ZERO, 16));
        let id = anonymous_flash(&store);
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.load(&id).is_none());
        assert!(store.is_empty());

        anonymous_flash(&store);
        anonymous_flash(&store);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.evict_idle(), 2);
        assert!(store.is_empty());
    }
}
