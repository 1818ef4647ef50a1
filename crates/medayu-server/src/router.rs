//! Router assembly for the manager backend.
//!
//! [`build_router`] wires every handler to its route, serves the converted
//! images under `/images`, and adds the upload body limit and request
//! tracing layers.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use medayu_core::{ProfileId, ProfileKind};

use crate::auth::ManagerSession;
use crate::handlers::{account, announcements, carousel, dashboard, profiles};
use crate::state::AppState;

/// Builds the complete router.
///
/// Routes use axum 0.8 `/{param}` path syntax.
pub fn build_router(state: AppState) -> Router {
    let images = ServeDir::new(&state.config.image_root);
    let body_limit = state.config.max_upload_bytes;

    let mut router = Router::new()
        .route("/", get(account::home))
        .route("/login", get(account::login_page).post(account::login))
        .route("/logout", post(account::logout))
        .route("/manager/dashboard", get(dashboard::dashboard))
        .route(
            "/manager/password",
            get(account::password_page).post(account::change_password),
        )
        .nest("/manager/carousel", carousel_routes())
        .nest("/manager/announcements", announcement_routes());
    for kind in ProfileKind::ALL {
        router = router.nest(&format!("/manager/{}", kind.slug()), profile_routes(kind));
    }

    router
        .nest_service("/images", images)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn carousel_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(carousel::list))
        .route("/create-form", get(carousel::create_form))
        .route("/create", post(carousel::create))
        .route("/edit-form/{id}", get(carousel::edit_form))
        .route("/update/{id}", post(carousel::update))
        .route("/delete/{id}", post(carousel::delete))
}

fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(announcements::list))
        .route("/create-form", get(announcements::create_form))
        .route("/create", post(announcements::create))
        .route("/edit-form/{id}", get(announcements::edit_form))
        .route("/update/{id}", post(announcements::update))
        .route("/delete/{id}", post(announcements::delete))
}

/// The same six routes for each profile kind, with the kind bound in.
fn profile_routes(kind: ProfileKind) -> Router<AppState> {
    Router::new()
        .route(
            "/list",
            get(move |State(state): State<AppState>, session: ManagerSession| {
                profiles::list(kind, state, session)
            }),
        )
        .route(
            "/create-form",
            get(move |session: ManagerSession| profiles::create_form(kind, session)),
        )
        .route(
            "/create",
            post(
                move |State(state): State<AppState>, session: ManagerSession, multipart: Multipart| {
                    profiles::create(kind, state, session, multipart)
                },
            ),
        )
        .route(
            "/edit-form/{id}",
            get(
                move |State(state): State<AppState>, Path(id): Path<i64>, session: ManagerSession| {
                    profiles::edit_form(kind, state, ProfileId(id), session)
                },
            ),
        )
        .route(
            "/update/{id}",
            post(
                move |State(state): State<AppState>,
                      Path(id): Path<i64>,
                      session: ManagerSession,
                      multipart: Multipart| {
                    profiles::update(kind, state, ProfileId(id), session, multipart)
                },
            ),
        )
        .route(
            "/delete/{id}",
            post(
                move |State(state): State<AppState>, Path(id): Path<i64>, session: ManagerSession| {
                    profiles::delete(kind, state, ProfileId(id), session)
                },
            ),
        )
}
