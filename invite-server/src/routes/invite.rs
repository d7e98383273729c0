//! Invite page and unlock endpoints

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use invite_core::html::{self, LockScreen, WRONG_PASSWORD};
use invite_core::render::{ThemeMode, render};
use invite_core::{Details, Gate, GateState};
use serde::Deserialize;
use tracing::{info, warn};

use crate::cookies::CookieUnlockStore;
use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weddings/{slug}", get(show_invite))
        .route("/weddings/{slug}/unlock", post(unlock))
}

#[derive(Deserialize)]
pub struct InviteQuery {
    /// `dark` selects dark-mode decor
    pub mode: Option<String>,
    /// `open` is a click on the in-page RSVP button
    pub rsvp: Option<String>,
}

#[derive(Deserialize)]
pub struct UnlockForm {
    pub password: String,
}

/// GET /weddings/{slug} - The invite, or its lock screen
async fn show_invite(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<InviteQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(details) = load(&state, &slug) else {
        return Ok(missing(&slug));
    };

    let gate = Gate::new(&slug, details, CookieUnlockStore::from_headers(&headers));
    if let GateState::Locked { hint } = gate.state() {
        return Ok(Html(html::lock_screen(&LockScreen {
            slug,
            hint,
            error: None,
            missing: false,
        }))
        .into_response());
    }

    let mode = match query.mode.as_deref() {
        Some("dark") => ThemeMode::Dark,
        _ => ThemeMode::Light,
    };
    let mut options = state.render_options()?;
    options.theme_mode = mode;

    let mut page = render(gate.details(), &state.config().calendar_url(&slug), &options)?;
    if query.rsvp.as_deref() == Some("open") {
        if let Some(rsvp) = page.rsvp.as_mut() {
            rsvp.click();
        }
    }

    Ok(Html(html::page(&page, mode)).into_response())
}

/// POST /weddings/{slug}/unlock - Check a password and remember a match
async fn unlock(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Form(form): Form<UnlockForm>,
) -> Result<Response, AppError> {
    let Some(details) = load(&state, &slug) else {
        return Ok(missing(&slug));
    };

    let mut gate = Gate::new(&slug, details, CookieUnlockStore::from_headers(&headers));
    if gate.attempt_unlock(&form.password)? {
        info!(slug = %slug, "invite unlocked");
        let mut response = Redirect::to(&format!("/weddings/{slug}")).into_response();
        for cookie in gate.store().set_cookies() {
            response
                .headers_mut()
                .append(SET_COOKIE, HeaderValue::from_str(cookie)?);
        }
        return Ok(response);
    }

    let hint = match gate.state() {
        GateState::Locked { hint } => hint,
        GateState::Unlocked => None,
    };
    let body = html::lock_screen(&LockScreen {
        slug,
        hint,
        error: Some(WRONG_PASSWORD.to_string()),
        missing: false,
    });
    Ok((StatusCode::UNAUTHORIZED, Html(body)).into_response())
}

/// Details for `slug`, or `None` when the invite should show as missing.
fn load(state: &AppState, slug: &str) -> Option<Details> {
    if !state.is_valid_slug(slug) {
        return None;
    }
    state
        .load(slug)
        .inspect_err(|e| warn!(slug, error = %e, "could not load invite"))
        .ok()
}

fn missing(slug: &str) -> Response {
    let body = html::lock_screen(&LockScreen {
        slug: slug.to_string(),
        missing: true,
        ..Default::default()
    });
    (StatusCode::NOT_FOUND, Html(body)).into_response()
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};

    fn unlock_request(slug: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/weddings/{slug}/unlock"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("password={password}")))
            .unwrap()
    }

    fn with_cookie(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, "weddings-asha-rohan-unlocked=true")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn locked_invite_shows_lock_screen_with_hint() {
        let (_dir, app) = app();
        let response = send(&app, get("/weddings/asha-rohan")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"id="lockScreen""#));
        assert!(body.contains("The date, DDMM"));
        assert!(!body.contains("coupleNames"));
    }

    #[tokio::test]
    async fn unknown_invite_shows_missing_state() {
        let (_dir, app) = app();

        for uri in ["/weddings/nobody", "/weddings/broken", "/weddings/template"] {
            let response = send(&app, get(uri)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            let body = body_text(response).await;
            assert!(body.contains(r#"id="missingMsg""#));
            assert!(!body.contains("<form"));
        }
    }

    #[tokio::test]
    async fn numeric_password_unlocks_and_sets_cookie() {
        let (_dir, app) = app();
        let response = send(&app, unlock_request("asha-rohan", "2512")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/weddings/asha-rohan");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("weddings-asha-rohan-unlocked=true;"));
    }

    #[tokio::test]
    async fn wrong_password_can_be_retried() {
        let (_dir, app) = app();

        for _ in 0..5 {
            let response = send(&app, unlock_request("asha-rohan", "1234")).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert!(response.headers().get(header::SET_COOKIE).is_none());
            let body = body_text(response).await;
            assert!(body.contains(r#"id="errorMsg""#));
        }

        let response = send(&app, unlock_request("asha-rohan", "2512")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn unlocked_invite_renders_page() {
        let (_dir, app) = app();
        let response = send(&app, with_cookie("/weddings/asha-rohan")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"<h1 id="coupleNames">Asha &amp; Rohan</h1>"#));
        assert!(body.contains("webcal://invites.test/weddings/calendars/asha-rohan.ics"));
        assert!(body.contains("opacity: 0.25"));
        assert!(!body.contains("rsvpIframe"));
    }

    #[tokio::test]
    async fn dark_mode_and_rsvp_click() {
        let (_dir, app) = app();
        let response = send(&app, with_cookie("/weddings/asha-rohan?mode=dark&rsvp=open")).await;

        let body = body_text(response).await;
        assert!(body.contains(r#"<html lang="en" class="dark">"#));
        assert!(body.contains("opacity: 0.5"));
        assert!(body.contains(r#"<iframe id="rsvpIframe" src="https://forms.example/e""#));
    }
}
