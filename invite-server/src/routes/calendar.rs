//! Calendar feed endpoint

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use invite_core::ics;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/weddings/calendars/{file}", get(calendar))
}

/// GET /weddings/calendars/{slug}.ics - Calendar built from the current details
async fn calendar(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let Some(slug) = file.strip_suffix(".ics").filter(|s| state.is_valid_slug(s)) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let details = state.load(slug)?;
    let settings = state.config().calendar_settings()?;
    let body = ics::generate(&details, slug, &settings);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::{StatusCode, header};

    #[tokio::test]
    async fn serves_generated_calendar() {
        let (_dir, app) = app();
        let response = send(&app, get("/weddings/calendars/asha-rohan.ics")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/calendar; charset=utf-8"
        );
        let body = body_text(response).await;
        assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(body.contains("UID:asha-rohan-brunch@invites.test\r\n"));
        assert!(body.contains("UID:asha-rohan-ceremony@invites.test\r\n"));
    }

    #[tokio::test]
    async fn unknown_or_reserved_calendars_are_not_found() {
        let (_dir, app) = app();

        for uri in [
            "/weddings/calendars/nobody.ics",
            "/weddings/calendars/template.ics",
            "/weddings/calendars/asha-rohan.json",
        ] {
            let response = send(&app, get(uri)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn unreadable_details_are_a_server_error() {
        let (_dir, app) = app();
        let response = send(&app, get("/weddings/calendars/broken.ics")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
