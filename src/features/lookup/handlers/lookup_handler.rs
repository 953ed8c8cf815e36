use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use validator::Validate;

use crate::core::config::DashboardConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::AdminSession;
use crate::features::limits::{LimitInput, LimitKind};
use crate::features::lookup::dtos::{lookup_url, LimitForm, LookupQuery, LookupUserView, LookupView};
use crate::modules::admin_api::{AdminApi, ErrorDetail};
use crate::shared::templates::render_template;
use crate::shared::validation::{MAX_USER_ID_LEN, USER_ID_REGEX};

fn render_lookup(status: StatusCode, view: &LookupView) -> Result<Response> {
    let html = render_template("lookup.html", view)?;
    Ok((status, Html(html)).into_response())
}

fn validate_path_id(user_id: &str) -> Result<()> {
    if user_id.len() as u64 <= MAX_USER_ID_LEN && USER_ID_REGEX.is_match(user_id) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid user ID: {}", user_id)))
    }
}

/// Fetch the user and render the lookup page, optionally with a submitted
/// card value or a blocking alert from a failed write
async fn fetch_and_render(
    api: &dyn AdminApi,
    settings: &DashboardConfig,
    user_id: &str,
    submitted: Option<(LimitKind, LimitInput, Option<String>)>,
    alert: Option<String>,
    status: StatusCode,
) -> Result<Response> {
    let mut view = LookupView {
        user_id: user_id.to_string(),
        alert,
        ..Default::default()
    };

    let status = match api.get_user(user_id).await {
        Ok(user) => {
            let mut user_view = LookupUserView::new(&user, settings.remove_override_rule);
            if let Some((kind, input, error)) = submitted {
                user_view = user_view.with_submitted(kind, input, error);
            }
            view.user = Some(user_view);
            status
        }
        Err(e) => {
            tracing::warn!("Failed to look up user {}: {}", user_id, e);
            view.error = Some(ErrorDetail::from(&e));
            if e.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_GATEWAY
            }
        }
    };

    render_lookup(status, &view)
}

/// Look up a single user by id
pub async fn lookup_user(
    AdminSession(api): AdminSession,
    State(settings): State<Arc<DashboardConfig>>,
    Query(query): Query<LookupQuery>,
) -> Result<Response> {
    let query = query.normalized();

    let Some(user_id) = query.user_id.clone() else {
        return render_lookup(StatusCode::OK, &LookupView::default());
    };

    if let Err(e) = query.validate() {
        let view = LookupView {
            user_id,
            error: Some(ErrorDetail::message(e.to_string())),
            ..Default::default()
        };
        return render_lookup(StatusCode::UNPROCESSABLE_ENTITY, &view);
    }

    fetch_and_render(api.as_ref(), &settings, &user_id, None, None, StatusCode::OK).await
}

/// Set one limit override from its configuration card
pub async fn set_limit(
    AdminSession(api): AdminSession,
    State(settings): State<Arc<DashboardConfig>>,
    Path((user_id, kind)): Path<(String, LimitKind)>,
    Form(form): Form<LimitForm>,
) -> Result<Response> {
    validate_path_id(&user_id)?;
    let input = form.input();

    let value = match input.encode() {
        Ok(value) => value,
        Err(e) => {
            let error = format!("{}: {}", kind.label(), e);
            return fetch_and_render(
                api.as_ref(),
                &settings,
                &user_id,
                Some((kind, input, Some(error))),
                None,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    match api.set_override(kind, &user_id, value).await {
        Ok(_) => {
            tracing::info!("Set {} override for user {} to {:?}", kind, user_id, value);
            Ok(Redirect::to(&lookup_url(&user_id)).into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to set {} for user {}: {}", kind, user_id, e);
            let alert = format!("Failed to set {}: {}", kind.label(), e);
            fetch_and_render(
                api.as_ref(),
                &settings,
                &user_id,
                Some((kind, input, None)),
                Some(alert),
                StatusCode::BAD_GATEWAY,
            )
            .await
        }
    }
}

/// Clear one limit override
pub async fn remove_limit(
    AdminSession(api): AdminSession,
    State(settings): State<Arc<DashboardConfig>>,
    Path((user_id, kind)): Path<(String, LimitKind)>,
) -> Result<Response> {
    validate_path_id(&user_id)?;

    match api.set_override(kind, &user_id, None).await {
        Ok(_) => {
            tracing::info!("Removed {} override for user {}", kind, user_id);
            Ok(Redirect::to(&lookup_url(&user_id)).into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to remove {} for user {}: {}", kind, user_id, e);
            let alert = format!("Failed to remove {} override: {}", kind.label(), e);
            fetch_and_render(
                api.as_ref(),
                &settings,
                &user_id,
                None,
                Some(alert),
                StatusCode::BAD_GATEWAY,
            )
            .await
        }
    }
}
