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
use crate::features::limits::{LimitInput, LimitInputError, LimitKind, QuotaView, RemoveOverrideRule};
use crate::features::users::dtos::{
    user_base_url, users_url, EditLimitsForm, EditUserView, RemoveOverrideForm, ReturnPageQuery,
    UsersPageView, UsersQuery,
};
use crate::modules::admin_api::{AdminApi, AdminApiError, ErrorDetail, User};
use crate::shared::templates::render_template;

/// Dimensions editable from the users list
const EDITABLE: [LimitKind; 2] = [LimitKind::RequestLimit, LimitKind::AccessKeyLimit];

/// Submitted input and field error to show instead of the prefilled value
type Submitted = (LimitKind, LimitInput, Option<String>);

fn render_edit(status: StatusCode, view: &EditUserView) -> Result<Response> {
    let html = render_template("edit_user.html", view)?;
    Ok((status, Html(html)).into_response())
}

fn edit_limits(user: &User, rule: RemoveOverrideRule, submitted: &[Submitted]) -> Vec<QuotaView> {
    let plan = user.plan();
    EDITABLE
        .iter()
        .map(|&kind| {
            let view = QuotaView::build(kind, user.quota(kind), &plan, rule);
            match submitted.iter().find(|(k, _, _)| *k == kind) {
                Some((_, input, error)) => view.with_submitted(input.clone(), error.clone()),
                None => view,
            }
        })
        .collect()
}

fn load_failure(
    user_id: &str,
    page: u32,
    error: AdminApiError,
    failures: Vec<String>,
) -> Result<Response> {
    tracing::warn!("Failed to load user {}: {}", user_id, error);
    let status = if error.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_GATEWAY
    };
    let view = EditUserView::failed(user_id, page, ErrorDetail::from(&error)).with_failures(failures);
    render_edit(status, &view)
}

/// Refetch the user and render the edit form over the fresh state
async fn rerender_edit(
    api: &dyn AdminApi,
    user_id: &str,
    page: u32,
    rule: RemoveOverrideRule,
    submitted: &[Submitted],
    failures: Vec<String>,
    status: StatusCode,
) -> Result<Response> {
    match api.get_user(user_id).await {
        Ok(user) => {
            let view = EditUserView::new(&user, page, edit_limits(&user, rule, submitted))
                .with_failures(failures);
            render_edit(status, &view)
        }
        Err(e) => load_failure(user_id, page, e, failures),
    }
}

/// `Some(value)` when the field differs from what the form was rendered with
fn pending_change(
    form: &EditLimitsForm,
    kind: LimitKind,
) -> std::result::Result<Option<Option<i64>>, LimitInputError> {
    let value = form.input(kind).encode()?;
    let unchanged = form
        .initial(kind)
        .and_then(|initial| initial.encode().ok())
        .is_some_and(|initial| initial == value);

    Ok((!unchanged).then_some(value))
}

async fn apply_change(
    api: &dyn AdminApi,
    kind: LimitKind,
    user_id: &str,
    change: Option<Option<i64>>,
) -> Option<(LimitKind, std::result::Result<User, AdminApiError>)> {
    let value = change?;
    Some((kind, api.set_override(kind, user_id, value).await))
}

/// Users list with client-side search over the fetched page
pub async fn list_users(
    AdminSession(api): AdminSession,
    State(settings): State<Arc<DashboardConfig>>,
    Query(query): Query<UsersQuery>,
) -> Result<Html<String>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let page = query.page();
    let search = query.search();
    let per_page = settings.users_page_size;

    let view = match api.list_users(page, per_page).await {
        Ok(result) => UsersPageView::from_page(result, &search, per_page),
        Err(e) => {
            tracing::warn!("Failed to fetch users page {}: {}", page, e);
            UsersPageView::failed(page, &search, ErrorDetail::from(&e))
        }
    };

    Ok(Html(render_template("users.html", &view)?))
}

/// Edit form for a user's request and access-key limits
pub async fn edit_user(
    AdminSession(api): AdminSession,
    State(settings): State<Arc<DashboardConfig>>,
    Path(user_id): Path<String>,
    Query(query): Query<ReturnPageQuery>,
) -> Result<Response> {
    let page = query.page();

    match api.get_user(&user_id).await {
        Ok(user) => {
            let limits = edit_limits(&user, settings.remove_override_rule, &[]);
            render_edit(StatusCode::OK, &EditUserView::new(&user, page, limits))
        }
        Err(e) => load_failure(&user_id, page, e, Vec::new()),
    }
}

/// Save both limits; changed dimensions are written concurrently and
/// each failure is reported on its own
pub async fn save_user_limits(
    AdminSession(api): AdminSession,
    State(settings): State<Arc<DashboardConfig>>,
    Path(user_id): Path<String>,
    Form(form): Form<EditLimitsForm>,
) -> Result<Response> {
    let page = form.page();
    let rule = settings.remove_override_rule;

    let requests = pending_change(&form, LimitKind::RequestLimit);
    let access_keys = pending_change(&form, LimitKind::AccessKeyLimit);

    let (requests, access_keys) = match (requests, access_keys) {
        (Ok(requests), Ok(access_keys)) => (requests, access_keys),
        (requests, access_keys) => {
            let submitted: Vec<Submitted> = [
                (LimitKind::RequestLimit, requests.err()),
                (LimitKind::AccessKeyLimit, access_keys.err()),
            ]
            .into_iter()
            .map(|(kind, error)| {
                let error = error.map(|e| format!("{}: {}", kind.label(), e));
                (kind, form.input(kind), error)
            })
            .collect();

            return rerender_edit(
                api.as_ref(),
                &user_id,
                page,
                rule,
                &submitted,
                Vec::new(),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    let (requests_result, access_keys_result) = tokio::join!(
        apply_change(api.as_ref(), LimitKind::RequestLimit, &user_id, requests),
        apply_change(api.as_ref(), LimitKind::AccessKeyLimit, &user_id, access_keys),
    );

    let mut failures = Vec::new();
    let mut submitted = Vec::new();
    for (kind, result) in [requests_result, access_keys_result].into_iter().flatten() {
        match result {
            Ok(_) => tracing::info!("Updated {} override for user {}", kind, user_id),
            Err(e) => {
                tracing::warn!("Failed to update {} for user {}: {}", kind, user_id, e);
                failures.push(format!("Failed to update {}: {}", kind.label(), e));
                submitted.push((kind, form.input(kind), None));
            }
        }
    }

    if failures.is_empty() {
        return Ok(Redirect::to(&users_url(page)).into_response());
    }

    rerender_edit(
        api.as_ref(),
        &user_id,
        page,
        rule,
        &submitted,
        failures,
        StatusCode::BAD_GATEWAY,
    )
    .await
}

/// Clear one override and return to the refreshed edit form
pub async fn remove_override(
    AdminSession(api): AdminSession,
    State(settings): State<Arc<DashboardConfig>>,
    Path((user_id, kind)): Path<(String, LimitKind)>,
    Form(form): Form<RemoveOverrideForm>,
) -> Result<Response> {
    let page = form.page();

    match api.set_override(kind, &user_id, None).await {
        Ok(_) => {
            tracing::info!("Removed {} override for user {}", kind, user_id);
            let url = format!("{}/edit?page={}", user_base_url(&user_id), page);
            Ok(Redirect::to(&url).into_response())
        }
        Err(e) => {
            tracing::warn!("Failed to remove {} override for user {}: {}", kind, user_id, e);
            let failures = vec![format!("Failed to remove {} override: {}", kind.label(), e)];
            rerender_edit(
                api.as_ref(),
                &user_id,
                page,
                settings.remove_override_rule,
                &[],
                failures,
                StatusCode::BAD_GATEWAY,
            )
            .await
        }
    }
}
