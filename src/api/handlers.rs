//! HTTP request handlers for the payroll engine API.
//!
//! Every handler authorizes the caller first: the asserted identity arrives
//! in the `x-user-id` header, is resolved to a role, and the role is checked
//! against the capability the endpoint requires. Authentication itself is an
//! upstream concern; the engine trusts the asserted id.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::{ApprovalOutcome, SettlementOutcome, UserView};
use crate::error::EngineError;
use crate::models::Capability;

use super::request::{
    BatchApproveRequest, CreateCompanyRequest, CreateEmployeeRequest, CreatePayrollRequest,
    CreateUserRequest, SummaryQuery, TopUpRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user_handler))
        .route("/companies", post(create_company_handler))
        .route("/companies/:id/balance", post(top_up_handler))
        .route("/companies/:id/funds", get(funds_handler))
        .route("/employees", post(create_employee_handler))
        .route("/employees/:id/deactivate", post(deactivate_handler))
        .route("/payrolls", post(create_payroll_handler))
        .route("/payrolls/summary", get(summary_handler))
        .route("/payrolls/:id", get(get_payroll_handler))
        .route("/payrolls/:id/approve", post(approve_handler))
        .route("/payrolls/approve", post(batch_approve_handler))
        .route("/payrolls/:id/pay", post(pay_handler))
        .route(
            "/employees/:id/notifications",
            get(list_notifications_handler),
        )
        .route(
            "/employees/:id/notifications/unread_count",
            get(unread_count_handler),
        )
        .route(
            "/employees/:id/notifications/read_all",
            post(read_all_handler),
        )
        .route("/notifications/:id/read", post(mark_read_handler))
        .with_state(state)
}

/// Resolves the asserted `x-user-id` header to an identity with the required
/// capability.
///
/// Missing, malformed, or unknown identities yield 401; a known identity
/// whose role lacks the capability yields 403.
async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    capability: Capability,
) -> Result<UserView, ApiErrorResponse> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .ok_or_else(|| {
            ApiErrorResponse::unauthorized("Missing or malformed x-user-id header")
        })?;

    let view = match state.engine().user_view(user_id).await {
        Ok(view) => view,
        Err(EngineError::UserNotFound { id }) => {
            return Err(ApiErrorResponse::unauthorized(format!(
                "Unknown user: {}",
                id
            )));
        }
        Err(other) => return Err(other.into()),
    };

    if !view.role.allows(capability) {
        warn!(
            user_id = view.id,
            role = ?view.role,
            capability = ?capability,
            "Capability denied"
        );
        return Err(ApiErrorResponse::forbidden(format!(
            "Role '{:?}' may not perform this operation",
            view.role
        )));
    }
    Ok(view)
}

/// Converts a JSON extractor rejection into an API error.
fn json_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn bad_request(error: ApiError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Handler for POST /users. Requires the ManageUsers capability.
async fn create_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authorize(&state, &headers, Capability::ManageUsers).await {
        Ok(caller) => caller,
        Err(error) => return error.into_response(),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(json_error(rejection, correlation_id)),
    };

    match state
        .engine()
        .create_user(&request.username, request.role)
        .await
    {
        Ok(user) => {
            info!(
                correlation_id = %correlation_id,
                caller = caller.id,
                user_id = user.id,
                role = ?user.role,
                "User created"
            );
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /companies. Requires the ManageCompanies capability.
async fn create_company_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(error) = authorize(&state, &headers, Capability::ManageCompanies).await {
        return error.into_response();
    }
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(json_error(rejection, correlation_id)),
    };

    match state
        .engine()
        .create_company(&request.name, request.bank_balance)
        .await
    {
        Ok(company) => {
            info!(
                correlation_id = %correlation_id,
                company_id = company.id,
                balance = %company.bank_balance,
                "Company created"
            );
            (StatusCode::CREATED, Json(company)).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /companies/{id}/balance. Requires ManageCompanies.
async fn top_up_handler(
    State(state): State<AppState>,
    Path(company_id): Path<u64>,
    headers: HeaderMap,
    payload: Result<Json<TopUpRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(error) = authorize(&state, &headers, Capability::ManageCompanies).await {
        return error.into_response();
    }
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(json_error(rejection, correlation_id)),
    };

    match state.engine().top_up(company_id, request.amount).await {
        Ok(company) => {
            info!(
                correlation_id = %correlation_id,
                company_id,
                amount = %request.amount,
                balance = %company.bank_balance,
                "Balance topped up"
            );
            (StatusCode::OK, Json(company)).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /companies/{id}/funds. Requires ViewCompanyFunds.
async fn funds_handler(
    State(state): State<AppState>,
    Path(company_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::ViewCompanyFunds).await {
        return error.into_response();
    }
    match state.engine().funds_overview(company_id).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /employees. Requires ManageEmployees.
async fn create_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    if let Err(error) = authorize(&state, &headers, Capability::ManageEmployees).await {
        return error.into_response();
    }
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(json_error(rejection, correlation_id)),
    };

    match state
        .engine()
        .create_employee(request.into_new_employee())
        .await
    {
        Ok(employee) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = employee.id,
                company_id = employee.company_id,
                "Employee created"
            );
            (StatusCode::CREATED, Json(employee)).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /employees/{id}/deactivate. Requires ManageEmployees.
async fn deactivate_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::ManageEmployees).await {
        return error.into_response();
    }
    match state.engine().deactivate_employee(employee_id).await {
        Ok(employee) => {
            info!(employee_id, "Employee deactivated");
            (StatusCode::OK, Json(employee)).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /payrolls. Requires CreatePayroll.
async fn create_payroll_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authorize(&state, &headers, Capability::CreatePayroll).await {
        Ok(caller) => caller,
        Err(error) => return error.into_response(),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(json_error(rejection, correlation_id)),
    };

    match state
        .engine()
        .create_payroll(request.into_new_payroll(caller.id))
        .await
    {
        Ok(payroll) => {
            info!(
                correlation_id = %correlation_id,
                payroll_id = payroll.id,
                employee_id = payroll.employee_id,
                period = %payroll.period,
                final_salary = %payroll.final_salary,
                "Payroll created"
            );
            (StatusCode::CREATED, Json(payroll)).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /payrolls/{id}. Requires ViewPayroll.
async fn get_payroll_handler(
    State(state): State<AppState>,
    Path(payroll_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::ViewPayroll).await {
        return error.into_response();
    }
    match state.engine().payroll(payroll_id).await {
        Ok(payroll) => (StatusCode::OK, Json(payroll)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /payrolls/summary. Requires ViewPayroll.
async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::ViewPayroll).await {
        return error.into_response();
    }
    match state.engine().monthly_summary(query.month, query.year).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /payrolls/{id}/approve. Requires ApprovePayroll.
///
/// An approval that the engine declines (insufficient funds, wrong status)
/// comes back as 409 with the outcome body; the payroll is untouched.
async fn approve_handler(
    State(state): State<AppState>,
    Path(payroll_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authorize(&state, &headers, Capability::ApprovePayroll).await {
        Ok(caller) => caller,
        Err(error) => return error.into_response(),
    };

    match state.engine().approve(payroll_id, caller.id).await {
        Ok(outcome @ ApprovalOutcome::Approved { .. }) => {
            info!(
                correlation_id = %correlation_id,
                payroll_id,
                approver = caller.id,
                "Approval committed"
            );
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Ok(outcome) => {
            warn!(
                correlation_id = %correlation_id,
                payroll_id,
                "Approval declined"
            );
            (StatusCode::CONFLICT, Json(outcome)).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /payrolls/approve. Requires ApprovePayroll.
///
/// Always 200: partial success is reported per item in the body.
async fn batch_approve_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<BatchApproveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authorize(&state, &headers, Capability::ApprovePayroll).await {
        Ok(caller) => caller,
        Err(error) => return error.into_response(),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_request(json_error(rejection, correlation_id)),
    };

    match state
        .engine()
        .batch_approve(&request.payroll_ids, caller.id)
        .await
    {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                approved = report.approved_count,
                requested = report.total_requested,
                "Batch approval finished"
            );
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /payrolls/{id}/pay. Requires SettlePayroll.
async fn pay_handler(
    State(state): State<AppState>,
    Path(payroll_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::SettlePayroll).await {
        return error.into_response();
    }

    match state.engine().mark_paid(payroll_id).await {
        Ok(outcome @ SettlementOutcome::Paid { .. }) => {
            info!(payroll_id, "Settlement committed");
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Ok(outcome) => (StatusCode::CONFLICT, Json(outcome)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /employees/{id}/notifications. Requires ViewNotifications.
async fn list_notifications_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::ViewNotifications).await {
        return error.into_response();
    }
    match state.engine().notifications_for_employee(employee_id).await {
        Ok(notifications) => (StatusCode::OK, Json(notifications)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /employees/{id}/notifications/unread_count.
async fn unread_count_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::ViewNotifications).await {
        return error.into_response();
    }
    match state.engine().unread_count(employee_id).await {
        Ok(count) => {
            (StatusCode::OK, Json(serde_json::json!({ "unread_count": count }))).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /notifications/{id}/read. Requires ViewNotifications.
async fn mark_read_handler(
    State(state): State<AppState>,
    Path(notification_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::ViewNotifications).await {
        return error.into_response();
    }
    match state.engine().mark_read(notification_id).await {
        Ok(notification) => (StatusCode::OK, Json(notification)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /employees/{id}/notifications/read_all.
async fn read_all_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    if let Err(error) = authorize(&state, &headers, Capability::ViewNotifications).await {
        return error.into_response();
    }
    match state.engine().mark_all_read(employee_id).await {
        Ok(marked) => {
            (StatusCode::OK, Json(serde_json::json!({ "marked_read": marked }))).into_response()
        }
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}
