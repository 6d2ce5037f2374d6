//! Expenses API endpoints

use api_types::{
    ApiResponse,
    expense::{ExpenseListQuery, ExpenseNew, ExpenseUpdate, ExpenseView},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

const DELETED_MESSAGE: &str = "expense deleted successfully";

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        description: expense.description,
        amount: expense.amount.to_major(),
        category: expense.category,
        date: expense.date,
        created_at: expense.created_at,
    }
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.trim()
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid id '{raw}'")))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServerError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| {
            ServerError::BadRequest(format!("invalid request body: {}", rejection.body_text()))
        })
}

/// A field may be omitted but never set to `null`: every column is required.
fn not_null<T>(field: Option<Option<T>>, name: &str) -> Result<Option<T>, ServerError> {
    match field {
        Some(None) => Err(ServerError::BadRequest(format!("{name} cannot be null"))),
        other => Ok(other.flatten()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn to_filter(query: ExpenseListQuery) -> Result<engine::ExpenseFilter, ServerError> {
    let date_from = non_empty(query.date_from)
        .map(|d| engine::parse_date(&d, "date_from"))
        .transpose()?;
    let date_to = non_empty(query.date_to)
        .map(|d| engine::parse_date(&d, "date_to"))
        .transpose()?;

    Ok(engine::ExpenseFilter {
        category: non_empty(query.category),
        date_from,
        date_to,
        limit: query.limit.and_then(|l| l.trim().parse().ok()),
        offset: query.offset.and_then(|o| o.trim().parse().ok()),
    })
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ExpenseView>>), ServerError> {
    let payload = body(payload)?;
    let expense = state
        .engine
        .new_expense(engine::NewExpense {
            description: payload.description,
            amount: payload.amount,
            category: payload.category,
            date: payload.date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(map_expense(expense))),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ExpenseListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ExpenseView>>>, ServerError> {
    let Query(query) = query.map_err(|rejection| {
        ServerError::BadRequest(format!("invalid query: {}", rejection.body_text()))
    })?;
    let filter = to_filter(query)?;

    let expenses = state
        .engine
        .expenses(&filter)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(ApiResponse::ok(expenses)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ExpenseView>>, ServerError> {
    let id = parse_id(&id)?;
    let expense = state.engine.expense(id).await?;
    Ok(Json(ApiResponse::ok(map_expense(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<ExpenseView>>, ServerError> {
    let id = parse_id(&id)?;
    let payload = body(payload)?;

    let update = engine::ExpenseUpdate {
        description: not_null(payload.description, "description")?,
        amount: not_null(payload.amount, "amount")?,
        category: not_null(payload.category, "category")?,
        date: not_null(payload.date, "date")?,
    };
    let expense = state.engine.update_expense(id, update).await?;

    Ok(Json(ApiResponse::ok(map_expense(expense))))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<&'static str>>, ServerError> {
    let id = parse_id(&id)?;
    state.engine.delete_expense(id).await?;
    Ok(Json(ApiResponse::ok(DELETED_MESSAGE)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_ignores_unparsable_paging() {
        let filter = to_filter(ExpenseListQuery {
            limit: Some("lots".to_string()),
            offset: Some("10".to_string()),
            ..Default::default()
        })
        .ok()
        .unwrap();
        assert_eq!(filter.limit, None);
        assert_eq!(filter.offset, Some(10));
    }

    #[test]
    fn filter_treats_blank_category_as_absent() {
        let filter = to_filter(ExpenseListQuery {
            category: Some("  ".to_string()),
            ..Default::default()
        })
        .ok()
        .unwrap();
        assert_eq!(filter.category, None);
    }

    #[test]
    fn filter_rejects_malformed_dates() {
        let result = to_filter(ExpenseListQuery {
            date_from: Some("yesterday".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(ServerError::Engine(engine::EngineError::InvalidInput(_)))
        ));
    }

    #[test]
    fn null_fields_are_rejected() {
        assert!(not_null::<String>(Some(None), "category").is_err());
        assert_eq!(not_null::<String>(None, "category").ok(), Some(None));
        assert_eq!(
            not_null(Some(Some(1.5)), "amount").ok(),
            Some(Some(1.5))
        );
    }

    #[test]
    fn ids_must_be_numeric() {
        assert!(parse_id("abc").is_err());
        assert_eq!(parse_id("42").ok(), Some(42));
    }
}
