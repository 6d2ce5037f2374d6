use serde::{Deserialize, Deserializer, Serialize};

/// Uniform response wrapper: every endpoint answers with this shape.
///
/// On success `data` is set and `error` is absent; on failure the reverse.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
}

pub mod expense {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};

    /// Request body for `POST /api/expenses`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        pub amount: f64,
        pub category: String,
        /// Calendar date, `YYYY-MM-DD`.
        pub date: String,
    }

    /// Request body for `PUT /api/expenses/{id}`.
    ///
    /// Each field is tri-state: absent (`None`), explicit `null`
    /// (`Some(None)`), or a value (`Some(Some(_))`). Absent fields leave the
    /// stored value untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        pub amount: Option<Option<f64>>,
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        pub category: Option<Option<String>>,
        #[serde(
            default,
            deserialize_with = "present",
            skip_serializing_if = "Option::is_none"
        )]
        pub date: Option<Option<String>>,
    }

    /// Marks a field as present, keeping an explicit `null` as `Some(None)`.
    fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }

    /// Query string for `GET /api/expenses`.
    ///
    /// Kept as raw strings: unparsable `limit`/`offset` values are ignored
    /// and fall back to the defaults.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub category: Option<String>,
        pub date_from: Option<String>,
        pub date_to: Option<String>,
        pub limit: Option<String>,
        pub offset: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i64,
        pub description: String,
        pub amount: f64,
        pub category: String,
        pub date: NaiveDate,
        pub created_at: DateTime<Utc>,
    }
}

pub mod stats {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct StatsView {
        pub total_amount: f64,
        pub expense_count: i64,
        pub average_amount: f64,
        pub by_category: BTreeMap<String, f64>,
    }
}

#[cfg(test)]
mod tests {
    use super::expense::ExpenseUpdate;
    use super::*;

    #[test]
    fn update_distinguishes_absent_from_null() {
        let update: ExpenseUpdate =
            serde_json::from_str(r#"{"description": "Tea", "category": null}"#).unwrap();
        assert_eq!(update.description, Some(Some("Tea".to_string())));
        assert_eq!(update.category, Some(None));
        assert_eq!(update.amount, None);
        assert_eq!(update.date, None);
    }

    #[test]
    fn envelope_omits_missing_parts() {
        let ok = serde_json::to_value(ApiResponse::ok(vec!["Food"])).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": ["Food"]}));

        let err = serde_json::to_value(ApiResponse::<()>::err("boom")).unwrap();
        assert_eq!(err, serde_json::json!({"success": false, "error": "boom"}));
    }
}
