use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Stable code of every statistics failure.
pub const STATS_ERROR_CODE: &str = "STATS_ERROR";

/// The statistics endpoint a failure happened in. Selects the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOperation {
    CourseStats,
    StudentSemesters,
    Global,
    StudentProgress,
    CourseDistribution,
    Teacher,
    SemesterComparison,
}

impl StatsOperation {
    /// Message returned to API consumers (in French).
    pub fn user_message(self) -> &'static str {
        match self {
            StatsOperation::CourseStats => {
                "Erreur lors de la récupération des statistiques du cours"
            }
            StatsOperation::StudentSemesters => {
                "Erreur lors de la récupération des statistiques de l'étudiant"
            }
            StatsOperation::Global => "Erreur lors de la récupération des statistiques globales",
            StatsOperation::StudentProgress => {
                "Erreur lors de la récupération des statistiques de progression"
            }
            StatsOperation::CourseDistribution => {
                "Erreur lors de la récupération de la distribution des notes"
            }
            StatsOperation::Teacher => {
                "Erreur lors de la récupération des statistiques de l'enseignant"
            }
            StatsOperation::SemesterComparison => "Erreur lors de la comparaison des semestres",
        }
    }
}

impl fmt::Display for StatsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatsOperation::CourseStats => "course stats",
            StatsOperation::StudentSemesters => "student semester stats",
            StatsOperation::Global => "global stats",
            StatsOperation::StudentProgress => "student progress",
            StatsOperation::CourseDistribution => "course distribution",
            StatsOperation::Teacher => "teacher stats",
            StatsOperation::SemesterComparison => "semester comparison",
        };
        f.write_str(name)
    }
}

/// Why a statistics request failed. Logged, never shown to the caller.
#[derive(Error, Debug)]
pub enum StatsFailure {
    #[error(transparent)]
    Database(#[from] database::DbError),
    #[error("malformed filter: {0}")]
    MalformedFilter(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{operation} failed: {source}")]
    Stats {
        operation: StatsOperation,
        source: StatsFailure,
    },
}

impl AppError {
    pub fn stats(operation: StatsOperation, source: impl Into<StatsFailure>) -> Self {
        AppError::Stats {
            operation,
            source: source.into(),
        }
    }

    /// A path or query parameter that could not be parsed into a filter.
    pub fn malformed(operation: StatsOperation, rejection: impl fmt::Display) -> Self {
        AppError::Stats {
            operation,
            source: StatsFailure::MalformedFilter(rejection.to_string()),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub code: String,
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Stats { operation, source } = &self;
        tracing::error!(operation = %operation, error = %source, "Statistics request failed.");

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = Json(ErrorBody {
            status: status.as_u16(),
            message: operation.user_message().to_string(),
            code: STATS_ERROR_CODE.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::DbError;
    use std::time::Duration;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn database_failures_become_stats_error() {
        let err = AppError::stats(
            StatsOperation::Global,
            DbError::Timeout(Duration::from_secs(10)),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["status"], 500);
        assert_eq!(body["code"], STATS_ERROR_CODE);
        assert_eq!(
            body["message"],
            "Erreur lors de la récupération des statistiques globales"
        );
    }

    #[tokio::test]
    async fn malformed_filters_share_the_stats_error_kind() {
        let err = AppError::malformed(StatsOperation::SemesterComparison, "bad semester");
        assert!(err.to_string().contains("malformed filter: bad semester"));

        let body = body_json(err.into_response()).await;
        assert_eq!(body["code"], STATS_ERROR_CODE);
        assert_eq!(body["message"], "Erreur lors de la comparaison des semestres");
    }

    #[test]
    fn every_operation_has_a_french_message() {
        let operations = [
            StatsOperation::CourseStats,
            StatsOperation::StudentSemesters,
            StatsOperation::Global,
            StatsOperation::StudentProgress,
            StatsOperation::CourseDistribution,
            StatsOperation::Teacher,
            StatsOperation::SemesterComparison,
        ];
        for operation in operations {
            assert!(operation.user_message().starts_with("Erreur lors de"));
        }
    }
}
