use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use super::extract::{ApiJson, ApiQuery};
use crate::{error::AppError, services::export::to_csv, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/export", get(export))
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Deserialize)]
struct ExportQuery {
    #[serde(default)]
    format: ExportFormat,
}

async fn export(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> Result<Response, AppError> {
    let rows = state.export.export().await?;
    match query.format {
        ExportFormat::Json => Ok(ApiJson(rows).into_response()),
        ExportFormat::Csv => {
            let body = to_csv(&rows)?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"rvlog-export.csv\"",
                    ),
                ],
                body,
            )
                .into_response())
        }
    }
}
