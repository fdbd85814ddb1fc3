use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};

use crate::controllers::form_controller::{OperationReport, Outcome};
use crate::database::store::TableView;
use crate::dto::record_dto::{ApiResponse, RecordRequest};
use crate::models::entity::EntityKind;
use crate::state::AppState;
use crate::utils::errors::AppError;

type ReportResponse = (StatusCode, Json<ApiResponse<OperationReport>>);

pub fn create_entity_router(kind: EntityKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/:id", put(update_record).delete(delete_record))
        .layer(Extension(kind))
}

fn respond(report: OperationReport) -> ReportResponse {
    let status = match report.outcome {
        Outcome::Created => StatusCode::CREATED,
        Outcome::NotFound => StatusCode::NOT_FOUND,
        Outcome::Updated | Outcome::Deleted | Outcome::NothingToUpdate => StatusCode::OK,
    };
    (status, Json(ApiResponse::from_report(report)))
}

async fn create_record(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Json(request): Json<RecordRequest>,
) -> Result<ReportResponse, AppError> {
    let controller = state.controller(kind).await;
    let report = controller.create(&request.into_raw_fields()).await?;
    Ok(respond(report))
}

async fn list_records(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
) -> Result<Json<TableView>, AppError> {
    let controller = state.controller(kind).await;
    let view = controller.list().await?;
    Ok(Json(view))
}

async fn update_record(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
    Json(request): Json<RecordRequest>,
) -> Result<ReportResponse, AppError> {
    let controller = state.controller(kind).await;
    let report = controller.update(&id, &request.into_raw_fields()).await?;
    Ok(respond(report))
}

async fn delete_record(
    State(state): State<AppState>,
    Extension(kind): Extension<EntityKind>,
    Path(id): Path<String>,
) -> Result<ReportResponse, AppError> {
    let controller = state.controller(kind).await;
    let report = controller.delete(&id).await?;
    Ok(respond(report))
}
