#![cfg(not(tarpaulin_include))]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::editor::{ColumnAction, EditOutcome, GridEditor, GridSnapshot, Notice, RowAction};
use crate::grid::{CellEdit, ColumnUpdate, Grid};

pub struct AppState {
    editor: Mutex<GridEditor>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        AppState {
            editor: Mutex::new(GridEditor::with_grid(
                Grid::new(config.max_rows).with_max_columns(config.max_columns),
                config.messages.clone(),
            )),
        }
    }

    fn editor(&self) -> MutexGuard<'_, GridEditor> {
        self.editor.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Deserialize)]
struct RowActionRequest {
    action: RowAction,
}

#[derive(Deserialize)]
struct ColumnActionRequest {
    action: ColumnAction,
}

#[derive(Deserialize)]
struct CellsRequest {
    edits: Vec<CellEdit>,
    #[serde(default)]
    is_paste: bool,
}

#[derive(Deserialize)]
struct PasteRequest {
    row: usize,
    col: usize,
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum Axis {
    Row,
    Column,
}

#[derive(Deserialize)]
struct MoveRequest {
    axis: Axis,
    from: usize,
    to: usize,
}

#[derive(Deserialize)]
struct ResizeRequest {
    width: u32,
}

#[derive(Serialize)]
struct GridResponse {
    status: String,
    message: Option<String>,
    field: Option<&'static str>,
    grid: GridSnapshot,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/grid", get(get_grid))
        .route("/api/grid/rows", post(add_row))
        .route("/api/grid/rows/:index", post(row_action))
        .route("/api/grid/columns", post(add_column))
        .route("/api/grid/columns/:index", post(column_action).put(update_column))
        .route("/api/grid/columns/:index/width", post(resize_column))
        .route("/api/grid/cells", post(apply_cells))
        .route("/api/grid/paste", post(paste))
        .route("/api/grid/move", post(move_line))
        .route("/api/grid/export", get(export_csv))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(&config));
    let app = router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn respond(editor: &GridEditor, result: Result<(), Notice>) -> Response {
    match result {
        Ok(()) => Json(GridResponse {
            status: "ok".to_string(),
            message: None,
            field: None,
            grid: editor.snapshot(),
        })
        .into_response(),
        Err(notice) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(GridResponse {
                status: "error".to_string(),
                message: Some(notice.message),
                field: notice.field,
                grid: editor.snapshot(),
            }),
        )
            .into_response(),
    }
}

fn respond_edits(editor: &GridEditor, outcome: EditOutcome) -> Response {
    Json(GridResponse {
        status: if outcome.warning.is_some() {
            "warning".to_string()
        } else {
            "ok".to_string()
        },
        message: outcome.warning,
        field: None,
        grid: editor.snapshot(),
    })
    .into_response()
}

async fn get_grid(State(state): State<Arc<AppState>>) -> Response {
    let editor = state.editor();
    respond(&editor, Ok(()))
}

async fn add_row(State(state): State<Arc<AppState>>) -> Response {
    let mut editor = state.editor();
    let result = editor.add_row();
    respond(&editor, result)
}

async fn add_column(State(state): State<Arc<AppState>>) -> Response {
    let mut editor = state.editor();
    let result = editor.add_column();
    respond(&editor, result)
}

async fn row_action(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(payload): Json<RowActionRequest>,
) -> Response {
    let mut editor = state.editor();
    let result = editor.row_action(index, payload.action);
    respond(&editor, result)
}

async fn column_action(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(payload): Json<ColumnActionRequest>,
) -> Response {
    let mut editor = state.editor();
    let result = editor.column_action(index, payload.action);
    respond(&editor, result)
}

async fn update_column(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(payload): Json<ColumnUpdate>,
) -> Response {
    let mut editor = state.editor();
    let result = editor.update_column(index, &payload);
    respond(&editor, result)
}

async fn resize_column(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(payload): Json<ResizeRequest>,
) -> Response {
    let mut editor = state.editor();
    let result = editor.resize_column(index, payload.width);
    respond(&editor, result)
}

async fn apply_cells(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CellsRequest>,
) -> Response {
    let mut editor = state.editor();
    let outcome = editor.apply_edits(&payload.edits, payload.is_paste);
    respond_edits(&editor, outcome)
}

async fn paste(State(state): State<Arc<AppState>>, Json(payload): Json<PasteRequest>) -> Response {
    let mut editor = state.editor();
    let outcome = editor.paste(payload.row, payload.col, &payload.text);
    respond_edits(&editor, outcome)
}

async fn move_line(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MoveRequest>,
) -> Response {
    let mut editor = state.editor();
    let result = match payload.axis {
        Axis::Row => editor.move_row(payload.from, payload.to),
        Axis::Column => editor.move_column(payload.from, payload.to),
    };
    respond(&editor, result)
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let csv = match state.editor().export_csv() {
        Ok(csv) => csv,
        Err(e) => {
            error!("CSV export failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"table.csv\""),
        ],
        csv,
    )
        .into_response()
}
