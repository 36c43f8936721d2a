//! Table endpoints.
//!
//! - GET /api/v1/tables?partySize= - All tables, or those a party may book
//! - GET /api/v1/tables/floor-plan - Tables with their map position
//! - PATCH /api/v1/tables/:id - Change a table's status (admin)

use super::error::AppError;
use super::extractors::AdminAccess;
use super::state::{AppState, unexpected};
use crate::floor_plan::layout;
use crate::reducer::RestaurantAction;
use crate::types::{PartySize, Table, TableId, TableStatus};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Query string of the table list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablesQuery {
    /// Only tables available for this many guests
    pub party_size: Option<u8>,
}

/// Admin table change
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableRequest {
    /// New status
    pub status: TableStatus,
    /// Hold end, required when reserving
    #[serde(default)]
    pub reserved_until: Option<DateTime<Utc>>,
}

/// List tables, optionally only those available for a party.
///
/// # Errors
///
/// 422 for a party size outside 1 to 8.
pub async fn list_tables(
    State(state): State<AppState>,
    Query(query): Query<TablesQuery>,
) -> Result<Json<Vec<Table>>, AppError> {
    let party_size = query.party_size.map(PartySize::new).transpose()?;

    let tables = state
        .read(|s| match party_size {
            Some(party_size) => s
                .restaurant
                .available_tables(party_size)
                .into_iter()
                .cloned()
                .collect(),
            None => s.restaurant.tables().list().to_vec(),
        })
        .await;

    Ok(Json(tables))
}

/// Tables merged with their floor-plan position.
///
/// # Errors
///
/// 500 if the layout cannot be serialized.
pub async fn floor_plan(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let plan = state
        .read(|s| serde_json::to_value(layout(s.restaurant.tables().list())))
        .await
        .map_err(anyhow::Error::from)?;
    Ok(Json(plan))
}

/// Admin change of a table's status.
///
/// # Errors
///
/// 401 without the admin password, 404 for an unknown table, 422 when
/// reserving without `reservedUntil`.
pub async fn update_table(
    _admin: AdminAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTableRequest>,
) -> Result<Json<Table>, AppError> {
    match state
        .dispatch(|request_id| RestaurantAction::SetTableStatus {
            request_id,
            table_id: TableId::new(id),
            status: body.status,
            reserved_until: body.reserved_until,
        })
        .await?
    {
        RestaurantAction::TableStatusChanged { table, .. } => Ok(Json(table)),
        other => Err(unexpected(&other)),
    }
}
