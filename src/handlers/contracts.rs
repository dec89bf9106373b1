use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Json},
};
use askama::Template;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{
    contract::{summary::ContractSummary, Contract, ContractData},
    error::ApiError,
    filters,
    models::SaleStatus,
};

use super::AppState;

#[derive(Template)]
#[template(path = "contracts/detail.html")]
struct ContractTemplate {
    summary: ContractSummary,
}

#[derive(Serialize)]
pub struct SaleCreated {
    pub sale_id: i64,
}

#[derive(Deserialize)]
pub struct StatusForm {
    pub status: SaleStatus,
}

// Sell a new contract
pub async fn create_contract(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(data): Json<ContractData>,
) -> Result<(StatusCode, Json<SaleCreated>), ApiError> {
    let user = state.authenticate(&cookies, &headers).await?;

    let sale_id = Contract::new(data, None).sell(&state.store(), &user).await?;

    Ok((StatusCode::CREATED, Json(SaleCreated { sale_id })))
}

// Contract in the shape the edit form submits; cancelled sales come back without rooms
pub async fn get_contract(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(sale_id): Path<i64>,
) -> Result<Json<ContractData>, ApiError> {
    let user = state.authenticate(&cookies, &headers).await?;

    let contract = Contract::from_sales_id(&state.store(), &user, sale_id).await?;

    Ok(Json(contract.data))
}

pub async fn update_contract(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(sale_id): Path<i64>,
    Json(data): Json<ContractData>,
) -> Result<StatusCode, ApiError> {
    let user = state.authenticate(&cookies, &headers).await?;

    Contract::new(data, Some(sale_id))
        .edit(&state.store(), &user)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn cancel_contract(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(sale_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let user = state.authenticate(&cookies, &headers).await?;
    let store = state.store();

    Contract::from_sales_id(&store, &user, sale_id)
        .await?
        .unsell(&store, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_status(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(sale_id): Path<i64>,
    Json(form): Json<StatusForm>,
) -> Result<StatusCode, ApiError> {
    let user = state.authenticate(&cookies, &headers).await?;
    let store = state.store();

    Contract::from_sales_id(&store, &user, sale_id)
        .await?
        .set_status(&store, &user, form.status)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// Printable contract summary
pub async fn contract_page(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(sale_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    let user = state.authenticate(&cookies, &headers).await?;

    let contract = Contract::from_sales_id(&state.store(), &user, sale_id).await?;
    let template = ContractTemplate {
        summary: ContractSummary::new(sale_id, &contract.data),
    };

    Ok(Html(template.render()?))
}
