//! Order route handlers.
//!
//! Checkout posts the customer form and the cart in one JSON document; the
//! response is the full order details of the new order.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use bookstore_core::{CustomerForm, OrderDetails, OrderId, ShoppingCart, ShoppingCartItem};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub customer_form: CustomerForm,
    pub cart: CartRequest,
}

/// Cart as submitted by the client. The surcharge is applied server-side.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    #[serde(default)]
    pub item_array: Vec<ShoppingCartItem>,
}

/// Place an order.
///
/// Returns 201 with the order details on success.
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    body: std::result::Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderDetails>)> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let item_count = request.cart.item_array.len().to_string();
    add_breadcrumb("checkout", "Order submitted", Some(&[("items", item_count.as_str())]));

    let cart = ShoppingCart::new(request.cart.item_array, state.config().surcharge);
    let order_id = state
        .orders()
        .place_order(&request.customer_form, &cart)
        .await?;
    let details = state.orders().get_order_details(order_id).await?;

    Ok((StatusCode::CREATED, Json(details)))
}

/// Show an order with its customer, line items and books.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<OrderDetails>> {
    let Path(id) = id.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let details = state.orders().get_order_details(OrderId::new(id)).await?;
    Ok(Json(details))
}
