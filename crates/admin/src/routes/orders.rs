//! Order list and fulfilment.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use luxe_core::order::{MonthFilter, Order, OrderFilter, OrderItem};
use luxe_core::{OrderId, OrderStatus};

use crate::db::orders::{self, OrderUpdate};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    /// Substring of the buyer email.
    pub email: Option<String>,
    /// `YYYY-MM`, UTC.
    pub month: Option<String>,
}

impl OrderQuery {
    fn into_filter(self) -> Result<OrderFilter> {
        let month = self
            .month
            .filter(|m| !m.trim().is_empty())
            .map(|m| MonthFilter::parse(&m))
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(OrderFilter {
            email_contains: self.email.filter(|e| !e.trim().is_empty()),
            month,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    /// Orders after filtering.
    pub shown: usize,
    /// Orders before filtering.
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
}

impl From<UpdateOrder> for OrderUpdate {
    fn from(form: UpdateOrder) -> Self {
        Self {
            status: form.status,
            tracking_number: form.tracking_number.map(|t| t.trim().to_owned()),
            estimated_delivery: form.estimated_delivery,
            shipping_address: form.shipping_address,
            notes: form.notes,
        }
    }
}

/// GET /api/orders?email=&month=
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<OrderList>> {
    let filter = query.into_filter()?;
    let all = orders::list_orders(state.pool(), state.business_id()).await?;
    let total = all.len();
    let orders = filter.apply(all);

    Ok(Json(OrderList {
        shown: orders.len(),
        total,
        orders,
    }))
}

/// GET /api/orders/{id}/items
#[instrument(skip(state))]
pub async fn items(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Vec<OrderItem>>> {
    Ok(Json(
        orders::order_items(state.pool(), state.business_id(), id).await?,
    ))
}

/// PATCH /api/orders/{id}
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(form): Json<UpdateOrder>,
) -> Result<Json<Order>> {
    let update = OrderUpdate::from(form);
    if update.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".to_owned()));
    }
    let order = orders::update_order(state.pool(), state.business_id(), id, &update).await?;
    tracing::info!(order_id = %id, status = order.status.label(), "Order updated");
    Ok(Json(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_into_filter() {
        let filter = OrderQuery {
            email: Some("ana@".to_owned()),
            month: Some("2024-03".to_owned()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.email_contains.as_deref(), Some("ana@"));
        assert!(filter.month.is_some());
    }

    #[test]
    fn test_blank_query_means_no_filter() {
        let filter = OrderQuery {
            email: Some("  ".to_owned()),
            month: Some(String::new()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter, OrderFilter::default());
    }

    #[test]
    fn test_bad_month_is_rejected() {
        let err = OrderQuery {
            email: None,
            month: Some("March".to_owned()),
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_update_form_trims_tracking() {
        let update = OrderUpdate::from(UpdateOrder {
            tracking_number: Some(" 1Z999 ".to_owned()),
            ..UpdateOrder::default()
        });
        assert_eq!(update.tracking_number.as_deref(), Some("1Z999"));
        assert!(!update.is_empty());
    }
}
