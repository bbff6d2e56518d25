//! Order history for signed-in customers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use luxe_core::OrderId;
use luxe_core::order::{MonthFilter, Order, OrderFilter, OrderItem};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// `YYYY-MM`.
    pub month: Option<String>,
}

/// An order with its lines.
#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Attach items to their orders, keeping the order sequence.
fn group_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderWithItems> {
    orders
        .into_iter()
        .map(|order| {
            let items = items
                .iter()
                .filter(|i| i.order_id == order.id)
                .cloned()
                .collect();
            OrderWithItems { order, items }
        })
        .collect()
}

/// The customer's orders, newest first.
///
/// GET /api/orders?month=YYYY-MM
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<OrderWithItems>>> {
    let month = query
        .month
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(MonthFilter::parse)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_for_user(state.business_id(), user.id).await?;
    let orders = OrderFilter {
        email_contains: None,
        month,
    }
    .apply(orders);

    let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
    let items = repo.items_for(&ids).await?;
    Ok(Json(group_items(orders, items)))
}

/// One of the customer's orders.
///
/// GET /api/orders/{id}
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_for_user(state.business_id(), user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
    let items = repo.items_for(&[id]).await?;
    Ok(Json(OrderWithItems { order, items }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use luxe_core::{BusinessId, OrderItemId, OrderStatus, ProductId};

    use super::*;

    fn order(id: i32) -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::new(id),
            business_id: BusinessId::new(5),
            user_id: None,
            total_amount: Decimal::from(100),
            status: OrderStatus::Paid,
            payment_order_id: format!("PAY-{id}"),
            shipping_address: "N/A".to_owned(),
            shipping_method: String::new(),
            estimated_delivery: None,
            tracking_number: None,
            notes: None,
            buyer_email: "ana@example.com".to_owned(),
            business_email: "info@default.com".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    fn item(id: i32, order_id: i32) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(id),
            order_id: OrderId::new(order_id),
            payment_order_id: format!("PAY-{order_id}"),
            product_id: ProductId::new(1),
            product_name: "Tote".to_owned(),
            quantity: 1,
            price: Decimal::from(100),
            item_total: Decimal::from(100),
        }
    }

    #[test]
    fn test_group_items() {
        let grouped = group_items(
            vec![order(2), order(1)],
            vec![item(1, 1), item(2, 2), item(3, 2)],
        );
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.first().unwrap().order.id, OrderId::new(2));
        assert_eq!(grouped.first().unwrap().items.len(), 2);
        assert_eq!(grouped.last().unwrap().items.len(), 1);
    }

    #[test]
    fn test_flattened_json() {
        let json = serde_json::to_value(OrderWithItems {
            order: order(3),
            items: vec![item(1, 3)],
        })
        .unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["status"], "paid");
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
    }
}
