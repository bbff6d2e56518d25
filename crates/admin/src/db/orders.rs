//! Order database operations for the back office.
//!
//! Orders are created by the storefront at checkout. The back office lists
//! them and moves them through fulfilment.

use chrono::NaiveDate;
use sqlx::PgPool;

use luxe_core::order::{Order, OrderItem};
use luxe_core::{BusinessId, OrderId, OrderStatus};

use super::RepositoryError;

macro_rules! order_columns {
    () => {
        "id, business_id, user_id, total_amount, status, payment_order_id, \
         shipping_address, shipping_method, estimated_delivery, tracking_number, notes, \
         buyer_email, business_email, created_at, updated_at"
    };
}

/// Fulfilment fields editable from the back office. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<NaiveDate>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
}

impl OrderUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.tracking_number.is_none()
            && self.estimated_delivery.is_none()
            && self.shipping_address.is_none()
            && self.notes.is_none()
    }
}

/// All orders for the business, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_orders(
    pool: &PgPool,
    business_id: BusinessId,
) -> Result<Vec<Order>, RepositoryError> {
    let orders = sqlx::query_as::<_, Order>(concat!(
        "SELECT ",
        order_columns!(),
        " FROM shop.customer_order WHERE business_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(business_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Lines of one order, in insertion order.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order does not belong to the
/// business, or an error if a query fails.
pub async fn order_items(
    pool: &PgPool,
    business_id: BusinessId,
    order_id: OrderId,
) -> Result<Vec<OrderItem>, RepositoryError> {
    let exists: Option<i32> = sqlx::query_scalar(
        "SELECT id FROM shop.customer_order WHERE business_id = $1 AND id = $2",
    )
    .bind(business_id)
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    if exists.is_none() {
        return Err(RepositoryError::NotFound);
    }

    let items = sqlx::query_as::<_, OrderItem>(
        r"
        SELECT id, order_id, payment_order_id, product_id, product_name,
               quantity, price, item_total
        FROM shop.order_item
        WHERE order_id = $1
        ORDER BY id
        ",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Update fulfilment fields.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order does not belong to the
/// business, or an error if the query fails.
pub async fn update_order(
    pool: &PgPool,
    business_id: BusinessId,
    id: OrderId,
    update: &OrderUpdate,
) -> Result<Order, RepositoryError> {
    sqlx::query_as::<_, Order>(concat!(
        r"
        UPDATE shop.customer_order SET
            status             = COALESCE($3, status),
            tracking_number    = COALESCE($4, tracking_number),
            estimated_delivery = COALESCE($5, estimated_delivery),
            shipping_address   = COALESCE($6, shipping_address),
            notes              = COALESCE($7, notes),
            updated_at         = NOW()
        WHERE business_id = $1 AND id = $2
        RETURNING ",
        order_columns!()
    ))
    .bind(business_id)
    .bind(id)
    .bind(update.status)
    .bind(update.tracking_number.as_deref())
    .bind(update.estimated_delivery)
    .bind(update.shipping_address.as_deref())
    .bind(update.notes.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_update_is_empty() {
        assert!(OrderUpdate::default().is_empty());
        let update = OrderUpdate {
            status: Some(OrderStatus::Shipped),
            ..OrderUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
