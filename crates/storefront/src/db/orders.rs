//! Order persistence and history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use luxe_core::order::{Order, OrderItem};
use luxe_core::{BusinessId, OrderId, OrderStatus, ProductId, ProfileId};

use super::RepositoryError;

const ORDER_COLUMNS: &str = "id, business_id, user_id, total_amount, status, payment_order_id, \
     shipping_address, shipping_method, estimated_delivery, tracking_number, notes, \
     buyer_email, business_email, created_at, updated_at";

/// An order about to be written at checkout.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub business_id: BusinessId,
    pub user_id: Option<ProfileId>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_order_id: String,
    pub shipping_address: String,
    pub shipping_method: String,
    pub estimated_delivery: Option<NaiveDate>,
    pub buyer_email: String,
    pub business_email: String,
}

/// A line of a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub item_total: Decimal,
}

/// Repository for orders and their items.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Write an order and its lines in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is written in that case.
    pub async fn create(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let insert = format!(
            r"
            INSERT INTO shop.customer_order (
                business_id, user_id, total_amount, status, payment_order_id,
                shipping_address, shipping_method, estimated_delivery,
                buyer_email, business_email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ORDER_COLUMNS}
            "
        );
        let created = sqlx::query_as::<_, Order>(&insert)
            .bind(order.business_id)
            .bind(order.user_id)
            .bind(order.total_amount)
            .bind(order.status)
            .bind(&order.payment_order_id)
            .bind(&order.shipping_address)
            .bind(&order.shipping_method)
            .bind(order.estimated_delivery)
            .bind(&order.buyer_email)
            .bind(&order.business_email)
            .fetch_one(&mut *tx)
            .await?;

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let line = sqlx::query_as::<_, OrderItem>(
                r"
                INSERT INTO shop.order_item (
                    order_id, payment_order_id, product_id, product_name,
                    quantity, price, item_total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, order_id, payment_order_id, product_id, product_name,
                          quantity, price, item_total
                ",
            )
            .bind(created.id)
            .bind(&order.payment_order_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.item_total)
            .fetch_one(&mut *tx)
            .await?;
            lines.push(line);
        }

        tx.commit().await?;
        Ok((created, lines))
    }

    /// A customer's orders for the business, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        business_id: BusinessId,
        user_id: ProfileId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order \
             WHERE business_id = $1 AND user_id = $2 ORDER BY created_at DESC"
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(business_id)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;
        Ok(orders)
    }

    /// One of a customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        business_id: BusinessId,
        user_id: ProfileId,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order \
             WHERE business_id = $1 AND user_id = $2 AND id = $3"
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(business_id)
            .bind(user_id)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(order)
    }

    /// Items of the given orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for(&self, order_ids: &[OrderId]) -> Result<Vec<OrderItem>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i32> = order_ids.iter().map(OrderId::as_i32).collect();
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, order_id, payment_order_id, product_id, product_name,
                   quantity, price, item_total
            FROM shop.order_item
            WHERE order_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(raw)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }
}
