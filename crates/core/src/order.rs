//! Orders, order lines, shipping methods and the history filters.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    BusinessId, OrderId, OrderItemId, OrderStatus, ProductId, ProfileId, ShippingMethodId,
};

/// A delivery option offered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub description: String,
    pub price: Decimal,
    pub delivery_days: i32,
    pub active: bool,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Order {
    pub id: OrderId,
    pub business_id: BusinessId,
    pub user_id: Option<ProfileId>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    /// Order id assigned by the payment provider.
    pub payment_order_id: String,
    pub shipping_address: String,
    /// Description of the chosen shipping method.
    pub shipping_method: String,
    pub estimated_delivery: Option<NaiveDate>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub buyer_email: String,
    pub business_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a placed order, with the name and price frozen at purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub payment_order_id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub item_total: Decimal,
}

/// Shipping address as reported by the payment widget on approval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Street line (`address_line_1`).
    #[serde(default, alias = "address_line_1")]
    pub line1: String,
    /// City (`admin_area_2` in the widget payload).
    #[serde(default, alias = "admin_area_2")]
    pub city: String,
    /// State or province (`admin_area_1`).
    #[serde(default, alias = "admin_area_1")]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
}

/// Render the address stored on an order: `line1, city, state postal`, or
/// `N/A` when the widget did not report one.
#[must_use]
pub fn format_address(address: Option<&ShippingAddress>) -> String {
    match address {
        Some(a) => format!("{}, {}, {} {}", a.line1, a.city, a.state, a.postal_code)
            .trim()
            .to_owned(),
        None => "N/A".to_owned(),
    }
}

/// Longest delivery time a shipping method may promise.
pub const MAX_DELIVERY_DAYS: i32 = 365;

/// Delivery date promised at checkout. A date past the calendar's range
/// falls back to today.
#[must_use]
pub fn estimated_delivery(now: DateTime<Utc>, delivery_days: i32) -> NaiveDate {
    now.checked_add_signed(Duration::days(i64::from(delivery_days.max(0))))
        .unwrap_or(now)
        .date_naive()
}

/// Errors from parsing a `YYYY-MM` month filter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("month must be formatted as YYYY-MM")]
pub struct MonthFilterError;

/// A calendar month in UTC, parsed from `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter {
    year: i32,
    month: u32,
}

impl MonthFilter {
    /// # Errors
    ///
    /// Returns [`MonthFilterError`] unless the input is `YYYY-MM` with a
    /// month between 01 and 12.
    pub fn parse(s: &str) -> Result<Self, MonthFilterError> {
        let (year, month) = s.trim().split_once('-').ok_or(MonthFilterError)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(MonthFilterError);
        }
        let year = year.parse::<i32>().map_err(|_| MonthFilterError)?;
        let month = month.parse::<u32>().map_err(|_| MonthFilterError)?;
        if !(1..=12).contains(&month) {
            return Err(MonthFilterError);
        }
        Ok(Self { year, month })
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at.year() == self.year && at.month() == self.month
    }
}

/// Back-office order list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Case-insensitive substring of the buyer email.
    pub email_contains: Option<String>,
    pub month: Option<MonthFilter>,
}

impl OrderFilter {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        let email_ok = self.email_contains.as_deref().is_none_or(|needle| {
            order
                .buyer_email
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        });
        let month_ok = self.month.is_none_or(|m| m.contains(order.created_at));
        email_ok && month_ok
    }

    /// Keep matching orders, preserving their order.
    #[must_use]
    pub fn apply(&self, orders: Vec<Order>) -> Vec<Order> {
        orders.into_iter().filter(|o| self.matches(o)).collect()
    }
}
