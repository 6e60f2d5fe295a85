use crate::entities::{client_entity, order_entity, product_entity};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "check")]
    Check,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Check => write!(f, "check"),
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Transfer => write!(f, "transfer"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "ordered")]
    Ordered,
    #[sea_orm(string_value = "preparing")]
    Preparing,
    #[sea_orm(string_value = "delivered")]
    Delivered,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Ordered => write!(f, "ordered"),
            OrderStatus::Preparing => write!(f, "preparing"),
            OrderStatus::Delivered => write!(f, "delivered"),
        }
    }
}

/// A product line as it travels on an order: not yet (or no longer) tied to
/// a catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub name: String,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl From<product_entity::Model> for LineItem {
    fn from(m: product_entity::Model) -> Self {
        Self {
            name: m.name,
            reference: m.reference,
            brand: m.brand,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub products: Vec<LineItem>,
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub date: NaiveDate,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub status: OrderStatus,
}

impl Order {
    /// Reassemble the flat relational rows into the order shape the rest of
    /// the system works with. Line items are sorted by reference: the link
    /// table carries no position, so this keeps reads deterministic.
    pub fn from_parts(
        order: order_entity::Model,
        client: client_entity::Model,
        mut products: Vec<LineItem>,
    ) -> Self {
        products.sort_by(|a, b| a.reference.cmp(&b.reference));
        Self {
            id: order.id,
            customer_name: client.full_name,
            address: client.address,
            email: client.email,
            phone: client.phone,
            products,
            invoice_number: order.invoice_number,
            total_amount: order.total_amount,
            date: order.order_date,
            is_paid: order.is_paid,
            payment_method: order.payment_method,
            status: order.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub address: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub products: Vec<LineItem>,
    pub invoice_number: String,
    pub total_amount: Decimal,
    pub date: NaiveDate,
    pub is_paid: bool,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub status: OrderStatus,
}

/// Full replacement payload; the order keeps its invoice number but not its
/// row identity.
pub type UpdateOrderRequest = CreateOrderRequest;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub is_paid: bool,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddProductsRequest {
    pub products: Vec<LineItem>,
}
