use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderStatistics {
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub paid_revenue: Decimal,
    pub paid_orders: i64,
    pub unpaid_orders: i64,
    pub ordered: i64,
    pub preparing: i64,
    pub delivered: i64,
}
