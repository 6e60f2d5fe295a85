use crate::entities::order_entity as orders;
use crate::error::AppResult;
use crate::utils::{format_invoice_number, parse_invoice_number};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};

/// Hands out the next sequential invoice number by reading the highest
/// stored one. Two concurrent callers can be handed the same number; the
/// unique index on `orders.invoice_number` turns the losing insert into a
/// `DuplicateInvoiceNumber` error, and the caller asks for a fresh number.
#[derive(Clone)]
pub struct InvoiceService {
    pool: DatabaseConnection,
}

impl InvoiceService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn next_invoice_number(&self) -> AppResult<String> {
        // Widest string first, so "1000" outranks "999"
        let last = orders::Entity::find()
            .order_by_desc(SimpleExpr::FunctionCall(Func::char_length(Expr::col(
                orders::Column::InvoiceNumber,
            ))))
            .order_by_desc(orders::Column::InvoiceNumber)
            .limit(1)
            .one(&self.pool)
            .await?;

        let next = last
            .and_then(|order| parse_invoice_number(&order.invoice_number))
            .map(|n| n + 1)
            .unwrap_or(1);

        Ok(format_invoice_number(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{insert_order, test_pool};

    #[tokio::test]
    async fn test_empty_store_starts_at_001() {
        let pool = test_pool().await;
        let service = InvoiceService::new(pool);
        assert_eq!(service.next_invoice_number().await.unwrap(), "001");
    }

    #[tokio::test]
    async fn test_increments_past_existing_numbers() {
        let pool = test_pool().await;
        insert_order(&pool, "001").await;
        insert_order(&pool, "002").await;

        let service = InvoiceService::new(pool);
        assert_eq!(service.next_invoice_number().await.unwrap(), "003");
    }

    #[tokio::test]
    async fn test_grows_width_past_999() {
        let pool = test_pool().await;
        insert_order(&pool, "999").await;

        let service = InvoiceService::new(pool.clone());
        assert_eq!(service.next_invoice_number().await.unwrap(), "1000");

        // "1000" must outrank "999" even though it sorts lower as a string
        insert_order(&pool, "1000").await;
        assert_eq!(service.next_invoice_number().await.unwrap(), "1001");
    }

    #[tokio::test]
    async fn test_unparseable_number_falls_back_to_001() {
        let pool = test_pool().await;
        insert_order(&pool, "FAC-SPECIALE").await;

        let service = InvoiceService::new(pool);
        assert_eq!(service.next_invoice_number().await.unwrap(), "001");
    }
}
