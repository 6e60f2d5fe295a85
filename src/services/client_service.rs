use crate::entities::{client_entity as clients, order_entity as orders};
use crate::error::{AppError, AppResult};
use crate::models::{ClientSummary, UpdateClientRequest};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult, IntoActiveModel,
    QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct ClientService {
    pool: DatabaseConnection,
}

impl ClientService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// The roster, alphabetical, each entry carrying its order aggregates.
    pub async fn list_clients(&self) -> AppResult<Vec<ClientSummary>> {
        #[derive(Debug, FromQueryResult)]
        struct OrderAggRow {
            client_id: Uuid,
            order_count: i64,
            total_spent: Option<Decimal>,
            last_order_date: Option<NaiveDate>,
        }

        let rows = clients::Entity::find()
            .order_by_asc(clients::Column::FullName)
            .all(&self.pool)
            .await?;

        let aggregates = orders::Entity::find()
            .select_only()
            .column(orders::Column::ClientId)
            .column_as(Expr::val(1).count(), "order_count")
            .column_as(Expr::col(orders::Column::TotalAmount).sum(), "total_spent")
            .column_as(Expr::col(orders::Column::OrderDate).max(), "last_order_date")
            .group_by(orders::Column::ClientId)
            .into_model::<OrderAggRow>()
            .all(&self.pool)
            .await?;

        let mut by_client: HashMap<Uuid, OrderAggRow> = aggregates
            .into_iter()
            .map(|row| (row.client_id, row))
            .collect();

        Ok(rows
            .into_iter()
            .map(|client| {
                let agg = by_client.remove(&client.id);
                ClientSummary {
                    id: client.id,
                    full_name: client.full_name,
                    address: client.address,
                    email: client.email,
                    phone: client.phone,
                    order_count: agg.as_ref().map(|a| a.order_count).unwrap_or(0),
                    total_spent: agg
                        .as_ref()
                        .and_then(|a| a.total_spent)
                        .unwrap_or(Decimal::ZERO),
                    last_order_date: agg.and_then(|a| a.last_order_date),
                }
            })
            .collect())
    }

    pub async fn update_client(&self, id: Uuid, request: UpdateClientRequest) -> AppResult<()> {
        if request.full_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "a client needs a full name".to_string(),
            ));
        }

        let client = clients::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("client {id}")))?;

        let mut model = client.into_active_model();
        model.full_name = Set(request.full_name);
        model.address = Set(request.address);
        model.email = Set(request.email);
        model.phone = Set(request.phone);
        model.update(&self.pool).await?;
        Ok(())
    }

    /// Remove a client; their orders (and the orders' links) go with them.
    pub async fn delete_client(&self, id: Uuid) -> AppResult<()> {
        let result = clients::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("client {id}")));
        }
        log::info!("Client {id} deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogPolicy;
    use crate::database::test_support::test_pool;
    use crate::models::{CreateOrderRequest, LineItem, OrderStatus};
    use crate::services::OrderService;
    use sea_orm::PaginatorTrait;

    fn order_request(name: &str, invoice: &str, amount: Decimal, date: NaiveDate) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: name.to_string(),
            address: "1 rue A".to_string(),
            email: None,
            phone: None,
            products: vec![LineItem {
                name: "Parfum X".to_string(),
                reference: "REF1".to_string(),
                brand: None,
            }],
            invoice_number: invoice.to_string(),
            total_amount: amount,
            date,
            is_paid: false,
            payment_method: None,
            status: OrderStatus::Ordered,
        }
    }

    #[tokio::test]
    async fn test_list_clients_aggregates_orders() {
        let pool = test_pool().await;
        let orders_svc = OrderService::new(pool.clone(), CatalogPolicy::Overwrite);
        let svc = ClientService::new(pool.clone());

        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        orders_svc
            .create_order(order_request("Jean Dupont", "001", Decimal::new(3500, 2), d1))
            .await
            .unwrap();
        orders_svc
            .create_order(order_request("Jean Dupont", "002", Decimal::new(1250, 2), d2))
            .await
            .unwrap();
        orders_svc
            .create_order(order_request("Marie Martin", "003", Decimal::new(2000, 2), d1))
            .await
            .unwrap();

        let roster = svc.list_clients().await.unwrap();
        assert_eq!(roster.len(), 2);

        // Alphabetical: Jean before Marie
        assert_eq!(roster[0].full_name, "Jean Dupont");
        assert_eq!(roster[0].order_count, 2);
        assert_eq!(roster[0].total_spent, Decimal::new(4750, 2));
        assert_eq!(roster[0].last_order_date, Some(d2));

        assert_eq!(roster[1].full_name, "Marie Martin");
        assert_eq!(roster[1].order_count, 1);
    }

    #[tokio::test]
    async fn test_update_client() {
        let pool = test_pool().await;
        let orders_svc = OrderService::new(pool.clone(), CatalogPolicy::Overwrite);
        let svc = ClientService::new(pool.clone());

        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        orders_svc
            .create_order(order_request("Jean Dupont", "001", Decimal::new(3500, 2), d))
            .await
            .unwrap();

        let id = svc.list_clients().await.unwrap()[0].id;
        svc.update_client(
            id,
            UpdateClientRequest {
                full_name: "Jean Dupont".to_string(),
                address: "2 rue B".to_string(),
                email: Some("jean@example.com".to_string()),
                phone: None,
            },
        )
        .await
        .unwrap();

        let roster = svc.list_clients().await.unwrap();
        assert_eq!(roster[0].address, "2 rue B");
        assert_eq!(roster[0].email.as_deref(), Some("jean@example.com"));

        let err = svc
            .update_client(
                Uuid::new_v4(),
                UpdateClientRequest {
                    full_name: "X".to_string(),
                    address: "Y".to_string(),
                    email: None,
                    phone: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_client_cascades_orders() {
        let pool = test_pool().await;
        let orders_svc = OrderService::new(pool.clone(), CatalogPolicy::Overwrite);
        let svc = ClientService::new(pool.clone());

        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        orders_svc
            .create_order(order_request("Jean Dupont", "001", Decimal::new(3500, 2), d))
            .await
            .unwrap();

        let id = svc.list_clients().await.unwrap()[0].id;
        svc.delete_client(id).await.unwrap();

        assert_eq!(clients::Entity::find().count(&pool).await.unwrap(), 0);
        assert_eq!(orders::Entity::find().count(&pool).await.unwrap(), 0);
    }
}
