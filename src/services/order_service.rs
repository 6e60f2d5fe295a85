use crate::config::CatalogPolicy;
use crate::entities::{
    client_entity as clients, order_entity as orders, order_product_entity as order_products,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AddProductsRequest, CreateOrderRequest, LineItem, Order, OrderStatistics, OrderStatus,
    PaymentMethod, UpdateOrderRequest, UpdatePaymentRequest,
};
use crate::services::CatalogService;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    catalog_policy: CatalogPolicy,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, catalog_policy: CatalogPolicy) -> Self {
        Self {
            pool,
            catalog_policy,
        }
    }

    /// Persist a new order: client row (reused by full name), order header,
    /// catalog links. The whole call is one transaction, so a duplicate
    /// invoice number or a bad line item leaves nothing behind.
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<Order> {
        CatalogService::validate_line_items(&request.products)?;
        let payment_method = normalize_payment(request.is_paid, request.payment_method)?;

        let txn = self.pool.begin().await?;

        let client_id = upsert_client_by_name(&txn, &request).await?;

        let order_id = Uuid::new_v4();
        orders::ActiveModel {
            id: Set(order_id),
            client_id: Set(client_id),
            invoice_number: Set(request.invoice_number.clone()),
            total_amount: Set(request.total_amount),
            order_date: Set(request.date),
            is_paid: Set(request.is_paid),
            payment_method: Set(payment_method),
            status: Set(request.status),
            created_at: Set(Some(Utc::now())),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_order_insert_err(e, &request.invoice_number))?;

        CatalogService::reconcile(&txn, self.catalog_policy, order_id, &request.products).await?;

        txn.commit().await?;

        log::info!(
            "Order {} created (invoice {})",
            order_id,
            request.invoice_number
        );
        self.get_order(order_id).await
    }

    /// Replace an order's full content, product set included. This is not an
    /// in-place update: the old row is deleted (the link table empties via
    /// cascade) and the header is re-inserted under a fresh id. All five
    /// steps share one transaction, so a failure after the delete rolls back
    /// and the original order survives.
    pub async fn update_order(&self, id: Uuid, request: UpdateOrderRequest) -> AppResult<Order> {
        CatalogService::validate_line_items(&request.products)?;
        let payment_method = normalize_payment(request.is_paid, request.payment_method)?;

        let txn = self.pool.begin().await?;

        // 1. fetch the old row to keep its client
        let old = orders::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(id.to_string()))?;
        let client_id = old.client_id;

        // 2. drop it; links go with it
        orders::Entity::delete_by_id(id).exec(&txn).await?;

        // 3. rewrite the client's contact fields in place
        let client = clients::Entity::find_by_id(client_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::CorruptRecord(format!("order {id} references missing client {client_id}"))
            })?;
        let mut client_model = client.into_active_model();
        client_model.full_name = Set(request.customer_name.clone());
        client_model.address = Set(request.address.clone());
        client_model.email = Set(request.email.clone());
        client_model.phone = Set(request.phone.clone());
        client_model.update(&txn).await?;

        // 4. re-insert the header under a new identity
        let new_id = Uuid::new_v4();
        orders::ActiveModel {
            id: Set(new_id),
            client_id: Set(client_id),
            invoice_number: Set(request.invoice_number.clone()),
            total_amount: Set(request.total_amount),
            order_date: Set(request.date),
            is_paid: Set(request.is_paid),
            payment_method: Set(payment_method),
            status: Set(request.status),
            created_at: Set(Some(Utc::now())),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_order_insert_err(e, &request.invoice_number))?;

        // 5. relink every line item against the new id
        CatalogService::reconcile(&txn, self.catalog_policy, new_id, &request.products).await?;

        txn.commit().await?;

        log::info!("Order {id} replaced by {new_id}");
        self.get_order(new_id).await
    }

    pub async fn delete_order(&self, id: Uuid) -> AppResult<()> {
        let result = orders::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::OrderNotFound(id.to_string()));
        }
        log::info!("Order {id} deleted");
        Ok(())
    }

    pub async fn get_order(&self, id: Uuid) -> AppResult<Order> {
        let (order, client) = orders::Entity::find_by_id(id)
            .find_also_related(clients::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(id.to_string()))?;

        let client = client.ok_or_else(|| {
            AppError::CorruptRecord(format!(
                "order {id} references missing client {}",
                order.client_id
            ))
        })?;

        let links = order_products::Entity::find()
            .filter(order_products::Column::OrderId.eq(id))
            .find_also_related(products::Entity)
            .all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(links.len());
        for (link, product) in links {
            let product = product.ok_or_else(|| {
                AppError::CorruptRecord(format!(
                    "order {id} links missing product {}",
                    link.product_id
                ))
            })?;
            items.push(LineItem::from(product));
        }

        Ok(Order::from_parts(order, client, items))
    }

    /// All orders, newest order date first. A row with a missing client or a
    /// dangling product link is skipped and logged rather than failing the
    /// whole list.
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let rows = orders::Entity::find()
            .find_also_related(clients::Entity)
            .order_by_desc(orders::Column::OrderDate)
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let links = order_products::Entity::find()
            .find_also_related(products::Entity)
            .all(&self.pool)
            .await?;

        let mut items_by_order: HashMap<Uuid, Vec<LineItem>> = HashMap::new();
        let mut corrupt: HashSet<Uuid> = HashSet::new();
        for (link, product) in links {
            match product {
                Some(p) => items_by_order
                    .entry(link.order_id)
                    .or_default()
                    .push(LineItem::from(p)),
                None => {
                    log::warn!(
                        "Skipping order {}: link to missing product {}",
                        link.order_id,
                        link.product_id
                    );
                    corrupt.insert(link.order_id);
                }
            }
        }

        let mut result = Vec::with_capacity(rows.len());
        for (order, client) in rows {
            if corrupt.contains(&order.id) {
                continue;
            }
            let Some(client) = client else {
                log::warn!(
                    "Skipping order {}: missing client {}",
                    order.id,
                    order.client_id
                );
                continue;
            };
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            result.push(Order::from_parts(order, client, items));
        }
        Ok(result)
    }

    pub async fn update_payment_status(
        &self,
        id: Uuid,
        request: UpdatePaymentRequest,
    ) -> AppResult<Order> {
        let payment_method = normalize_payment(request.is_paid, request.payment_method)?;

        let order = orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(id.to_string()))?;

        let mut model = order.into_active_model();
        model.is_paid = Set(request.is_paid);
        model.payment_method = Set(payment_method);
        model.update(&self.pool).await?;

        self.get_order(id).await
    }

    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(id.to_string()))?;

        let mut model = order.into_active_model();
        model.status = Set(status);
        model.update(&self.pool).await?;

        self.get_order(id).await
    }

    /// Attach more line items to an existing order. Already-linked products
    /// are left alone; the stored total is not touched (prices are not part
    /// of the catalog).
    pub async fn add_products(&self, id: Uuid, request: AddProductsRequest) -> AppResult<Order> {
        CatalogService::validate_line_items(&request.products)?;

        let txn = self.pool.begin().await?;

        orders::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(id.to_string()))?;

        CatalogService::reconcile(&txn, self.catalog_policy, id, &request.products).await?;

        txn.commit().await?;
        self.get_order(id).await
    }

    pub async fn get_statistics(&self) -> AppResult<OrderStatistics> {
        #[derive(Debug, FromQueryResult)]
        struct TotalsRow {
            total_orders: i64,
            total_revenue: Option<Decimal>,
        }

        let totals = orders::Entity::find()
            .select_only()
            .column_as(Expr::val(1).count(), "total_orders")
            .column_as(Expr::col(orders::Column::TotalAmount).sum(), "total_revenue")
            .into_model::<TotalsRow>()
            .one(&self.pool)
            .await?;

        let paid = orders::Entity::find()
            .filter(orders::Column::IsPaid.eq(true))
            .select_only()
            .column_as(Expr::val(1).count(), "total_orders")
            .column_as(Expr::col(orders::Column::TotalAmount).sum(), "total_revenue")
            .into_model::<TotalsRow>()
            .one(&self.pool)
            .await?;

        let total_orders = totals.as_ref().map(|r| r.total_orders).unwrap_or(0);
        let total_revenue = totals
            .as_ref()
            .and_then(|r| r.total_revenue)
            .unwrap_or(Decimal::ZERO);
        let paid_orders = paid.as_ref().map(|r| r.total_orders).unwrap_or(0);
        let paid_revenue = paid
            .as_ref()
            .and_then(|r| r.total_revenue)
            .unwrap_or(Decimal::ZERO);

        Ok(OrderStatistics {
            total_orders,
            total_revenue,
            paid_revenue,
            paid_orders,
            unpaid_orders: total_orders - paid_orders,
            ordered: self.count_by_status(OrderStatus::Ordered).await?,
            preparing: self.count_by_status(OrderStatus::Preparing).await?,
            delivered: self.count_by_status(OrderStatus::Delivered).await?,
        })
    }

    async fn count_by_status(&self, status: OrderStatus) -> AppResult<i64> {
        #[derive(Debug, FromQueryResult)]
        struct CountRow {
            count: i64,
        }

        let count = orders::Entity::find()
            .filter(orders::Column::Status.eq(status))
            .select_only()
            .column_as(Expr::val(1).count(), "count")
            .into_model::<CountRow>()
            .one(&self.pool)
            .await?
            .map(|r| r.count)
            .unwrap_or(0);
        Ok(count)
    }
}

/// A paid order needs a payment method; an unpaid one stores none.
fn normalize_payment(
    is_paid: bool,
    payment_method: Option<PaymentMethod>,
) -> AppResult<Option<PaymentMethod>> {
    if is_paid && payment_method.is_none() {
        return Err(AppError::ValidationError(
            "a paid order needs a payment method".to_string(),
        ));
    }
    Ok(if is_paid { payment_method } else { None })
}

/// Reuse the client row carrying this full name, overwriting its contact
/// fields; create it when the name is new. Returns the client id.
async fn upsert_client_by_name<C: ConnectionTrait>(
    conn: &C,
    request: &CreateOrderRequest,
) -> AppResult<Uuid> {
    let existing = clients::Entity::find()
        .filter(clients::Column::FullName.eq(request.customer_name.as_str()))
        .one(conn)
        .await?;

    match existing {
        Some(client) => {
            let id = client.id;
            let mut model = client.into_active_model();
            model.address = Set(request.address.clone());
            model.email = Set(request.email.clone());
            model.phone = Set(request.phone.clone());
            model.update(conn).await?;
            Ok(id)
        }
        None => {
            let id = Uuid::new_v4();
            clients::ActiveModel {
                id: Set(id),
                full_name: Set(request.customer_name.clone()),
                address: Set(request.address.clone()),
                email: Set(request.email.clone()),
                phone: Set(request.phone.clone()),
                created_at: Set(Some(Utc::now())),
            }
            .insert(conn)
            .await?;
            Ok(id)
        }
    }
}

fn map_order_insert_err(err: DbErr, invoice_number: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::DuplicateInvoiceNumber(invoice_number.to_string())
        }
        _ => AppError::from(err),
    }
}
