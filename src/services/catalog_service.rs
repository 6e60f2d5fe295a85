use crate::config::CatalogPolicy;
use crate::entities::{order_product_entity as order_products, product_entity as products};
use crate::error::{AppError, AppResult};
use crate::models::{CatalogProduct, CreateProductRequest, LineItem, UpdateProductRequest};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

/// Maps order line items onto canonical catalog rows and maintains the
/// order/product link table. Shared catalog rows are mutable state: what
/// happens when a line item disagrees with the stored display fields is
/// decided by the configured [`CatalogPolicy`], not hardcoded here.
#[derive(Clone)]
pub struct CatalogService {
    pool: DatabaseConnection,
    policy: CatalogPolicy,
}

impl CatalogService {
    pub fn new(pool: DatabaseConnection, policy: CatalogPolicy) -> Self {
        Self { pool, policy }
    }

    /// Reject line items with an empty name or reference before anything is
    /// written.
    pub fn validate_line_items(items: &[LineItem]) -> AppResult<()> {
        for (i, item) in items.iter().enumerate() {
            if item.name.trim().is_empty() || item.reference.trim().is_empty() {
                return Err(AppError::InvalidLineItem(format!(
                    "line item {}: missing name or reference",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    /// Resolve every line item to a catalog row (creating or reconciling as
    /// the policy dictates) and link it to `order_id`. Runs on the caller's
    /// connection so multi-step order writes can keep it inside their
    /// transaction. Links that already exist are left alone.
    pub async fn reconcile<C: ConnectionTrait>(
        conn: &C,
        policy: CatalogPolicy,
        order_id: Uuid,
        items: &[LineItem],
    ) -> AppResult<()> {
        Self::validate_line_items(items)?;

        for item in items {
            let product_id = Self::resolve_product(conn, policy, item).await?;

            let linked = order_products::Entity::find_by_id((order_id, product_id))
                .one(conn)
                .await?;
            if linked.is_none() {
                order_products::ActiveModel {
                    order_id: Set(order_id),
                    product_id: Set(product_id),
                }
                .insert(conn)
                .await?;
            }
        }
        Ok(())
    }

    async fn resolve_product<C: ConnectionTrait>(
        conn: &C,
        policy: CatalogPolicy,
        item: &LineItem,
    ) -> AppResult<Uuid> {
        let existing = products::Entity::find()
            .filter(products::Column::Reference.eq(item.reference.as_str()))
            .one(conn)
            .await?;

        let Some(existing) = existing else {
            return Self::insert_product(conn, &item.name, &item.reference, item.brand.as_deref())
                .await;
        };

        if existing.name == item.name && existing.brand == item.brand {
            return Ok(existing.id);
        }

        match policy {
            CatalogPolicy::Overwrite => {
                let id = existing.id;
                let mut model = existing.into_active_model();
                model.name = Set(item.name.clone());
                model.brand = Set(item.brand.clone());
                model.update(conn).await?;
                Ok(id)
            }
            CatalogPolicy::Reject => Err(AppError::CatalogConflict(format!(
                "reference {} already names \"{}\"",
                item.reference, existing.name
            ))),
            CatalogPolicy::Version => Self::version_product(conn, item).await,
        }
    }

    /// Version policy: the stored row keeps its display fields; the order is
    /// linked to a sibling row whose reference carries a `~n` suffix. An
    /// existing sibling with the same display fields is reused.
    async fn version_product<C: ConnectionTrait>(conn: &C, item: &LineItem) -> AppResult<Uuid> {
        let prefix = format!("{}~", item.reference);
        let siblings = products::Entity::find()
            .filter(products::Column::Reference.starts_with(prefix.as_str()))
            .all(conn)
            .await?;

        let mut max_version = 1i64;
        for sibling in &siblings {
            if sibling.name == item.name && sibling.brand == item.brand {
                return Ok(sibling.id);
            }
            if let Some(suffix) = sibling.reference.strip_prefix(&prefix) {
                if let Ok(n) = suffix.parse::<i64>() {
                    max_version = max_version.max(n);
                }
            }
        }

        let reference = format!("{}~{}", item.reference, max_version + 1);
        Self::insert_product(conn, &item.name, &reference, item.brand.as_deref()).await
    }

    async fn insert_product<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        reference: &str,
        brand: Option<&str>,
    ) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        products::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            reference: Set(reference.to_string()),
            brand: Set(brand.map(str::to_string)),
            created_at: Set(Some(Utc::now())),
        }
        .insert(conn)
        .await?;
        Ok(id)
    }

    pub async fn list_products(&self) -> AppResult<Vec<CatalogProduct>> {
        let models = products::Entity::find()
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(CatalogProduct::from).collect())
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> AppResult<CatalogProduct> {
        if request.name.trim().is_empty() || request.reference.trim().is_empty() {
            return Err(AppError::ValidationError(
                "a product needs a name and a reference".to_string(),
            ));
        }

        let model = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            reference: Set(request.reference.clone()),
            brand: Set(request.brand),
            created_at: Set(Some(Utc::now())),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| Self::map_reference_conflict(e, &request.reference))?;

        Ok(CatalogProduct::from(model))
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> AppResult<CatalogProduct> {
        if request.name.trim().is_empty() || request.reference.trim().is_empty() {
            return Err(AppError::ValidationError(
                "a product needs a name and a reference".to_string(),
            ));
        }

        let existing = products::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

        let mut model = existing.into_active_model();
        model.name = Set(request.name);
        model.reference = Set(request.reference.clone());
        model.brand = Set(request.brand);
        let updated = model
            .update(&self.pool)
            .await
            .map_err(|e| Self::map_reference_conflict(e, &request.reference))?;

        Ok(CatalogProduct::from(updated))
    }

    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let result = products::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    fn map_reference_conflict(err: sea_orm::DbErr, reference: &str) -> AppError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::CatalogConflict(format!("reference {reference} already in use"))
            }
            _ => AppError::from(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{insert_order, test_pool};
    use sea_orm::PaginatorTrait;

    fn item(name: &str, reference: &str, brand: Option<&str>) -> LineItem {
        LineItem {
            name: name.to_string(),
            reference: reference.to_string(),
            brand: brand.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_reconcile_creates_and_links() {
        let pool = test_pool().await;
        let order_id = insert_order(&pool, "001").await;

        CatalogService::reconcile(
            &pool,
            CatalogPolicy::Overwrite,
            order_id,
            &[
                item("Parfum X", "REF1", Some("Maison A")),
                item("Parfum Y", "REF2", None),
            ],
        )
        .await
        .unwrap();

        assert_eq!(products::Entity::find().count(&pool).await.unwrap(), 2);
        assert_eq!(
            order_products::Entity::find().count(&pool).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent_across_orders() {
        let pool = test_pool().await;
        let first = insert_order(&pool, "001").await;
        let second = insert_order(&pool, "002").await;

        CatalogService::reconcile(
            &pool,
            CatalogPolicy::Overwrite,
            first,
            &[item("Parfum X", "REF1", None)],
        )
        .await
        .unwrap();
        CatalogService::reconcile(
            &pool,
            CatalogPolicy::Overwrite,
            second,
            &[item("Parfum X Updated", "REF1", Some("Maison B"))],
        )
        .await
        .unwrap();

        // One catalog row, updated in place, linked from both orders
        let all = products::Entity::find().all(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Parfum X Updated");
        assert_eq!(all[0].brand.as_deref(), Some("Maison B"));
        assert_eq!(
            order_products::Entity::find().count(&pool).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_reconcile_skips_existing_link() {
        let pool = test_pool().await;
        let order_id = insert_order(&pool, "001").await;
        let items = [item("Parfum X", "REF1", None)];

        CatalogService::reconcile(&pool, CatalogPolicy::Overwrite, order_id, &items)
            .await
            .unwrap();
        CatalogService::reconcile(&pool, CatalogPolicy::Overwrite, order_id, &items)
            .await
            .unwrap();

        assert_eq!(
            order_products::Entity::find().count(&pool).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_reconcile_rejects_invalid_item_before_writing() {
        let pool = test_pool().await;
        let order_id = insert_order(&pool, "001").await;

        let err = CatalogService::reconcile(
            &pool,
            CatalogPolicy::Overwrite,
            order_id,
            &[item("Parfum X", "REF1", None), item("Parfum Y", "", None)],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidLineItem(_)));
        assert_eq!(products::Entity::find().count(&pool).await.unwrap(), 0);
        assert_eq!(
            order_products::Entity::find().count(&pool).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_reject_policy_refuses_conflicting_display_fields() {
        let pool = test_pool().await;
        let first = insert_order(&pool, "001").await;
        let second = insert_order(&pool, "002").await;

        CatalogService::reconcile(
            &pool,
            CatalogPolicy::Reject,
            first,
            &[item("Parfum X", "REF1", None)],
        )
        .await
        .unwrap();

        // Identical display fields pass, a differing name does not
        CatalogService::reconcile(
            &pool,
            CatalogPolicy::Reject,
            second,
            &[item("Parfum X", "REF1", None)],
        )
        .await
        .unwrap();
        let err = CatalogService::reconcile(
            &pool,
            CatalogPolicy::Reject,
            second,
            &[item("Autre Nom", "REF1", None)],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::CatalogConflict(_)));
        let stored = products::Entity::find().one(&pool).await.unwrap().unwrap();
        assert_eq!(stored.name, "Parfum X");
    }

    #[tokio::test]
    async fn test_version_policy_links_a_versioned_sibling() {
        let pool = test_pool().await;
        let first = insert_order(&pool, "001").await;
        let second = insert_order(&pool, "002").await;
        let third = insert_order(&pool, "003").await;

        CatalogService::reconcile(
            &pool,
            CatalogPolicy::Version,
            first,
            &[item("Parfum X", "REF1", None)],
        )
        .await
        .unwrap();
        CatalogService::reconcile(
            &pool,
            CatalogPolicy::Version,
            second,
            &[item("Autre Nom", "REF1", None)],
        )
        .await
        .unwrap();

        let mut refs: Vec<String> = products::Entity::find()
            .all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.reference)
            .collect();
        refs.sort();
        assert_eq!(refs, vec!["REF1".to_string(), "REF1~2".to_string()]);

        // Same conflicting fields again reuse the sibling instead of minting ~3
        CatalogService::reconcile(
            &pool,
            CatalogPolicy::Version,
            third,
            &[item("Autre Nom", "REF1", None)],
        )
        .await
        .unwrap();
        assert_eq!(products::Entity::find().count(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_product_duplicate_reference_conflicts() {
        let pool = test_pool().await;
        let service = CatalogService::new(pool, CatalogPolicy::Overwrite);

        service
            .create_product(CreateProductRequest {
                name: "Parfum X".to_string(),
                reference: "REF1".to_string(),
                brand: None,
            })
            .await
            .unwrap();
        let err = service
            .create_product(CreateProductRequest {
                name: "Parfum Y".to_string(),
                reference: "REF1".to_string(),
                brand: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CatalogConflict(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_product() {
        let pool = test_pool().await;
        let service = CatalogService::new(pool.clone(), CatalogPolicy::Overwrite);

        let created = service
            .create_product(CreateProductRequest {
                name: "Parfum X".to_string(),
                reference: "REF1".to_string(),
                brand: None,
            })
            .await
            .unwrap();

        let updated = service
            .update_product(
                created.id,
                UpdateProductRequest {
                    name: "Parfum X".to_string(),
                    reference: "REF1-BIS".to_string(),
                    brand: Some("Maison A".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.reference, "REF1-BIS");

        service.delete_product(created.id).await.unwrap();
        let err = service.delete_product(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
