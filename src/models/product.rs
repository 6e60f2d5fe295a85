use crate::entities::product_entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogProduct {
    pub id: Uuid,
    pub name: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl From<product_entity::Model> for CatalogProduct {
    fn from(m: product_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            reference: m.reference,
            brand: m.brand,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub reference: String,
    #[serde(default)]
    pub brand: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: String,
    pub reference: String,
    #[serde(default)]
    pub brand: Option<String>,
}
