use crate::models::*;
use crate::services::CatalogService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/products",
    tag = "product",
    responses(
        (status = 200, description = "The catalog, newest entries first")
    )
)]
pub async fn list_products(catalog_service: web::Data<CatalogService>) -> Result<HttpResponse> {
    match catalog_service.list_products().await {
        Ok(products) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": products
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "product",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Catalog entry created", body = CatalogProduct),
        (status = 409, description = "Reference already in use")
    )
)]
pub async fn create_product(
    catalog_service: web::Data<CatalogService>,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse> {
    match catalog_service.create_product(request.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "product",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Catalog entry updated", body = CatalogProduct),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Reference already in use")
    )
)]
pub async fn update_product(
    catalog_service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse> {
    match catalog_service
        .update_product(path.into_inner(), request.into_inner())
        .await
    {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "product",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Catalog entry deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    catalog_service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match catalog_service.delete_product(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Product deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
