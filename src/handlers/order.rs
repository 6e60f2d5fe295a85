use crate::models::*;
use crate::services::{InvoiceService, OrderService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    responses(
        (status = 200, description = "All orders, newest order date first"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn list_orders(order_service: web::Data<OrderService>) -> Result<HttpResponse> {
    match order_service.list_orders().await {
        Ok(orders) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": orders
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = Order),
        (status = 400, description = "Invalid line item or payload"),
        (status = 409, description = "Duplicate invoice number")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service.create_order(request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "order",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order replaced; the returned order carries a new id", body = Order),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Duplicate invoice number")
    )
)]
pub async fn update_order(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update_order(path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.delete_order(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/orders/{id}/payment",
    tag = "order",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment flag and method updated", body = Order),
        (status = 400, description = "Paid order without a payment method"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_payment_status(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdatePaymentRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update_payment_status(path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    tag = "order",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Fulfillment status updated", body = Order),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_status(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update_status(path.into_inner(), request.into_inner().status)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{id}/products",
    tag = "order",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = AddProductsRequest,
    responses(
        (status = 200, description = "Line items linked to the order", body = Order),
        (status = 400, description = "Invalid line item"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn add_products(
    order_service: web::Data<OrderService>,
    path: web::Path<Uuid>,
    request: web::Json<AddProductsRequest>,
) -> Result<HttpResponse> {
    match order_service
        .add_products(path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/next-invoice-number",
    tag = "order",
    responses(
        (status = 200, description = "Next sequential invoice number"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn next_invoice_number(
    invoice_service: web::Data<InvoiceService>,
) -> Result<HttpResponse> {
    match invoice_service.next_invoice_number().await {
        Ok(number) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "invoice_number": number }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/statistics",
    tag = "order",
    responses(
        (status = 200, description = "Order and revenue aggregates", body = OrderStatistics)
    )
)]
pub async fn get_statistics(order_service: web::Data<OrderService>) -> Result<HttpResponse> {
    match order_service.get_statistics().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            // Literal segments have to land before "/{id}"
            .route("/next-invoice-number", web::get().to(next_invoice_number))
            .route("/statistics", web::get().to(get_statistics))
            .route("", web::get().to(list_orders))
            .route("", web::post().to(create_order))
            .route("/{id}", web::put().to(update_order))
            .route("/{id}", web::delete().to(delete_order))
            .route("/{id}/payment", web::patch().to(update_payment_status))
            .route("/{id}/status", web::patch().to(update_status))
            .route("/{id}/products", web::post().to(add_products)),
    );
}
