use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::order::list_orders,
        handlers::order::create_order,
        handlers::order::update_order,
        handlers::order::delete_order,
        handlers::order::update_payment_status,
        handlers::order::update_status,
        handlers::order::add_products,
        handlers::order::next_invoice_number,
        handlers::order::get_statistics,
        handlers::client::list_clients,
        handlers::client::update_client,
        handlers::client::delete_client,
        handlers::product::list_products,
        handlers::product::create_product,
        handlers::product::update_product,
        handlers::product::delete_product,
        handlers::email::send_email,
        handlers::email::send_order_confirmation,
    ),
    components(
        schemas(
            Order,
            LineItem,
            PaymentMethod,
            OrderStatus,
            CreateOrderRequest,
            UpdatePaymentRequest,
            UpdateStatusRequest,
            AddProductsRequest,
            ClientSummary,
            UpdateClientRequest,
            CatalogProduct,
            CreateProductRequest,
            UpdateProductRequest,
            OrderStatistics,
            ApiError,
            handlers::email::SendEmailBody,
        )
    ),
    tags(
        (name = "order", description = "Order management API"),
        (name = "client", description = "Client roster API"),
        (name = "product", description = "Product catalog API"),
        (name = "email", description = "Outbound email API"),
    ),
    info(
        title = "Atelier Backend API",
        version = "1.0.0",
        description = "Order, catalog and client management for the perfume studio",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
