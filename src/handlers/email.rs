use crate::external::{EmailMessage, ResendService};
use crate::services::{NotificationService, OrderService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailBody {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[utoipa::path(
    post,
    path = "/emails",
    tag = "email",
    request_body = SendEmailBody,
    responses(
        (status = 200, description = "Email handed to the provider"),
        (status = 502, description = "Provider rejected the email")
    )
)]
pub async fn send_email(
    resend_service: web::Data<ResendService>,
    request: web::Json<SendEmailBody>,
) -> Result<HttpResponse> {
    let body = request.into_inner();
    let message = EmailMessage {
        to: body.to,
        subject: body.subject,
        html: body.html,
    };
    match resend_service.send_email(&message).await {
        Ok(id) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "id": id }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/emails/order-confirmation/{id}",
    tag = "email",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Confirmation sent to the order's client"),
        (status = 400, description = "Client has no email address"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn send_order_confirmation(
    order_service: web::Data<OrderService>,
    notification_service: web::Data<NotificationService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let order = match order_service.get_order(path.into_inner()).await {
        Ok(order) => order,
        Err(e) => return Ok(e.error_response()),
    };

    match notification_service.send_order_confirmation(&order).await {
        Ok(id) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "id": id }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn email_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/emails")
            .route("", web::post().to(send_email))
            .route(
                "/order-confirmation/{id}",
                web::post().to(send_order_confirmation),
            ),
    );
}
