use crate::models::*;
use crate::services::ClientService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/clients",
    tag = "client",
    responses(
        (status = 200, description = "The roster with per-client order aggregates")
    )
)]
pub async fn list_clients(client_service: web::Data<ClientService>) -> Result<HttpResponse> {
    match client_service.list_clients().await {
        Ok(clients) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": clients
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "client",
    params(("id" = Uuid, Path, description = "Client id")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Contact details updated"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn update_client(
    client_service: web::Data<ClientService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateClientRequest>,
) -> Result<HttpResponse> {
    match client_service
        .update_client(path.into_inner(), request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Client updated"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "client",
    params(("id" = Uuid, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client and their orders deleted"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn delete_client(
    client_service: web::Data<ClientService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match client_service.delete_client(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Client deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn client_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::get().to(list_clients))
            .route("/{id}", web::put().to(update_client))
            .route("/{id}", web::delete().to(delete_client)),
    );
}
