use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::adventure::model::{AdventureView, CreateAdventureRequest};
use crate::adventure::service::AdventureService;
use crate::middleware::auth::actor_id;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;
use crate::utils::response;

/// Save an adventure
/// POST /adventures
pub async fn create_adventure(
    req: HttpRequest,
    adventure_service: web::Data<AdventureService>,
    body: web::Json<CreateAdventureRequest>,
) -> Result<HttpResponse, CustomError> {
    let owner_id = actor_id(&req)?;

    let adventure = adventure_service
        .create_adventure(owner_id, body.into_inner())
        .await?;

    Ok(response::created(
        "Adventure saved successfully",
        json!({ "adventure": AdventureView::from(&adventure) }),
    ))
}

/// List the caller's adventures
/// GET /adventures
pub async fn list_adventures(
    req: HttpRequest,
    adventure_service: web::Data<AdventureService>,
) -> Result<HttpResponse, CustomError> {
    let owner_id = actor_id(&req)?;

    let adventures: Vec<AdventureView> = adventure_service
        .list_adventures(&owner_id)
        .await?
        .iter()
        .map(AdventureView::from)
        .collect();

    Ok(response::ok(
        "Adventures retrieved successfully",
        json!({ "count": adventures.len(), "adventures": adventures }),
    ))
}

/// GET /adventures/{id}
pub async fn get_adventure(
    req: HttpRequest,
    adventure_service: web::Data<AdventureService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let owner_id = actor_id(&req)?;
    let id = parse_object_id(&path.into_inner(), "adventure")?;

    let adventure = adventure_service.get_adventure(&id, &owner_id).await?;

    Ok(response::ok(
        "Adventure retrieved successfully",
        json!({ "adventure": AdventureView::from(&adventure) }),
    ))
}

/// DELETE /adventures/{id}
pub async fn delete_adventure(
    req: HttpRequest,
    adventure_service: web::Data<AdventureService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let owner_id = actor_id(&req)?;
    let id = parse_object_id(&path.into_inner(), "adventure")?;

    adventure_service.delete_adventure(&id, &owner_id).await?;

    Ok(response::ok("Adventure deleted successfully", json!({})))
}
