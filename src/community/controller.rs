use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::community::model::{CreatePostRequest, TextRequest, UpdatePostRequest};
use crate::community::service::CommunityService;
use crate::middleware::auth::actor_id;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;
use crate::utils::pagination::{ListQuery, PageRequest};
use crate::utils::response;

/// List community posts, newest first by default
/// GET /community?page&limit&sortBy&order
pub async fn list_posts(
    community_service: web::Data<CommunityService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, CustomError> {
    let page = PageRequest::from(&query.into_inner());
    let result = community_service.list_posts(page).await?;

    Ok(response::ok(
        "Posts fetched successfully",
        serde_json::to_value(&result)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?,
    ))
}

/// POST /community
pub async fn create_post(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    let owner_id = actor_id(&req)?;

    let post = community_service
        .create_post(owner_id, body.into_inner())
        .await?;

    Ok(response::created(
        "Post created successfully",
        json!({ "post": post }),
    ))
}

/// PUT /community/{id}
pub async fn update_post(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let post_id = parse_object_id(&path.into_inner(), "post")?;

    let post = community_service
        .update_post(&post_id, &actor, body.into_inner())
        .await?;

    Ok(response::ok("Post updated successfully", json!({ "post": post })))
}

/// DELETE /community/{id}
pub async fn delete_post(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let post_id = parse_object_id(&path.into_inner(), "post")?;

    community_service.delete_post(&post_id, &actor).await?;

    Ok(response::ok("Post deleted successfully", json!({})))
}

/// PUT /community/{id}/like
pub async fn like_post(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let post_id = parse_object_id(&path.into_inner(), "post")?;

    let toggle = community_service.toggle_post_like(&post_id, actor).await?;

    Ok(response::ok(
        if toggle.is_liked { "Post liked" } else { "Post unliked" },
        json!(toggle),
    ))
}

/// POST /community/{post_id}/comments
pub async fn add_comment(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<String>,
    body: web::Json<TextRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let post_id = parse_object_id(&path.into_inner(), "post")?;

    let comment = community_service
        .add_comment(&post_id, actor, &body.text)
        .await?;

    Ok(response::created(
        "Comment created successfully",
        json!({ "comment": comment }),
    ))
}

/// PUT /community/{post_id}/comments/{comment_id}
pub async fn update_comment(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<(String, String)>,
    body: web::Json<TextRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_object_id(&post_id, "post")?;
    let comment_id = parse_object_id(&comment_id, "comment")?;

    let comment = community_service
        .update_comment(&post_id, &comment_id, &actor, &body.text)
        .await?;

    Ok(response::ok(
        "Comment updated successfully",
        json!({ "comment": comment }),
    ))
}

/// DELETE /community/{post_id}/comments/{comment_id}
pub async fn delete_comment(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_object_id(&post_id, "post")?;
    let comment_id = parse_object_id(&comment_id, "comment")?;

    community_service
        .delete_comment(&post_id, &comment_id, &actor)
        .await?;

    Ok(response::ok("Comment deleted successfully", json!({})))
}

/// PUT /community/{post_id}/comments/{comment_id}/like
pub async fn like_comment(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_object_id(&post_id, "post")?;
    let comment_id = parse_object_id(&comment_id, "comment")?;

    let toggle = community_service
        .toggle_comment_like(&post_id, &comment_id, actor)
        .await?;

    Ok(response::ok(
        if toggle.is_liked { "Comment liked" } else { "Comment unliked" },
        json!(toggle),
    ))
}

/// POST /community/{post_id}/comments/{comment_id}/replies
pub async fn add_reply(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<(String, String)>,
    body: web::Json<TextRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_object_id(&post_id, "post")?;
    let comment_id = parse_object_id(&comment_id, "comment")?;

    let reply = community_service
        .add_reply(&post_id, &comment_id, actor, &body.text)
        .await?;

    Ok(response::created(
        "Reply created successfully",
        json!({ "reply": reply }),
    ))
}

fn reply_path(path: web::Path<(String, String, String)>) -> Result<[ObjectId; 3], CustomError> {
    let (post_id, comment_id, reply_id) = path.into_inner();
    Ok([
        parse_object_id(&post_id, "post")?,
        parse_object_id(&comment_id, "comment")?,
        parse_object_id(&reply_id, "reply")?,
    ])
}

/// PUT /community/{post_id}/comments/{comment_id}/replies/{reply_id}
pub async fn update_reply(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<(String, String, String)>,
    body: web::Json<TextRequest>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let [post_id, comment_id, reply_id] = reply_path(path)?;

    let reply = community_service
        .update_reply(&post_id, &comment_id, &reply_id, &actor, &body.text)
        .await?;

    Ok(response::ok(
        "Reply updated successfully",
        json!({ "reply": reply }),
    ))
}

/// DELETE /community/{post_id}/comments/{comment_id}/replies/{reply_id}
pub async fn delete_reply(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let [post_id, comment_id, reply_id] = reply_path(path)?;

    community_service
        .delete_reply(&post_id, &comment_id, &reply_id, &actor)
        .await?;

    Ok(response::ok("Reply deleted successfully", json!({})))
}

/// PUT /community/{post_id}/comments/{comment_id}/replies/{reply_id}/like
pub async fn like_reply(
    req: HttpRequest,
    community_service: web::Data<CommunityService>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, CustomError> {
    let actor = actor_id(&req)?;
    let [post_id, comment_id, reply_id] = reply_path(path)?;

    let toggle = community_service
        .toggle_reply_like(&post_id, &comment_id, &reply_id, actor)
        .await?;

    Ok(response::ok(
        if toggle.is_liked { "Reply liked" } else { "Reply unliked" },
        json!(toggle),
    ))
}
