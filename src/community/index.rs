use super::controller::{
    add_comment, add_reply, create_post, delete_comment, delete_post, delete_reply, like_comment,
    like_post, like_reply, list_posts, update_comment, update_post, update_reply,
};
use crate::middleware::auth::verify_token;
use actix_web::{guard, web};
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn community_routes(cfg: &mut web::ServiceConfig) {
    // Listing is public; the guard lets other methods fall through to the
    // authenticated scope below.
    cfg.service(
        web::resource("/community")
            .guard(guard::Get())
            .to(list_posts),
    );

    cfg.service(
        web::scope("/community")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route("", web::post().to(create_post))
            .route("/{id}", web::put().to(update_post))
            .route("/{id}", web::delete().to(delete_post))
            .route("/{id}/like", web::put().to(like_post))
            .route("/{post_id}/comments", web::post().to(add_comment))
            .route(
                "/{post_id}/comments/{comment_id}",
                web::put().to(update_comment),
            )
            .route(
                "/{post_id}/comments/{comment_id}",
                web::delete().to(delete_comment),
            )
            .route(
                "/{post_id}/comments/{comment_id}/like",
                web::put().to(like_comment),
            )
            .route(
                "/{post_id}/comments/{comment_id}/replies",
                web::post().to(add_reply),
            )
            .route(
                "/{post_id}/comments/{comment_id}/replies/{reply_id}",
                web::put().to(update_reply),
            )
            .route(
                "/{post_id}/comments/{comment_id}/replies/{reply_id}",
                web::delete().to(delete_reply),
            )
            .route(
                "/{post_id}/comments/{comment_id}/replies/{reply_id}/like",
                web::put().to(like_reply),
            ),
    );
}
