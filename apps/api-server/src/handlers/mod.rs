//! HTTP handlers and route configuration.

mod health;
mod posts;
mod tags;
mod users;

use actix_web::web;

use crate::middleware::error::{json_error_handler, path_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::patch().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            .service(
                web::scope("/tags")
                    .route("", web::get().to(tags::list))
                    .route("/{name}/posts", web::get().to(tags::posts_by_tag)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list))
                    .route("/login", web::post().to(users::login))
                    .route("/register", web::post().to(users::register))
                    .route("/{id}", web::get().to(users::detail))
                    .route("/{id}", web::delete().to(users::deactivate))
                    .route("/{id}", web::patch().to(users::reactivate)),
            ),
    );
}
