use actix_web::{web, HttpResponse};

use errors::ErrorResponse;

use crate::middleware::Auth;

pub mod admin;
pub mod polls;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/polls")
                    .route("", web::get().to(polls::index))
                    .route("/{id}", web::get().to(polls::detail))
                    .route("/{id}/results", web::get().to(polls::results))
                    .route("/{id}/vote", web::post().to(polls::vote)),
            )
            .service(
                web::scope("/admin")
                    .route("/login", web::post().to(admin::login))
                    .service(
                        web::resource("/questions")
                            .wrap(Auth)
                            .route(web::get().to(admin::list_questions))
                            .route(web::post().to(admin::create_question)),
                    )
                    .service(
                        web::resource("/questions/{id}")
                            .wrap(Auth)
                            .route(web::get().to(admin::get_question))
                            .route(web::put().to(admin::update_question))
                            .route(web::delete().to(admin::delete_question)),
                    )
                    .service(
                        web::resource("/questions/{id}/choices")
                            .wrap(Auth)
                            .route(web::post().to(admin::create_choice)),
                    )
                    .service(
                        web::resource("/choices/{id}")
                            .wrap(Auth)
                            .route(web::put().to(admin::update_choice))
                            .route(web::delete().to(admin::delete_choice)),
                    )
                    .default_service(web::route().to(not_found)),
            ),
    );
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::from("Not Found"))
}
