// Optional static API key check for API endpoints

use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use super::models::ApiResponse;

/// Paths that never require the key
const OPEN_PATHS: [&str; 2] = ["/", "/health"];

/// Middleware validating `Authorization: Bearer <secret>`.
/// With no secret configured every request passes.
pub struct Auth {
    secret: Option<String>,
}

impl Auth {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.trim().is_empty()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Auth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service,
            secret: self.secret.clone(),
        }))
    }
}

pub struct AuthMiddleware<S> {
    service: S,
    secret: Option<String>,
}

impl<S> AuthMiddleware<S> {
    fn is_authorized(&self, req: &ServiceRequest) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            return true;
        };
        if OPEN_PATHS.contains(&req.path()) || *req.method() == actix_web::http::Method::OPTIONS {
            return true;
        }

        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .is_some_and(|token| token == secret)
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.is_authorized(&req) {
            let fut = self.service.call(req);
            return Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        tracing::warn!(path = %req.path(), "Rejected request without valid API key");

        // Invalid or missing token
        Box::pin(async move {
            let response = HttpResponse::Unauthorized()
                .json(ApiResponse::error(
                    "Invalid or missing authentication token",
                ))
                .map_into_right_body();
            Ok(req.into_response(response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    macro_rules! app {
        ($secret:expr) => {
            test::init_service(
                App::new()
                    .wrap(Auth::new($secret))
                    .route("/", web::get().to(ok))
                    .route("/health", web::get().to(ok))
                    .route("/parts", web::post().to(ok)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn no_secret_means_open() {
        let app = app!(None);
        let resp = test::call_service(&app, test::TestRequest::post().uri("/parts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let app = app!(Some("  ".to_string()));
        let resp = test::call_service(&app, test::TestRequest::post().uri("/parts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn secret_guards_parts_only() {
        let app = app!(Some("s3cret".to_string()));

        let resp = test::call_service(&app, test::TestRequest::post().uri("/parts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let wrong = test::TestRequest::post()
            .uri("/parts")
            .insert_header(("Authorization", "Bearer nope"))
            .to_request();
        assert_eq!(test::call_service(&app, wrong).await.status(), StatusCode::UNAUTHORIZED);

        let right = test::TestRequest::post()
            .uri("/parts")
            .insert_header(("Authorization", "Bearer s3cret"))
            .to_request();
        assert_eq!(test::call_service(&app, right).await.status(), StatusCode::OK);

        for path in ["/", "/health"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }
}
