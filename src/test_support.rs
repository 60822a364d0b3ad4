//! Throwaway upstream servers for exercising the HTTP clients in tests.

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

/// Answer every request on a fresh local port with `respond` and return the
/// base URL. Must run inside an actix system (`#[actix_web::test]`).
pub fn serve_with<F>(respond: F) -> String
where
    F: Fn(&HttpRequest) -> HttpResponse + Clone + Send + 'static,
{
    let server = HttpServer::new(move || {
        let respond = respond.clone();
        App::new().default_service(web::to(move |req: HttpRequest| {
            let resp = respond(&req);
            async move { resp }
        }))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind stub upstream");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

/// Serve `body` with `status` on every path.
pub fn serve_fixed(status: StatusCode, content_type: &'static str, body: &'static str) -> String {
    serve_with(move |_req| {
        HttpResponse::build(status)
            .content_type(content_type)
            .body(body)
    })
}
