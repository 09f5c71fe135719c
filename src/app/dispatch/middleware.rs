use actix_web::Error;
use actix_web::body::{BodySize, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use std::time::Instant;
use tracing::info;

/// Logs uri, method, duration, status and response size of every request
pub async fn log_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let started = Instant::now();
    let method = req.method().to_string();
    let uri = req.uri().to_string();

    let res = next.call(req).await?;

    let size = match res.response().body().size() {
        BodySize::Sized(size) => size,
        _ => 0,
    };

    info!(
        uri = %uri,
        method = %method,
        duration = ?started.elapsed(),
        status = res.status().as_u16(),
        size,
        "HTTP request"
    );

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::middleware::from_fn;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn test_passes_response_through() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(log_requests))
                .route("/", web::get().to(|| async { HttpResponse::Ok().body("ok") })),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        assert_eq!(test::read_body(res).await, "ok");
    }
}
