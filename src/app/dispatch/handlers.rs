use crate::app::dispatch::listing::render_listing;
use crate::app::dispatch::{DispatchError, Dispatcher};
use crate::core::models::Metric;
use actix_web::error::BlockingError;
use actix_web::http::header::ContentType;
use actix_web::web::Bytes;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use tracing::debug;

/// Registers every route of the wire protocol plus the html listing
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(list_metrics))
        .route("/update/", web::post().to(update_json))
        .route("/value/", web::get().to(value_json))
        .route("/value/", web::post().to(value_json))
        .route("/update/{type}/{name}/{value}", web::post().to(update_path))
        .route("/value/{type}/{name}", web::get().to(value_path));
}

/// Request bodies arrive already inflated when sent with a gzip
/// content encoding, only the content type is left to check
fn decode_metric(req: &HttpRequest, body: &Bytes) -> Result<Metric, DispatchError> {
    if req.content_type() != "application/json" {
        return Err(DispatchError::BadRequest(format!(
            "expected application/json, got '{}'",
            req.content_type()
        )));
    }

    serde_json::from_slice(body)
        .map_err(|e| DispatchError::BadRequest(format!("malformed metric: {}", e)))
}

fn blocked(e: BlockingError) -> DispatchError {
    DispatchError::Internal(e.to_string())
}

/// Writes run on the blocking pool, with a zero store interval each
/// one also saves the store to disk before returning
async fn update_path(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, DispatchError> {
    let (mtype, name, value) = path.into_inner();

    web::block(move || dispatcher.update_from_path(&mtype, &name, &value))
        .await
        .map_err(blocked)??;

    Ok(HttpResponse::Ok().finish())
}

async fn value_path(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, DispatchError> {
    let (mtype, name) = path.into_inner();

    let value = dispatcher.value_from_path(&mtype, &name)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(value))
}

async fn update_json(
    dispatcher: web::Data<Dispatcher>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, DispatchError> {
    let metric = decode_metric(&req, &body)?;

    debug!("Update {} {}", metric.mtype, metric.id);

    let current = web::block(move || dispatcher.update(metric))
        .await
        .map_err(blocked)??;

    Ok(HttpResponse::Ok().json(current))
}

async fn value_json(
    dispatcher: web::Data<Dispatcher>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, DispatchError> {
    let metric = decode_metric(&req, &body)?;

    let current = dispatcher.value(metric)?;

    Ok(HttpResponse::Ok().json(current))
}

async fn list_metrics(dispatcher: web::Data<Dispatcher>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_listing(&dispatcher.snapshot()))
}
