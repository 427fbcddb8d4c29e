use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::Error;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::debug;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

const CORRELATION_ID_LENGTH: usize = 24;

fn generate_correlation_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CORRELATION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Ensure every request carries an `X-Correlation-ID`, generating one when the
/// client sent none, and echo it on the response.
pub async fn correlation_id(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let value = match req.headers().get(CORRELATION_ID_HEADER) {
        Some(existing) if !existing.is_empty() => existing.clone(),
        _ => HeaderValue::from_str(&generate_correlation_id())
            .map_err(actix_web::error::ErrorInternalServerError)?,
    };

    debug!(
        correlation_id = value.to_str().unwrap_or_default(),
        method = %req.method(),
        path = req.path(),
        "Handling request"
    );

    let name = HeaderName::from_static(CORRELATION_ID_HEADER);
    req.headers_mut().insert(name.clone(), value.clone());
    let mut res = next.call(req).await?;
    res.headers_mut().insert(name, value);
    Ok(res)
}
