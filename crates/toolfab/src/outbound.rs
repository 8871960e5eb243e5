use http::{Request, Response};
use once_cell::sync::Lazy;
use reqwest::Client;

use crate::error::HarnessError;

/// A single, global client, built once
static CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// Executes an `http::Request` over the shared reqwest client.
///
/// Non-success statuses are returned as regular responses so the provider can
/// surface the error body; only transport failures become errors here.
pub async fn call_outbound(req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, HarnessError> {
    let method = req
        .method()
        .as_str()
        .parse::<reqwest::Method>()
        .map_err(|e| HarnessError::HttpError(e.to_string()))?;

    let mut rb = CLIENT.request(method, req.uri().to_string());

    for (name, value) in req.headers().iter() {
        let val_str = value
            .to_str()
            .map_err(|e| HarnessError::HttpError(e.to_string()))?;
        rb = rb.header(name.as_str(), val_str);
    }

    let resp = rb.body(req.into_body()).send().await?;

    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.bytes().await?.to_vec();

    let mut builder = Response::builder().status(status.as_u16());
    for (name, value) in headers.iter() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }
    Ok(builder.body(bytes)?)
}
