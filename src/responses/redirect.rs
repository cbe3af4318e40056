// responses/redirect.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use url::form_urlencoded;

/// Plain 302 to another page.
pub fn redirect_response(location: &str) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(302)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}

/// 302 carrying a one-shot banner in the query string.
/// The target page reads `message` and `tone` back out and renders the
/// alert. Bases that already carry a query keep it.
pub fn flash_redirect(base: &str, message: &str, tone: &str) -> ResultResp {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("message", message)
        .append_pair("tone", tone)
        .finish();

    let sep = if base.contains('?') { '&' } else { '?' };
    redirect_response(&format!("{base}{sep}{query}"))
}
