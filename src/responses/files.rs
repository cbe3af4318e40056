// responses/files.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// Serve stored attachment bytes back under their original name.
pub fn download_response(buffer: Vec<u8>, content_type: &str, filename: &str) -> ResultResp {
    // Quotes would break the header value.
    let safe_name: String = filename.chars().filter(|c| *c != '"').collect();

    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{safe_name}\""),
        )
        .body(Body::from(buffer))
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}
