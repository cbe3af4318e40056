pub mod errors;
pub mod files;
pub mod html;
pub mod json;
pub mod redirect;

pub use errors::ResultResp;

pub use files::download_response;
pub use html::html_response;
pub use json::json_response;
pub use redirect::{flash_redirect, redirect_response};
