pub mod error;
pub mod flash;
pub mod role_tag;
pub mod status_badge;

pub use error::html_error_response;
pub use flash::flash_alert;
pub use role_tag::role_tag;
pub use status_badge::status_badge;
