mod attachment_tests;
mod category_tests;
mod comment_tests;
mod complaint_tests;
mod dashboard_tests;
mod tracking_tests;
mod user_tests;

pub use attachment_tests::*;
pub use category_tests::*;
pub use comment_tests::*;
pub use complaint_tests::*;
pub use dashboard_tests::*;
pub use tracking_tests::*;
pub use user_tests::*;
