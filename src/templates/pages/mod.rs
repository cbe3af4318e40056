pub mod attachments;
pub mod categories;
pub mod comments;
pub mod complaint_form;
pub mod complaints_list;
pub mod dashboard;
pub mod tracking;
pub mod users;

pub use attachments::{attachments_page, AttachmentsVm};
pub use categories::{categories_page, CategoriesVm};
pub use comments::{comments_page, CommentsVm};
pub use complaint_form::{complaint_form_page, ComplaintFormVm};
pub use complaints_list::{complaints_list_page, ComplaintListVm};
pub use dashboard::{dashboard_page, DashboardVm};
pub use tracking::{tracking_page, TrackingVm};
pub use users::{users_page, UsersVm};
