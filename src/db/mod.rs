pub mod attachments;
pub mod categories;
pub mod comments;
pub mod complaints;
pub mod connection;
pub mod transitions;
pub mod users;

pub use connection::{init_db, Database};
