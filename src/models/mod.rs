pub mod activity;
pub mod announcement;
pub mod session;
pub mod user;

pub use activity::ActivityLogEntry;
pub use announcement::Announcement;
pub use session::Session;
pub use user::{Credential, Role, UserRecord};
