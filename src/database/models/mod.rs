pub mod activity_log;
pub mod user;

pub use activity_log::{ActivityLog, ActivityType, AdminLogRow, Category, NewActivityLog};
pub use user::{Role, User};
