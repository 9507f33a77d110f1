pub mod human_gate;
pub mod response;
pub mod session;

pub use human_gate::{human_gate, is_public_path};
pub use response::{ApiResponse, ApiResult};
pub use session::{require_admin, require_session, session_claims, SessionUser};
