pub mod account;
pub mod notice;
pub mod update_request;

pub use account::{admin_login, noticer_login, register};
pub use notice::{add_notice, delete_notice, get_notices};
pub use update_request::{list_update_requests, send_update_request, submit_update};
