mod list;
mod send;
mod submit;

pub use list::list_update_requests;
pub use send::send_update_request;
pub use submit::submit_update;
