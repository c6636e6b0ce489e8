//! CLI command handlers. Each command is in its own file.
//!
//! The core API is blocking; handlers that touch the store run it under
//! `spawn_blocking` so the SDK's runtime stays free to drive the requests.

mod backup;
mod cat;
mod etag;
mod info;
mod ls;
mod put;
mod stat;

pub use backup::run_backup;
pub use cat::run_cat;
pub use etag::run_etag;
pub use info::run_info;
pub use ls::run_ls;
pub use put::run_put;
pub use stat::run_stat;
