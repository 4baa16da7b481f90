//! Handlers behind the `scs-key` command line tool.

mod options;
mod request;
mod resolve;

pub use options::ClientOptions;
pub use request::request;
pub use resolve::resolve;
