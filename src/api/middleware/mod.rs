pub mod access_log;
pub mod timing;

pub use access_log::AccessLogMiddleware;
pub use timing::TimingMiddleware;
