pub mod request;
pub mod runtime;
pub mod sse;
pub mod vision;
