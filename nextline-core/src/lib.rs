pub mod config;
pub mod form;
pub mod mood;
pub mod screenshot;
pub mod text;
pub mod types;

pub use config::*;
pub use form::*;
pub use mood::*;
pub use screenshot::*;
pub use text::*;
pub use types::*;
