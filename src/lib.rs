pub mod config;
pub mod errors;
pub mod inspect;
pub mod normalize;
pub mod ruleset;
pub mod script;
pub mod wrap;

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use normalize::normalize;
pub use ruleset::Ruleset;
pub use wrap::{wrap, LineWrapper, WrapOutput, DEFAULT_LOOKAHEAD, FIXED_LINE_WIDTH};
