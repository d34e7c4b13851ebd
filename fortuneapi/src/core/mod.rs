pub mod config;
pub mod error;
pub mod state;

pub mod prelude {
    pub use super::{
        config::Config,
        error::{ApiError, BackendError, ConfigError, GenerationError},
        state::AppState,
    };
}
