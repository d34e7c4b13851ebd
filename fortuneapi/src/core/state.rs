use crate::generator::FortuneGenerator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// The fortune generator shared by every request and websocket session.
    /// It holds no mutable state, so concurrent callers never interfere.
    pub generator: Arc<FortuneGenerator>,
}

impl AppState {
    pub fn new(generator: FortuneGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}
