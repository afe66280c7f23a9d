use std::sync::Arc;
use strat_core::PlannerContent;

/// Content is read-only after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<PlannerContent>,
}

impl AppState {
    pub fn new(content: PlannerContent) -> Self {
        Self {
            content: Arc::new(content),
        }
    }
}
