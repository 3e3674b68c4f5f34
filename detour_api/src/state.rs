use std::sync::Arc;

use detour_planner::{closure_store::ClosureStore, planner::RoutePlanner};

pub struct AppState<C, R> {
    pub planner: RoutePlanner<C, R>,
    pub store: Arc<ClosureStore>,
}

impl<C, R> AppState<C, R> {
    pub fn new(planner: RoutePlanner<C, R>) -> Self {
        Self {
            planner,
            store: Arc::new(ClosureStore::new()),
        }
    }
}
