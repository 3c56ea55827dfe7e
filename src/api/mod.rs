mod routes;
mod state;

pub mod planner;
pub mod quiz;
pub mod session;

pub use routes::create_router;
pub use state::AppState;
