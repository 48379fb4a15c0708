pub mod error;
pub mod fetch;
pub mod plan;
pub mod planner;
pub mod templates;
