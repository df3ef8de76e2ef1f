//! HTTP adapter for member-facing content: courses and events.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{CourseView, EventView};
pub use routes::{course_routes, event_routes};
