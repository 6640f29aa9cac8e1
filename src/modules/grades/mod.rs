pub mod controller;
pub mod events;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_grade_view_router, init_teacher_grades_router};
