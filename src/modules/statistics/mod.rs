pub mod calculator;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::{init_student_statistics_router, init_teacher_statistics_router};
