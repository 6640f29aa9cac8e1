pub mod controller;
pub mod pdf;
pub mod router;
pub mod service;

pub use router::{init_student_reports_router, init_teacher_reports_router};
