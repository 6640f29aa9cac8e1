//! Grade-change hook.
//!
//! Every write to the grades table goes through [`grade_changed`] or
//! [`grades_cleared`] so that statistics consumers can follow changes from
//! the log stream and the `grades_changed_total` counter.

use gradebook_models::{CourseId, Grade, UserId};
use tracing::info;

use crate::metrics::{BusinessEvent, record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeAction {
    Created,
    Updated,
    Deleted,
}

impl GradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeAction::Created => "created",
            GradeAction::Updated => "updated",
            GradeAction::Deleted => "deleted",
        }
    }
}

pub fn grade_changed(action: GradeAction, grade: &Grade) {
    info!(
        action = action.as_str(),
        grade_id = %grade.id,
        student_id = %grade.student_id,
        course_id = %grade.course_id,
        value = grade.value,
        coefficient = grade.coefficient,
        grade_type = %grade.grade_type,
        "Grade changed"
    );
    record(BusinessEvent::GradesChanged {
        action: action.as_str(),
        count: 1,
    });
}

pub fn grades_cleared(student_id: UserId, course_id: CourseId, count: u64) {
    info!(
        action = GradeAction::Deleted.as_str(),
        student_id = %student_id,
        course_id = %course_id,
        count,
        "Grades cleared"
    );
    record(BusinessEvent::GradesChanged {
        action: GradeAction::Deleted.as_str(),
        count,
    });
}
