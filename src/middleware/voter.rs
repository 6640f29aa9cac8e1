//! Resource-level authorization.
//!
//! A voter answers whether an actor may perform an [`Attribute`] on one
//! subject. Route guards in [`crate::middleware::role`] decide who may enter
//! an area; voters decide what they may touch once inside.

use gradebook_core::AppError;
use gradebook_models::{Course, Grade, UserId, UserRole};

use crate::metrics::{BusinessEvent, record};
use crate::middleware::auth::AuthUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    View,
    Edit,
    Delete,
}

/// The authenticated user as seen by voters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: UserRole,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl TryFrom<&AuthUser> for Actor {
    type Error = AppError;

    fn try_from(auth_user: &AuthUser) -> Result<Self, Self::Error> {
        Ok(Actor {
            id: auth_user.user_id()?,
            role: auth_user.role()?,
        })
    }
}

pub trait Voter {
    type Subject;

    fn vote(actor: &Actor, attribute: Attribute, subject: &Self::Subject) -> bool;
}

/// Admins may do anything; teachers only touch the courses they own.
pub struct CourseVoter;

impl Voter for CourseVoter {
    type Subject = Course;

    fn vote(actor: &Actor, _attribute: Attribute, course: &Course) -> bool {
        actor.is_admin() || (actor.role == UserRole::Teacher && course.teacher_id == actor.id)
    }
}

/// A grade together with the teacher owning its course.
#[derive(Debug, Clone)]
pub struct GradeSubject {
    pub grade: Grade,
    pub course_teacher_id: UserId,
}

/// Admins may do anything. The course teacher may view, edit and delete a
/// grade; the graded student may only view it.
pub struct GradeVoter;

impl Voter for GradeVoter {
    type Subject = GradeSubject;

    fn vote(actor: &Actor, attribute: Attribute, subject: &GradeSubject) -> bool {
        if actor.is_admin() {
            return true;
        }

        let is_course_teacher =
            actor.role == UserRole::Teacher && subject.course_teacher_id == actor.id;

        match attribute {
            Attribute::View => is_course_teacher || subject.grade.student_id == actor.id,
            Attribute::Edit | Attribute::Delete => is_course_teacher,
        }
    }
}

/// Fails with 403 unless `V` grants `attribute` on `subject`.
pub fn deny_access_unless_granted<V: Voter>(
    auth_user: &AuthUser,
    attribute: Attribute,
    subject: &V::Subject,
) -> Result<(), AppError> {
    let actor = Actor::try_from(auth_user)?;

    if V::vote(&actor, attribute, subject) {
        Ok(())
    } else {
        record(BusinessEvent::AccessDenied {
            role: actor.role.as_str(),
        });
        Err(AppError::forbidden("Access denied"))
    }
}
