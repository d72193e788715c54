//! Student progress.
//!
//! Joins a student's registered courses with the lessons they completed.

mod service;

pub use service::{
    COMPLETED_LESSONS_KEY, ProgressError, ProgressResult, ProgressService, REGISTERED_COURSES_KEY,
    StudentProgress, mark_completion,
};
