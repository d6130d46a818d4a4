pub mod eligibility;
pub mod format;
pub mod mentors;
pub mod permissions;
pub mod phase;
pub mod recurrence;
pub mod session;
pub mod task;
pub mod validation;
