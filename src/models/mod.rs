pub mod alias;
pub mod course;
pub mod credential;

pub use alias::{Alias, AliasIndex, CourseAliasRecord};
pub use course::Course;
pub use credential::Credential;
