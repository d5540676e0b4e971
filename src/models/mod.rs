pub mod course;
pub mod outcome;
pub mod progress;
pub mod subject;

pub use course::Course;
pub use outcome::LearnOutcome;
pub use progress::{HoursValue, StudyProgress};
pub use subject::Subject;
