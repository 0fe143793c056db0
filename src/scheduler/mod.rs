mod scheduler;

pub use scheduler::{SchedulerCommand, scheduler};
