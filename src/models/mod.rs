mod client;
mod enrollment;
mod program;

pub use client::{Client, ClientWithPrograms, NewClient};
pub use enrollment::{
    EnrolledProgram, Enrollment, EnrollmentRequest, ProgramEnrollmentRequest, ProgramSummary,
};
pub use program::{HealthProgram, NewProgram};
