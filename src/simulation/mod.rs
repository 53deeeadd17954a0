pub mod schedule;
pub mod session;
pub mod solver;
