pub mod chart;
pub mod note;
pub mod rate;
