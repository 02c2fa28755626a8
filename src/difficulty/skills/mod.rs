pub mod skillset;
pub mod stamina;
