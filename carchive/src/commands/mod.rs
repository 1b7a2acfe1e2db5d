pub mod dump;
pub mod write;
