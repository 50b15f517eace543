pub mod ai;
pub mod room;
