pub mod group;
pub mod parse;
