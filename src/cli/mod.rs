pub mod interactive;
pub mod output;
