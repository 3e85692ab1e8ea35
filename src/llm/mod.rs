pub mod anthropic;
pub mod types;
