pub mod prompts;
pub mod test_mode;
pub mod views;
