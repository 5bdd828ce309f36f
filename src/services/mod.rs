pub mod synthesis;
