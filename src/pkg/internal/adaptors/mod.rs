pub mod alumni;
pub mod jobs;
pub mod saved;
pub mod users;
