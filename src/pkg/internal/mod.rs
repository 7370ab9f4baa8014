pub mod adaptors;
pub mod alumni;
pub mod auth;
pub mod email;
pub mod votes;
