pub mod http;
pub mod scrub;
pub mod text;
