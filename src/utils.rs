pub mod date;
pub mod http;
pub mod logs;
pub mod wire;
