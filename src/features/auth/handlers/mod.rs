pub mod session_handler;

pub use session_handler::sign_out;
