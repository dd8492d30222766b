pub mod session_summary;
