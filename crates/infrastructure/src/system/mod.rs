pub mod override_file;

pub use override_file::load_override_file;
