//! File and format services kept apart from the pixel algorithms

pub mod format;
pub mod io;

pub use format::OutputFormatHandler;
pub use io::ImageIOService;
