pub mod logging;
pub mod url;
