pub mod error;
pub mod experiment;
pub mod frame;
pub mod log;
pub mod prelude;
pub mod util;

pub mod test;
