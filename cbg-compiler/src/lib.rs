#[macro_use]
mod util;
pub mod schema;
