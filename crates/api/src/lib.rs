pub mod db;
mod routes;
mod startup;
mod templates;
mod utils;

pub use db::*;
pub use routes::*;
pub use startup::{app, build_app_state, AppState};
pub use utils::*;
