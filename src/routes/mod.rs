// Route exports
pub mod stores;

use actix_web::web;

pub use stores::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(stores::configure);
}
