//! `wlrelay identifier` – print the shared session identifier.

use wlrelay_core::config::WlrelayConfig;

pub fn run_identifier(cfg: &WlrelayConfig) {
    println!("{}", cfg.session_identifier());
}
