//! `wlrelay canonicalize <uri>` – print the whitelist key.

use wlrelay_core::hostname::canonicalize;

pub fn run_canonicalize(uri: &str) {
    match canonicalize(uri) {
        Some(host) => println!("{host}"),
        None => println!("(none)"),
    }
}
