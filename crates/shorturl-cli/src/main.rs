#![forbid(unsafe_code)]

//! Binary entrypoint for `short-url-config`.

use std::process;

fn main() {
    let exit_code = shorturl_cli::run();
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
