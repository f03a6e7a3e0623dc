//! fsroutes binary

use fsroutes::RoutesCli;
use std::process;

fn main() {
    let mut cli = RoutesCli::new();
    if let Err(e) = cli.run() {
        eprintln!("Fatal error! {}", e);
        if e.is_usage_error() {
            eprintln!();
            eprintln!("{}", cli.usage());
        }
        process::exit(1);
    }
}
