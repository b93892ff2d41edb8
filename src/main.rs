/*!
 * Memory Hierarchy Simulator - Main Entry Point
 *
 * Interactive REPL over the allocator and cache simulation cores.
 */

use log::info;
use memsim::Driver;
use std::io;

fn main() -> io::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("memory simulator starting");

    let stdin = io::stdin();
    let mut driver = Driver::new();
    driver.run(stdin.lock(), io::stdout())
}
