mod app;
mod config;
mod engine;
mod error;
mod library;
mod logging;
mod mpris;
mod player;
mod runtime;
mod session;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
