mod command;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    // The terminal UI owns the screen, so logging stays off unless RUST_LOG asks for it.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    command::run()
}
