use crate::{command::SessionArg, tui};

use self::app::PlayApp;

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(crate) session: SessionArg,
    /// Start on the title popup instead of dropping pieces right away
    #[arg(long)]
    wait_for_start: bool,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        session,
        wait_for_start,
    } = arg;

    let session = session.build_session()?;
    let mut app = PlayApp::new(session, !wait_for_start);
    tui::run(&mut app)?;

    let stats = app.final_stats();
    println!("{stats}");
    Ok(())
}
