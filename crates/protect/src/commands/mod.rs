//! Command handlers, one module per subcommand.

pub mod check;
pub mod history;
pub mod password;
pub mod run;
pub mod set;
pub mod sites;
pub mod status;
pub mod util;

use clap::CommandFactory;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

/// Route a command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(&args, global).await,
        Command::Status => status::handle(global).await,
        Command::Set(args) => set::handle(&args, global).await,
        Command::Sites => sites::handle(global).await,
        Command::History(args) => history::handle(&args, global).await,
        Command::Check => check::handle(global).await,
        Command::SetPassword(args) => password::handle(&args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "protect", &mut std::io::stdout());
            Ok(())
        }
    }
}
