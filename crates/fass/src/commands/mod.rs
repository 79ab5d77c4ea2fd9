//! Command dispatch: bridges CLI args -> core session -> output formatting.

pub mod config_cmd;
pub mod entities;

use fass_config::ConnectionConfigStore;
use fass_core::{CoreError, Notice, NoticeReceiver, Session, notice_channel};
use owo_colors::OwoColorize;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// The settings store selected by `--data-dir`, or the platform default.
pub fn open_store(global: &GlobalOpts) -> ConnectionConfigStore {
    global
        .data_dir
        .as_ref()
        .map_or_else(ConnectionConfigStore::open_default, ConnectionConfigStore::new)
}

/// Resolve settings, connect, and fail if the startup probe or the
/// initial load failed. Warnings are printed and do not fail.
///
/// The receiver is returned so later notices still have somewhere to go.
pub async fn connect(global: &GlobalOpts) -> Result<(Session, NoticeReceiver), CliError> {
    let (session, rx, load_error) = probe(global).await?;
    match load_error {
        Some(e) => Err(e.into()),
        None => Ok((session, rx)),
    }
}

/// Like [`connect`], but only a failed probe is fatal. A load failure on a
/// reachable hub is handed back to the caller.
pub async fn probe(
    global: &GlobalOpts,
) -> Result<(Session, NoticeReceiver, Option<CoreError>), CliError> {
    let config = open_store(global).resolve_connection_config()?;
    let (tx, mut rx) = notice_channel();
    let session = Session::connect(&config, tx).await?;

    let mut first_error = None;
    while let Ok(notice) = rx.try_recv() {
        match notice {
            Notice::Warning(msg) => print_warning(&msg, global),
            Notice::Error(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) if !session.is_connected() => Err(e.into()),
        load_error => Ok((session, rx, load_error)),
    }
}

pub(crate) fn print_warning(message: &str, global: &GlobalOpts) {
    if output::should_color(global.color) {
        eprintln!("{} {message}", "warning:".yellow().bold());
    } else {
        eprintln!("warning: {message}");
    }
}

/// Dispatch a hub-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    if matches!(cmd, Command::Check) {
        return entities::check(global).await;
    }

    let (session, _notices) = connect(global).await?;

    match cmd {
        Command::List(args) => entities::list(&session, &args, global),
        Command::On(args) => entities::set_state(&session, &args, true, global).await,
        Command::Off(args) => entities::set_state(&session, &args, false, global).await,
        Command::Toggle(args) => entities::toggle(&session, &args, global).await,
        // Check is handled above, Config before a session is opened
        Command::Check | Command::Config(_) => Ok(()),
    }
}
