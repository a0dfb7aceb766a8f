use std::path::Path;
use std::process::ExitCode;

use termenu::kernel::{ActionOutcome, ActionRegistry};
use termenu::models::{Entry, Menu, Page};
use termenu::services::{load_menu, MenuSettings};
use termenu::{MenuError, MenuSession};

mod logging;

fn main() -> ExitCode {
    let _logging = logging::init();

    let session = match std::env::args_os().nth(1) {
        Some(path) => load_menu(Path::new(&path))
            .map_err(MenuError::from)
            .and_then(|config| MenuSession::from_config(config, actions())),
        None => demo_menu()
            .map_err(MenuError::from)
            .and_then(|menu| MenuSession::new(menu, actions(), MenuSettings::default())),
    };

    let result = session.and_then(MenuSession::run);
    match result {
        Ok(report) => {
            if report.dropped_keys > 0 {
                tracing::info!(dropped_keys = report.dropped_keys, "keys dropped during session");
            }
            exit_code(report.exit_code())
        }
        Err(err) => {
            tracing::error!(error = %err, "termenu failed");
            eprintln!("termenu: {err}");
            ExitCode::FAILURE
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn actions() -> ActionRegistry {
    let mut actions = ActionRegistry::with_builtins();
    actions
        .register("greet", || Ok(ActionOutcome::Message("Hello World!".into())))
        .register("info", || {
            Ok(ActionOutcome::Message(format!(
                "termenu v{}: a terminal menu engine",
                env!("CARGO_PKG_VERSION")
            )))
        })
        .register("option1", || Ok(ActionOutcome::Message("Option 1 selected".into())))
        .register("option2", || Ok(ActionOutcome::Message("Option 2 selected".into())));
    actions
}

fn demo_menu() -> Result<Menu, termenu::core::ConfigError> {
    let mut menu = Menu::new()
        .with_page(
            Page::new("home", "Main Menu")
                .with_entry(Entry::new("Say Hello").action("greet").accelerator('h'))
                .with_entry(Entry::new("Show Info").action("info").accelerator('i'))
                .with_entry(Entry::new("Go to Settings").next_page("settings").accelerator('s'))
                .with_entry(Entry::new("Exit").action("exit").accelerator('q')),
        )?
        .with_page(
            Page::new("settings", "Settings")
                .with_entry(Entry::new("Option 1").action("option1"))
                .with_entry(Entry::new("Option 2").action("option2"))
                .with_entry(Entry::new("Back to Home").next_page("home")),
        )?;
    menu.set_start_page("home")?;
    Ok(menu)
}
