/*!
# Diary - A Single-File Journal

Command-line entry point. Parses arguments, sets up structured logging, loads
the settings and dispatches to the `add`, `edit` or `init` operation.

## Usage

```text
diary [OPTIONS] <COMMAND>

Commands:
  add   Creates a new daily entry in the diary
  edit  Opens the editor with the diary file
  init  Copies settings.yml and template.md examples into the settings directory

Options:
      --settings <SETTINGS>      Where to find the settings [default: ~/.config/diary/settings.yml]
  -v, --verbose                  Print verbose output
      --log-format <LOG_FORMAT>  Log output format [default: text] [possible values: text, json]
```

Logging goes to stderr and honours `RUST_LOG`.
*/

use chrono::Local;
use diary::cli::{CliArgs, Commands};
use diary::config::{DiaryPaths, Settings};
use diary::constants::{APP_NAME, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON};
use diary::crypto::TerminalPrompt;
use diary::editor::SystemEditor;
use diary::errors::AppResult;
use diary::ops::{add_entry, edit_diary, init_diary, DiaryContext};
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn main() {
    let args = CliArgs::parse();
    init_logging(&args);

    let correlation_id = Uuid::new_v4();
    let span = info_span!(
        "app_invocation",
        correlation_id = %correlation_id,
        command = args.command.name()
    );
    let _guard = span.enter();

    debug!("CLI arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &CliArgs) {
    let default_level = if args.verbose {
        "debug"
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", APP_NAME, default_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if args.log_format == LOG_FORMAT_JSON {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: &CliArgs) -> AppResult<()> {
    let paths = DiaryPaths::from_settings_file(&args.settings)?;

    if args.command == Commands::Init {
        let report = init_diary(&paths)?;
        if report.already_initialized() {
            println!(
                "Settings file {} already exists, will not overwrite",
                paths.settings_file.display()
            );
        } else {
            println!(
                "Settings file and template copied to {}",
                paths.base_dir.display()
            );
        }
        return Ok(());
    }

    info!("Loading settings from {}", paths.settings_file.display());
    let settings = Settings::load(&paths.settings_file)?;
    debug!("Settings: {:?}", settings);

    let prompt = TerminalPrompt;
    let ctx = DiaryContext::new(&settings, &paths, &prompt);

    match args.command {
        Commands::Add => add_entry(&ctx, &Local::now()),
        Commands::Edit => {
            let editor = SystemEditor::new(settings.editor_cmd.clone());
            edit_diary(&ctx, &editor)
        }
        Commands::Init => Ok(()),
    }
}
