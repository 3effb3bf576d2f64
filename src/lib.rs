/*!
# Diary

Diary keeps a whole journal in a single markdown file, newest entry first. It can
prepend a dated entry rendered from a template, or open the file in an external
editor. When encryption is enabled the file is stored as an age passphrase
envelope and only a transient plaintext copy exists while you work on it.

## Core Features

- `add`: prepend today's entry, skipping days that already have one
- `edit`: open the whole diary in the configured editor
- `init`: write a starter `settings.yml`, `template.md` and an empty `diary.md`
- Optional passphrase encryption at rest, with atomic replacement on save

## Architecture

- `cli`: Command-line interface handling using clap
- `config`: Settings loading and validation, derived file locations
- `crypto`: age passphrase encryption, passphrase prompting and private temp files
- `staging`: Decrypt-to-working-copy and write-back sessions
- `journal_core`: Pure entry composition
- `template`: The `{{ .Name }}` placeholder renderer
- `editor`: External editor invocation
- `ops`: The `add`, `edit` and `init` operations
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use chrono::Local;
use diary::config::DiaryPaths;
use diary::crypto::TerminalPrompt;
use diary::ops::{add_entry, DiaryContext};
use diary::Settings;

fn main() -> diary::AppResult<()> {
    let paths = DiaryPaths::from_settings_file("~/.config/diary/settings.yml")?;
    let settings = Settings::load(&paths.settings_file)?;
    settings.validate()?;

    let ctx = DiaryContext::new(&settings, &paths, &TerminalPrompt);
    add_entry(&ctx, &Local::now())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Settings loading and management
pub mod config;
/// Application constants
pub mod constants;
/// Encryption, passphrase prompting and private temporary files
pub mod crypto;
/// External editor invocation
pub mod editor;
/// Error types and utilities for error handling
pub mod errors;
/// Pure entry composition logic
pub mod journal_core;
/// Diary operations
pub mod ops;
/// Working copy sessions over the durable diary
pub mod staging;
/// Placeholder rendering for templates and editor commands
pub mod template;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::{DiaryPaths, Settings};
pub use errors::{AppError, AppResult};
pub use staging::StagingSession;
