//! CLI module containing argument parsing and configuration loading

use clap::Parser;

pub mod args;
pub mod collector_args;
pub mod config;

pub use args::Args;
pub use collector_args::CollectorArgs;

/// Color setting from the raw command line, before clap has run
///
/// The last of `--color` / `-g` / `--no-color` wins; `None` means auto.
pub fn color_setting_from_argv(argv: &[String]) -> Option<bool> {
    argv.iter().skip(1).fold(None, |setting, arg| match arg.as_str() {
        "--color" | "-g" => Some(true),
        "--no-color" => Some(false),
        _ => setting,
    })
}

fn color_choice(color_setting: Option<bool>) -> clap::ColorChoice {
    match color_setting {
        Some(true) => clap::ColorChoice::Always,
        Some(false) => clap::ColorChoice::Never,
        None => clap::ColorChoice::Auto,
    }
}

/// Parse `argv` with help and error styling from the shared palette
///
/// Exits the process on `--help`, `--version` or a parse error, like
/// `Parser::parse`.
pub fn parse_styled<P: Parser>(argv: Vec<String>) -> P {
    let color_setting = color_setting_from_argv(&argv);
    let colors_enabled = color_setting
        .unwrap_or_else(|| std::io::IsTerminal::is_terminal(&std::io::stdout()));

    let matches = P::command()
        .styles(crate::core::styles::palette_to_clap(colors_enabled))
        .color(color_choice(color_setting))
        .get_matches_from(argv);
    P::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}
