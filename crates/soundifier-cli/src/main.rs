//! Soundifier CLI - voice blip tracks for typing text-box animations
//!
//! This binary renders blip tracks, inspects blip timings, and lists the
//! characters of a voice library.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use soundifier_cli::commands;
use soundifier_cli::commands::characters::CharactersArgs;
use soundifier_cli::commands::generate::GenerateArgs;
use soundifier_cli::commands::timings::TimingsArgs;

/// Soundifier - voice blips for typing text-box GIFs
#[derive(Parser)]
#[command(name = "soundifier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the blip track for an animation
    Generate(Box<GenerateArgs>),

    /// Print the blip instants of an animation without rendering audio
    Timings(TimingsArgs),

    /// List the characters in a voice library
    Characters(CharactersArgs),
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(&args),
        Commands::Timings(args) => commands::timings::run(&args),
        Commands::Characters(args) => commands::characters::run(&args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "soundifier",
            "generate",
            "--gif",
            "talk.gif",
            "-v",
            "voices/sans#.wav",
            "--speed",
            "1.5",
            "--mettatonize",
            "--interval",
            "2",
            "--seed",
            "42",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.gif, PathBuf::from("talk.gif"));
                assert_eq!(args.voices, vec![PathBuf::from("voices/sans#.wav")]);
                assert_eq!(args.settings.speed, Some(1.5));
                assert_eq!(args.settings.interval, Some(2));
                assert!(args.settings.mettatonize);
                assert_eq!(args.seed, Some(42));
                assert_eq!(
                    args.voices_dir,
                    PathBuf::from(commands::DEFAULT_VOICES_DIR)
                );
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_character_with_variant() {
        let cli = Cli::try_parse_from([
            "soundifier",
            "generate",
            "-g",
            "talk.gif",
            "--character",
            "sans",
            "--variant",
            "--olp-leniency",
            "-5",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.character.as_deref(), Some("sans"));
                assert!(args.variant);
                assert_eq!(args.voice.olp_leniency, Some(-5));
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_rejects_voices_with_character() {
        let result = Cli::try_parse_from([
            "soundifier",
            "generate",
            "--gif",
            "talk.gif",
            "--voice",
            "a.wav",
            "--character",
            "sans",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_variant_requires_character() {
        let result = Cli::try_parse_from(["soundifier", "generate", "--gif", "t.gif", "--variant"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_timings_json() {
        let cli = Cli::try_parse_from([
            "soundifier",
            "timings",
            "--gif",
            "talk.gif",
            "--json",
            "--no-easy-align",
        ])
        .unwrap();
        match cli.command {
            Commands::Timings(args) => {
                assert!(args.json);
                assert!(args.settings.no_easy_align);
            }
            _ => panic!("expected timings command"),
        }
    }

    #[test]
    fn test_cli_parses_characters() {
        let cli =
            Cli::try_parse_from(["soundifier", "characters", "--voices-dir", "my_voices"]).unwrap();
        match cli.command {
            Commands::Characters(args) => {
                assert_eq!(args.voices_dir, PathBuf::from("my_voices"));
                assert!(!args.json);
            }
            _ => panic!("expected characters command"),
        }
    }
}
