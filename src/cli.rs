//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use slackfetch_core::DEFAULT_CONCURRENCY;

/// Download file attachments referenced by a Slack export archive.
///
/// Slackfetch walks an unpacked export tree, decodes every channel's JSON
/// transcripts, and fetches each attachment into one flat destination
/// directory, renaming on collision.
#[derive(Parser, Debug)]
#[command(name = "slackfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Source directory containing the unpacked export
    #[arg(short, long, value_name = "DIR")]
    pub src: PathBuf,

    /// Destination directory for downloaded attachments
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dest: PathBuf,

    /// Maximum concurrent downloads per export file (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_src_is_required() {
        let result = Args::try_parse_from(["slackfetch"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_defaults_with_src_only() {
        let args = Args::try_parse_from(["slackfetch", "--src", "export"]).unwrap();
        assert_eq!(args.src, PathBuf::from("export"));
        assert_eq!(args.dest, PathBuf::from("."));
        assert_eq!(args.concurrency, 10); // DEFAULT_CONCURRENCY
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_src_short_flag() {
        let args = Args::try_parse_from(["slackfetch", "-s", "export"]).unwrap();
        assert_eq!(args.src, PathBuf::from("export"));
    }

    #[test]
    fn test_cli_dest_short_and_long_flag() {
        let args = Args::try_parse_from(["slackfetch", "-s", "export", "-d", "out"]).unwrap();
        assert_eq!(args.dest, PathBuf::from("out"));

        let args =
            Args::try_parse_from(["slackfetch", "--src", "export", "--dest", "out"]).unwrap();
        assert_eq!(args.dest, PathBuf::from("out"));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["slackfetch", "-s", "export", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["slackfetch", "-s", "export", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["slackfetch", "-s", "export", "-q"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_concurrency_bounds() {
        let args = Args::try_parse_from(["slackfetch", "-s", "export", "-c", "1"]).unwrap();
        assert_eq!(args.concurrency, 1);

        let args = Args::try_parse_from(["slackfetch", "-s", "export", "-c", "100"]).unwrap();
        assert_eq!(args.concurrency, 100);
    }

    #[test]
    fn test_cli_concurrency_zero_rejected() {
        let result = Args::try_parse_from(["slackfetch", "-s", "export", "-c", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_concurrency_over_max_rejected() {
        let result = Args::try_parse_from(["slackfetch", "-s", "export", "-c", "101"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = Args::try_parse_from(["slackfetch", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        // --version causes early exit, so we check it returns an error with Version kind
        let result = Args::try_parse_from(["slackfetch", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["slackfetch", "-s", "export", "--invalid-flag"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_combined_all_flags() {
        let args =
            Args::try_parse_from(["slackfetch", "-s", "export", "-d", "out", "-c", "20", "-v"])
                .unwrap();
        assert_eq!(args.src, PathBuf::from("export"));
        assert_eq!(args.dest, PathBuf::from("out"));
        assert_eq!(args.concurrency, 20);
        assert_eq!(args.verbose, 1);
    }
}
