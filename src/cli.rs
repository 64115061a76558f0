use clap::Parser;
use clap_verbosity_flag::InfoLevel;

/// Strip `//` and `/* */` comments from C-family sources, in place.
///
/// String and character literals are left untouched, so `"http://x"` and
/// `'/'` survive. Line comments keep their newline; block comments vanish
/// completely.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Verbosity:
    /// -v -> Debug
    /// -vv -> Trace
    /// -q -> Warn
    /// -qq -> Error
    /// -qqq -> Off.
    /// Default (/ no argument given): 'info'
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<InfoLevel>,

    /// Files or directories to strip. Directories are walked recursively.
    /// Defaults to `src`.
    pub paths: Vec<String>,

    /// Only report files that contain comments, don't rewrite them.
    /// Exits with a non-zero status if there are any.
    #[arg(short, long, default_value_t = false)]
    pub check: bool,

    /// Read source from stdin and write the stripped text to stdout.
    #[arg(long, default_value_t = false, conflicts_with_all = ["paths", "check"])]
    pub stdin: bool,

    /// File extension to strip (repeatable). Defaults to `c` and `h`.
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Only strip files whose name matches this regex.
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Path to a config file. Defaults to `strip-comments.json` in the
    /// current directory, if present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Disable timing in the summary line.
    #[arg(short, long, default_value_t = false)]
    pub no_timing: bool,
}
