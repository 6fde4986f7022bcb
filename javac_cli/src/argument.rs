use clap::Parser;
use clap::builder::Styles;
use anstyle::{AnsiColor, Style};
use std::ffi::OsString;
use std::path::PathBuf;

const CYAN: Style = AnsiColor::Cyan.on_default();
const GREEN: Style = AnsiColor::Green.on_default();
const GREEN_BOLD: Style = AnsiColor::Green.on_default().bold();
const RED_BOLD: Style = AnsiColor::Red.on_default().bold();
const YELLOW: Style = AnsiColor::Yellow.on_default();
const STYLES: Styles = Styles::styled()
    .header(GREEN_BOLD)
    .usage(GREEN_BOLD)
    .literal(CYAN)
    .placeholder(CYAN)
    .error(RED_BOLD)
    .valid(GREEN)
    .invalid(YELLOW);

/// `compile [-o DIR] [-v] [--no-rt] <file>…` from the driver surface: each input is a serialized
/// [`javac_ast::CompilationUnit`] rather than raw Java source, since the lexer/parser that would
/// turn source text into one is out of scope for this core (see `DESIGN.md`).
#[derive(Debug, Parser)]
#[command(
    name = "javac",
    version,
    about = "Compiles resolved compilation units into JVM class files"
)]
#[clap(styles = STYLES)]
pub struct Arguments {
    /// Directory to write compiled class files under, `/` translated to the platform separator.
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Increase diagnostic verbosity: `-v` raises the core to `debug`, `-vv` to `trace`.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Omit the runtime classpath; resolution falls back to in-process classes only.
    #[arg(long = "no-rt")]
    pub no_rt: bool,

    /// Runtime classpath: directories and zip/jar archives to resolve platform types against,
    /// separated the same way the host's `PATH` is.
    #[arg(short = 'c', long = "classpath", visible_alias = "cp")]
    pub classpath: Option<OsString>,

    /// Compilation units to compile.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl Arguments {
    #[must_use]
    pub fn parse() -> Self {
        <Arguments as Parser>::parse()
    }
}
