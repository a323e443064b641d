use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// WIT source, compiled with wasm-tools
    Wit,
    /// Output of `wasm-tools component wit -j`
    Json,
}

impl Format {
    /// `.json` files are read directly, everything else is treated as WIT.
    pub fn detect(input: &Path) -> Self {
        match input.extension() {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Wit,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Outline,
    Summary,
}

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(value_parser, help = "WIT file, WIT directory or JSON document; `-` reads stdin")]
    pub input: PathBuf,

    #[clap(long, value_enum, help = "Input format [default: by file extension, else wit]")]
    pub format: Option<Format>,

    #[clap(
        long,
        value_parser,
        env = "WIT_RESOLVE_WASM_TOOLS",
        help = "The wasm-tools executable"
    )]
    pub wasm_tools: Option<PathBuf>,

    #[clap(long, help = "Do not include items gated behind feature flags")]
    pub no_all_features: bool,

    #[clap(long, value_parser, value_name = "SECONDS", help = "Abort wasm-tools after this long")]
    pub timeout: Option<u64>,

    #[clap(long, value_enum, default_value = "outline")]
    pub output: Output,

    #[clap(short, long, action = clap::ArgAction::Count, help = "Log more (-v: debug, -vv: trace)")]
    pub verbose: u8,
}

impl Cli {
    pub fn reads_stdin(&self) -> bool {
        self.input == Path::new("-")
    }

    pub fn format(&self) -> Format {
        self.format.unwrap_or_else(|| Format::detect(&self.input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_the_extension_unless_given() {
        let cli = Cli::parse_from(["wit-resolve", "deps/wasi.JSON"]);
        assert_eq!(cli.format(), Format::Json);

        let cli = Cli::parse_from(["wit-resolve", "wit/"]);
        assert_eq!(cli.format(), Format::Wit);

        let cli = Cli::parse_from(["wit-resolve", "--format", "json", "-"]);
        assert!(cli.reads_stdin());
        assert_eq!(cli.format(), Format::Json);
    }

    #[test]
    fn options_are_parsed() {
        let cli = Cli::parse_from([
            "wit-resolve",
            "--wasm-tools",
            "/opt/wasm-tools",
            "--no-all-features",
            "--timeout",
            "30",
            "--output",
            "summary",
            "-vv",
            "world.wit",
        ]);
        assert_eq!(cli.wasm_tools.as_deref(), Some(Path::new("/opt/wasm-tools")));
        assert!(cli.no_all_features);
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.output, Output::Summary);
        assert_eq!(cli.verbose, 2);
    }
}
