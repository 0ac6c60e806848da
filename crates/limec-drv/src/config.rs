//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

/// Ahead-of-time compiler and JIT runner for the lime language.
#[derive(Debug, Parser)]
#[command(name = "limec", version, about)]
pub struct Cli {
    /// Path to the entry source file
    pub source: PathBuf,

    /// Print every token emitted by the lexer to stderr before parsing
    #[arg(long)]
    pub debug_lexer: bool,

    /// Pretty-print the parsed AST to stderr
    #[arg(long)]
    pub debug_parser: bool,

    /// Print the generated LLVM IR to stderr
    #[arg(long)]
    pub debug_compiler: bool,

    /// Compile and verify but do not JIT-execute `main`
    #[arg(long)]
    pub no_run: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: PathBuf,
    pub debug_lexer: bool,
    pub debug_parser: bool,
    pub debug_compiler: bool,
    pub no_run: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            source: cli.source,
            debug_lexer: cli.debug_lexer,
            debug_parser: cli.debug_parser,
            debug_compiler: cli.debug_compiler,
            no_run: cli.no_run,
        }
    }
}
