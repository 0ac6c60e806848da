//! Driver: reads the entry file, runs lex/parse/codegen in sequence,
//! verifies the resulting module, and JIT-executes `main` unless asked
//! not to. One compiler instance per invocation; no persistent state
//! between runs.

mod config;
mod error;

pub use config::{Cli, Config};
pub use error::DriverError;

use std::time::Instant;

use inkwell::context::Context;
use inkwell::targets::{InitializationConfig, Target, TargetMachine};
use inkwell::OptimizationLevel;

use limec_gen::CodeGenerator;
use limec_lex::{Lexer, TokenKind};
use limec_par::Parser;
use limec_util::Handler;

/// Runs the full pipeline for `config`. The returned `i32` is the
/// process exit code for the success path (always `0`); failures come
/// back as `Err` and the caller decides how to report them.
pub fn run(config: &Config) -> Result<i32, DriverError> {
    let source = std::fs::read_to_string(&config.source).map_err(|e| DriverError::Io {
        path: config.source.display().to_string(),
        source: e,
    })?;

    if config.debug_lexer {
        debug_print_tokens(&source);
    }

    let mut handler = Handler::new();
    let mut parser = Parser::new(&source, &mut handler);
    let program = parser.parse_program();
    let parse_errors = parser.into_errors();

    if config.debug_parser {
        eprintln!("{program:#?}");
    }

    if !parse_errors.is_empty() {
        for message in &parse_errors {
            eprintln!("parse error: {message}");
        }
        return Err(DriverError::ParseFailed(parse_errors.len()));
    }

    let context = Context::create();
    let module_name = module_name(&config.source);
    let generator = CodeGenerator::new(&context, module_name);
    let (module, gen_errors) = generator.generate(&program);

    let triple = TargetMachine::get_default_triple();
    module.set_triple(&triple);

    if config.debug_compiler {
        eprintln!("{}", module.print_to_string());
    }

    if !gen_errors.is_empty() {
        for message in &gen_errors {
            eprintln!("compile error: {message}");
        }
        return Err(DriverError::CompileFailed(gen_errors.len()));
    }

    if let Err(message) = module.verify() {
        return Err(DriverError::VerificationFailed {
            message: message.to_string(),
        });
    }

    if config.no_run {
        return Ok(0);
    }

    Target::initialize_native(&InitializationConfig::default()).map_err(|message| DriverError::ExecutionFailed { message })?;

    let engine = module
        .create_jit_execution_engine(OptimizationLevel::None)
        .map_err(|e| DriverError::ExecutionFailed { message: e.to_string() })?;

    let main_fn = unsafe {
        engine
            .get_function::<unsafe extern "C" fn() -> i32>("main")
            .map_err(|e| DriverError::ExecutionFailed { message: e.to_string() })?
    };

    let start = Instant::now();
    let result = unsafe { main_fn.call() };
    let elapsed = start.elapsed();

    println!("{result}");
    eprintln!("executed in {elapsed:?}");

    Ok(0)
}

fn debug_print_tokens(source: &str) {
    let mut handler = Handler::new();
    let mut lexer = Lexer::new(source, &mut handler);
    loop {
        let token = lexer.next_token();
        eprintln!("{token}");
        if token.kind == TokenKind::Eof {
            break;
        }
    }
    for diagnostic in handler.diagnostics() {
        eprintln!("{diagnostic}");
    }
}

fn module_name(path: &std::path::Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("module")
}
