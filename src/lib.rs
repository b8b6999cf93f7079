//! Front-end for the Luka programming language.
//!
//! The pipeline is: [`lexer`] tokenizes source text, [`parser`] turns the
//! token stream into a tagged tree ([`ast`]), [`ast`]'s traversal helpers
//! resolve type aliases and fill in inferred types, and [`typechecker`]
//! validates the result before it is handed to an external code generator
//! (see [`codegen`] for the narrow contract that backend must satisfy).

pub mod ast;
pub mod codegen;
pub mod core;
pub mod error;
pub mod io;
pub mod lexer;
pub mod logger;
pub mod module;
pub mod parser;
pub mod typechecker;
pub mod types;

use std::path::Path;

use error::{CompileError, ExitCode};
use module::Module;

/// Runs the front-end pipeline (lex, parse, resolve, fill, check) over a
/// single file's already-read source text, without touching imports.
///
/// This is the primary entry point used by both the `lukac` binary and the
/// integration tests under `tests/`.
pub fn compile_source(source: &str, file_path: &str) -> Result<Module, CompileError> {
    let tokens = lexer::lex(source, file_path).map_err(CompileError::Lex)?;
    let mut parser = parser::Parser::new(tokens, file_path);
    let mut module = parser.parse_module().map_err(CompileError::Parse)?;

    ast::resolve_aliases(&mut module, parser.aliases()).map_err(CompileError::Resolve)?;
    ast::fill_types(&mut module);
    ast::rewrite_method_calls(&mut module);
    ast::promote_tail_expressions(&mut module);

    typechecker::check_module(&module).map_err(CompileError::TypeCheck)?;

    Ok(module)
}

/// Reads `path` from disk and runs [`compile_source`] over it.
pub fn compile_file(path: &Path) -> Result<Module, CompileError> {
    let source = io::read_source(path).map_err(CompileError::Io)?;
    let file_path = path.to_string_lossy().into_owned();
    compile_source(&source, &file_path)
}

impl CompileError {
    /// Maps an error occurring anywhere in the pipeline to the process exit
    /// code taxonomy from spec §6/§7.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CompileError::Io(_) => ExitCode::IoError,
            CompileError::Lex(_) => ExitCode::LexerFailed,
            CompileError::Parse(_) => ExitCode::ParserFailed,
            CompileError::Resolve(_) | CompileError::TypeCheck(_) => ExitCode::TypeCheckError,
        }
    }
}
