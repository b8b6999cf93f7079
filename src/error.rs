//! Process-wide error taxonomy (spec §7) and the exit code mapping the
//! `lukac` driver uses (spec §6). Grounded on `original_source/include/defs.h`'s
//! `t_return_code` enum: each variant below corresponds 1:1 to one of its
//! members, including the unused `LUKA_UNINITIALIZED = -1` slot, which this
//! crate simply never constructs (there is no analogous "not yet run" state
//! in a `Result`-based pipeline).

use std::fmt::{self, Display};

use crate::ast::AliasError;
use crate::io::IoError;
use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::typechecker::TypeCheckError;

/// Process exit codes, fixed and distinct per spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    WrongParameters = 2,
    CantOpenFile = 3,
    CantAllocMemory = 4,
    LexerFailed = 5,
    ParserFailed = 6,
    CodegenError = 7,
    TypeCheckError = 8,
    VectorFailure = 9,
    IoError = 10,
    LlvmError = 11,
}

/// The union of everything that can abort a compilation run.
#[derive(Debug)]
pub enum CompileError {
    Io(IoError),
    Lex(LexError),
    Parse(ParseError),
    Resolve(AliasError),
    TypeCheck(TypeCheckError),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Io(e) => write!(f, "{e}"),
            CompileError::Lex(e) => write!(f, "{e}"),
            CompileError::Parse(e) => write!(f, "{e}"),
            CompileError::Resolve(e) => write!(f, "{e}"),
            CompileError::TypeCheck(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CompileError {}
