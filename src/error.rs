use serde::Serialize;
use thiserror::Error;

/// Broad category of a [`LangError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The program text is malformed.
    Syntax,
    /// The program is well formed but cannot run as written.
    Runtime,
    /// The interpreter itself ran out of room or lost track of its robot.
    Internal,
}

/// Every way a robot program can fail.
///
/// Errors are not unwound through the game: the stepper records the first one
/// on the execution context and stops advancing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum LangError {
    #[error("no such operation `{0}`")]
    InvalidOperation(String),
    #[error("wrong number of arguments, usage: {0}")]
    Usage(&'static str),
    #[error("register argument must start with a dollar sign (`$`), got `{0}`")]
    MissingRegisterPrefix(String),
    #[error("invalid register: `{0}`")]
    InvalidRegister(String),
    #[error("register out of bounds: `{0}` (there are {1} registers)")]
    RegisterOutOfBounds(String, usize),
    #[error("unknown constant: `{0}`")]
    UnknownConstant(String),
    #[error("invalid value: `{0}`")]
    InvalidValue(String),
    #[error("invalid operation: `{0}`")]
    InvalidComparison(String),
    #[error("end is only allowed in functions")]
    EndOutsideFunction,
    #[error("cannot create function inside function")]
    NestedFunction,
    #[error("function `{0}` is missing `end`")]
    UnterminatedFunction(String),

    #[error("no such function: `{0}`")]
    NoSuchFunction(String),
    #[error("function already exists: `{0}`")]
    FunctionExists(String),
    #[error("turn expects argument to be either `cw` or `ccw`, got {0}")]
    InvalidTurn(i32),
    #[error("division by zero")]
    DivisionByZero,
    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),

    #[error("function table is full ({0} functions)")]
    TooManyFunctions(usize),
    #[error("no robot with id {0}")]
    NoSuchRobot(usize),
}

impl LangError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LangError::InvalidOperation(_)
            | LangError::Usage(_)
            | LangError::MissingRegisterPrefix(_)
            | LangError::InvalidRegister(_)
            | LangError::RegisterOutOfBounds(_, _)
            | LangError::UnknownConstant(_)
            | LangError::InvalidValue(_)
            | LangError::InvalidComparison(_)
            | LangError::EndOutsideFunction
            | LangError::NestedFunction
            | LangError::UnterminatedFunction(_) => ErrorKind::Syntax,
            LangError::NoSuchFunction(_)
            | LangError::FunctionExists(_)
            | LangError::InvalidTurn(_)
            | LangError::DivisionByZero
            | LangError::CallDepthExceeded(_) => ErrorKind::Runtime,
            LangError::TooManyFunctions(_) | LangError::NoSuchRobot(_) => ErrorKind::Internal,
        }
    }
}
