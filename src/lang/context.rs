use std::collections::HashMap;

use serde::Serialize;

use crate::config::InterpreterConfig;
use crate::error::LangError;
use crate::lang::{Instruction, REGISTER_COUNT};
use crate::log_message::LogMessage;
use crate::logger::get_logger;

/// Initial room reserved for a function body.
const FUNCTION_BODY_CAPACITY: usize = 32;

/// A user-defined function: the statements recorded between `fn` and `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    pub body: Vec<Instruction>,
}

impl Function {
    pub fn new(name: String) -> Self {
        Function {
            name,
            body: Vec::with_capacity(FUNCTION_BODY_CAPACITY),
        }
    }
}

/// State of one running program, tied to the robot it drives.
///
/// Child steppers evaluating an `if` body borrow the same context, so
/// registers and functions are shared across nesting levels.
#[derive(Debug, Clone)]
pub struct LangContext {
    robot: usize,
    registers: [i32; REGISTER_COUNT],
    functions: HashMap<String, Function>,
    defining: Option<Function>,
    error: Option<LangError>,
    depth: usize,
    rules: InterpreterConfig,
}

impl LangContext {
    pub fn new(robot: usize) -> Self {
        Self::with_rules(robot, InterpreterConfig::default())
    }

    pub fn with_rules(robot: usize, rules: InterpreterConfig) -> Self {
        LangContext {
            robot,
            registers: [0; REGISTER_COUNT],
            functions: HashMap::new(),
            defining: None,
            error: None,
            depth: 0,
            rules,
        }
    }

    pub fn robot(&self) -> usize {
        self.robot
    }

    pub fn rules(&self) -> &InterpreterConfig {
        &self.rules
    }

    pub fn registers(&self) -> &[i32; REGISTER_COUNT] {
        &self.registers
    }

    pub fn register(&self, index: usize) -> Result<i32, LangError> {
        self.registers
            .get(index)
            .copied()
            .ok_or_else(|| LangError::RegisterOutOfBounds(format!("${}", index), REGISTER_COUNT))
    }

    pub fn set_register(&mut self, index: usize, value: i32) -> Result<(), LangError> {
        match self.registers.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(LangError::RegisterOutOfBounds(
                format!("${}", index),
                REGISTER_COUNT,
            )),
        }
    }

    // Functions

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_defining(&self) -> bool {
        self.defining.is_some()
    }

    /// Name of the function currently being recorded, if any.
    pub fn defining(&self) -> Option<&str> {
        self.defining.as_ref().map(|f| f.name.as_str())
    }

    pub fn open_function(&mut self, name: &str) -> Result<(), LangError> {
        if self.defining.is_some() {
            return Err(LangError::NestedFunction);
        }
        if self.functions.contains_key(name) {
            return Err(LangError::FunctionExists(name.to_string()));
        }
        if self.functions.len() >= self.rules.max_functions {
            return Err(LangError::TooManyFunctions(self.rules.max_functions));
        }
        self.defining = Some(Function::new(name.to_string()));
        Ok(())
    }

    /// Appends a statement to the function being recorded.
    pub fn record(&mut self, instruction: Instruction) {
        if let Some(function) = self.defining.as_mut() {
            function.body.push(instruction);
        }
    }

    /// Finishes the current definition and makes it callable.
    pub fn close_function(&mut self) -> Result<String, LangError> {
        let function = self.defining.take().ok_or(LangError::EndOutsideFunction)?;
        let name = function.name.clone();
        self.functions.insert(name.clone(), function);
        Ok(name)
    }

    // Call depth

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter(&mut self) -> Result<(), LangError> {
        if self.depth >= self.rules.max_call_depth {
            return Err(LangError::CallDepthExceeded(self.rules.max_call_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // Errors

    /// Records an error. Only the first one is kept; later ones are ignored.
    pub fn raise(&mut self, error: LangError) {
        if self.error.is_some() {
            return;
        }
        get_logger().log(LogMessage::error(error.to_string()).for_robot(self.robot));
        self.error = Some(error);
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&LangError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Op;

    #[test]
    fn test_registers_start_zeroed() {
        let ctx = LangContext::new(0);
        assert!(ctx.registers().iter().all(|r| *r == 0));
        assert!(ctx.register(REGISTER_COUNT).is_err());
    }

    #[test]
    fn test_function_lifecycle() {
        let mut ctx = LangContext::new(0);
        ctx.open_function("walk").unwrap();
        assert_eq!(ctx.defining(), Some("walk"));
        assert_eq!(ctx.open_function("other"), Err(LangError::NestedFunction));
        ctx.record(Instruction::new(Op::Forward, vec![]));
        assert_eq!(ctx.close_function(), Ok("walk".to_string()));
        assert_eq!(ctx.function("walk").map(|f| f.body.len()), Some(1));
        assert_eq!(
            ctx.open_function("walk"),
            Err(LangError::FunctionExists("walk".to_string()))
        );
        assert_eq!(ctx.close_function(), Err(LangError::EndOutsideFunction));
    }

    #[test]
    fn test_function_table_limit() {
        let rules = InterpreterConfig {
            max_functions: 1,
            ..InterpreterConfig::default()
        };
        let mut ctx = LangContext::with_rules(0, rules);
        ctx.open_function("a").unwrap();
        ctx.close_function().unwrap();
        assert_eq!(ctx.open_function("b"), Err(LangError::TooManyFunctions(1)));
    }

    #[test]
    fn test_first_error_wins() {
        let mut ctx = LangContext::new(0);
        ctx.raise(LangError::DivisionByZero);
        ctx.raise(LangError::NestedFunction);
        assert_eq!(ctx.error(), Some(&LangError::DivisionByZero));
        assert_eq!(ctx.error_message().as_deref(), Some("division by zero"));
    }

    #[test]
    fn test_depth_limit() {
        let rules = InterpreterConfig {
            max_call_depth: 2,
            ..InterpreterConfig::default()
        };
        let mut ctx = LangContext::with_rules(0, rules);
        ctx.enter().unwrap();
        ctx.enter().unwrap();
        assert_eq!(ctx.enter(), Err(LangError::CallDepthExceeded(2)));
        ctx.leave();
        assert_eq!(ctx.depth(), 1);
    }
}
