use crate::error::LangError;
use crate::lang::{Instruction, Op, MAX_ARGS};
use crate::log_warn;

/// Read position inside a program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    At(usize),
    Exhausted,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::At(0)
    }
}

impl Cursor {
    pub fn start() -> Self {
        Cursor::default()
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Cursor::Exhausted)
    }

    pub fn offset(&self) -> Option<usize> {
        match self {
            Cursor::At(offset) => Some(*offset),
            Cursor::Exhausted => None,
        }
    }
}

fn scan(bytes: &[u8], mut pos: usize, keep: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && keep(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn line_end(bytes: &[u8], pos: usize) -> usize {
    scan(bytes, pos, |b| b != b'\n')
}

fn is_horizontal_space(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r'
}

/// Skips whitespace, blank lines and `;` comments between statements.
fn skip_blank(bytes: &[u8], mut pos: usize) -> usize {
    loop {
        pos = scan(bytes, pos, |b| b.is_ascii_whitespace());
        if pos < bytes.len() && bytes[pos] == b';' {
            pos = line_end(bytes, pos);
        } else {
            return pos;
        }
    }
}

/// Whether only whitespace and comments remain at `cursor`.
pub fn is_finished(program: &str, cursor: Cursor) -> bool {
    match cursor {
        Cursor::At(pos) => skip_blank(program.as_bytes(), pos) >= program.len(),
        Cursor::Exhausted => true,
    }
}

/// Parses the statement at `cursor` and moves the cursor past it.
///
/// Returns `Ok(None)` and marks the cursor exhausted once only whitespace and
/// comments remain. After `then` (or `:`) the rest of the line is taken as a
/// single literal argument without further tokenizing. On error the cursor
/// is left past the offending line.
pub fn next_instruction(
    program: &str,
    cursor: &mut Cursor,
) -> Result<Option<Instruction>, LangError> {
    let Cursor::At(start) = *cursor else {
        return Ok(None);
    };
    let bytes = program.as_bytes();
    let mut pos = skip_blank(bytes, start);
    if pos >= bytes.len() {
        *cursor = Cursor::Exhausted;
        return Ok(None);
    }

    let word_end = scan(bytes, pos, |b| b.is_ascii_alphabetic());
    let op = match bytes.get(word_end) {
        None => Op::from_name(&program[pos..word_end]),
        Some(b) if b.is_ascii_whitespace() || *b == b';' => {
            Op::from_name(&program[pos..word_end])
        }
        Some(_) => None,
    };
    let Some(op) = op else {
        let token_end = scan(bytes, pos, |b| !b.is_ascii_whitespace());
        *cursor = Cursor::At(line_end(bytes, pos));
        return Err(LangError::InvalidOperation(program[pos..token_end].to_string()));
    };
    pos = word_end;

    let mut args: Vec<String> = Vec::with_capacity(MAX_ARGS);
    let mut literal = false;
    loop {
        pos = scan(bytes, pos, is_horizontal_space);
        if pos >= bytes.len() || bytes[pos] == b'\n' {
            break;
        }
        if !literal && bytes[pos] == b';' {
            pos = line_end(bytes, pos);
            break;
        }
        let end = if literal {
            line_end(bytes, pos)
        } else {
            scan(bytes, pos, |b| !b.is_ascii_whitespace())
        };
        let token = &program[pos..end];
        if !literal && (token == "then" || token == ":") {
            literal = true;
            pos = end;
            continue;
        }
        if args.len() == MAX_ARGS {
            let rest_end = line_end(bytes, pos);
            log_warn!(
                "maximum arguments for an instruction is {}, ignoring `{}`",
                MAX_ARGS,
                program[pos..rest_end].trim_end()
            );
            pos = rest_end;
            break;
        }
        args.push(token.trim_end().to_string());
        pos = end;
    }
    *cursor = Cursor::At(pos);

    if !op.accepts(args.len()) {
        return Err(LangError::Usage(op.usage()));
    }
    Ok(Some(Instruction::new(op, args)))
}

/// Parses a whole program up front, stopping at the first error.
pub fn parse_program(program: &str) -> Result<Vec<Instruction>, LangError> {
    let mut cursor = Cursor::start();
    let mut instructions = Vec::new();
    while let Some(ins) = next_instruction(program, &mut cursor)? {
        instructions.push(ins);
    }
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(program: &str) -> Vec<Instruction> {
        parse_program(program).unwrap()
    }

    #[test]
    fn test_simple_statements() {
        let instructions = parse("forward\nturn cw\nset $0 5\n");
        assert_eq!(
            instructions,
            vec![
                Instruction::new(Op::Forward, vec![]),
                Instruction::new(Op::Turn, vec!["cw".to_string()]),
                Instruction::new(Op::Set, vec!["$0".to_string(), "5".to_string()]),
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let instructions = parse("; a comment\n\n   forward ; trailing\n\t; another\nram");
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].op, Op::Forward);
        assert_eq!(instructions[1].op, Op::Ram);
    }

    #[test]
    fn test_finished_after_trailing_comments() {
        let program = "forward\n; done\n\n";
        let mut cursor = Cursor::start();
        assert!(!is_finished(program, cursor));
        next_instruction(program, &mut cursor).unwrap();
        assert!(!cursor.is_exhausted());
        assert!(is_finished(program, cursor));
    }

    #[test]
    fn test_then_captures_rest_of_line() {
        let instructions = parse("if $0 == 0 then set $1 2 ; kept verbatim  \nforward");
        assert_eq!(instructions[0].op, Op::If);
        assert_eq!(
            instructions[0].args,
            vec!["$0", "==", "0", "set $1 2 ; kept verbatim"]
        );
        assert_eq!(instructions[1].op, Op::Forward);
    }

    #[test]
    fn test_colon_starts_literal() {
        let instructions = parse("if 1 < 2 : turn ccw");
        assert_eq!(instructions[0].arg(3), Some("turn ccw"));
    }

    #[test]
    fn test_empty_program_exhausts_cursor() {
        let mut cursor = Cursor::start();
        assert_eq!(next_instruction("  \n ; nothing\n", &mut cursor), Ok(None));
        assert!(cursor.is_exhausted());
        assert_eq!(next_instruction("forward", &mut cursor), Ok(None));
    }

    #[test]
    fn test_cursor_advances_one_statement_at_a_time() {
        let program = "forward\nbackward";
        let mut cursor = Cursor::start();
        let first = next_instruction(program, &mut cursor).unwrap().unwrap();
        assert_eq!(first.op, Op::Forward);
        assert_eq!(cursor, Cursor::At(7));
        let second = next_instruction(program, &mut cursor).unwrap().unwrap();
        assert_eq!(second.op, Op::Backward);
        assert_eq!(next_instruction(program, &mut cursor), Ok(None));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_unknown_operation() {
        let mut cursor = Cursor::start();
        assert_eq!(
            next_instruction("Forward\n", &mut cursor),
            Err(LangError::InvalidOperation("Forward".to_string()))
        );
        assert_eq!(
            next_instruction("jump 3", &mut Cursor::start()),
            Err(LangError::InvalidOperation("jump".to_string()))
        );
        assert_eq!(
            next_instruction("forward3", &mut Cursor::start()),
            Err(LangError::InvalidOperation("forward3".to_string()))
        );
    }

    #[test]
    fn test_arity_is_checked() {
        assert_eq!(
            next_instruction("turn", &mut Cursor::start()),
            Err(LangError::Usage("turn cw|ccw"))
        );
        assert_eq!(
            next_instruction("forward 2", &mut Cursor::start()),
            Err(LangError::Usage("forward"))
        );
        assert_eq!(
            next_instruction("if $0 then forward", &mut Cursor::start()),
            Err(LangError::Usage("if VALUE OPERATION VALUE then STATEMENT"))
        );
    }

    #[test]
    fn test_extra_arguments_are_dropped() {
        let mut cursor = Cursor::start();
        let program = "if 1 == 1 then forward\nprint 1 2 3 4 5 6\nram";
        next_instruction(program, &mut cursor).unwrap();
        // Five tokens: the fifth is discarded, leaving four, which `print` rejects.
        assert_eq!(
            next_instruction(program, &mut cursor),
            Err(LangError::Usage("print [VALUE]"))
        );
        let ram = next_instruction(program, &mut cursor).unwrap().unwrap();
        assert_eq!(ram.op, Op::Ram);
    }

    #[test]
    fn test_multibyte_text_in_literal() {
        let instructions = parse("if 1 == 1 then print ñ\n");
        assert_eq!(instructions[0].arg(3), Some("print ñ"));
    }
}
