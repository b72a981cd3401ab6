use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Print,
    Forward,
    Backward,
    Turn,
    Refuel,
    Ram,
    Scan,
    Run,
    If,
    Set,
    Fn,
    End,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

pub const OPS: [Op; 17] = [
    Op::Print,
    Op::Forward,
    Op::Backward,
    Op::Turn,
    Op::Refuel,
    Op::Ram,
    Op::Scan,
    Op::Run,
    Op::If,
    Op::Set,
    Op::Fn,
    Op::End,
    Op::Add,
    Op::Sub,
    Op::Mul,
    Op::Div,
    Op::Mod,
];

impl Op {
    pub fn name(self) -> &'static str {
        match self {
            Op::Print => "print",
            Op::Forward => "forward",
            Op::Backward => "backward",
            Op::Turn => "turn",
            Op::Refuel => "refuel",
            Op::Ram => "ram",
            Op::Scan => "scan",
            Op::Run => "run",
            Op::If => "if",
            Op::Set => "set",
            Op::Fn => "fn",
            Op::End => "end",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::Mod => "mod",
        }
    }

    /// Case-sensitive lookup of an operation keyword.
    pub fn from_name(name: &str) -> Option<Op> {
        OPS.iter().copied().find(|op| op.name() == name)
    }

    /// Smallest and largest accepted argument count.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Op::Print => (0, 1),
            Op::Forward | Op::Backward | Op::Refuel | Op::Ram | Op::End => (0, 0),
            Op::Turn | Op::Scan | Op::Run | Op::Fn => (1, 1),
            Op::Set | Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod => (2, 2),
            Op::If => (4, 4),
        }
    }

    pub fn accepts(self, argc: usize) -> bool {
        let (min, max) = self.arity();
        (min..=max).contains(&argc)
    }

    pub fn usage(self) -> &'static str {
        match self {
            Op::Print => "print [VALUE]",
            Op::Forward => "forward",
            Op::Backward => "backward",
            Op::Turn => "turn cw|ccw",
            Op::Refuel => "refuel",
            Op::Ram => "ram",
            Op::Scan => "scan REGISTER",
            Op::Run => "run FUNCTION",
            Op::If => "if VALUE OPERATION VALUE then STATEMENT",
            Op::Set => "set REGISTER VALUE",
            Op::Fn => "fn NAME",
            Op::End => "end",
            Op::Add => "add REGISTER VALUE",
            Op::Sub => "sub REGISTER VALUE",
            Op::Mul => "mul REGISTER VALUE",
            Op::Div => "div REGISTER VALUE",
            Op::Mod => "mod REGISTER VALUE",
        }
    }

    /// Function delimiters never count as a visible tick.
    pub fn is_structural(self) -> bool {
        matches!(self, Op::Fn | Op::End)
    }

    pub fn consumes_fuel(self) -> bool {
        self != Op::End
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for op in OPS {
            assert_eq!(Op::from_name(op.name()), Some(op));
        }
        assert_eq!(Op::from_name("Forward"), None);
        assert_eq!(Op::from_name("forwar"), None);
    }

    #[test]
    fn test_arity() {
        assert!(Op::Print.accepts(0));
        assert!(Op::Print.accepts(1));
        assert!(!Op::Print.accepts(2));
        assert!(!Op::If.accepts(3));
        assert!(Op::End.accepts(0));
    }
}
