use super::run;
use crate::error::{ErrorKind, LangError};

#[test]
fn test_syntax_errors() {
    let cases = [
        ("dance", LangError::InvalidOperation("dance".to_string())),
        ("set $0", LangError::Usage("set REGISTER VALUE")),
        ("scan 0", LangError::MissingRegisterPrefix("0".to_string())),
        ("scan $x", LangError::InvalidRegister("$x".to_string())),
        ("set $16 1", LangError::RegisterOutOfBounds("$16".to_string(), 16)),
        ("set $0 lava", LangError::UnknownConstant("lava".to_string())),
        ("set $0 1e3", LangError::InvalidValue("1e3".to_string())),
    ];
    for (program, expected) in cases {
        let ctx = run(program);
        assert_eq!(ctx.error(), Some(&expected), "program: {}", program);
        assert_eq!(expected.kind(), ErrorKind::Syntax);
    }
}

#[test]
fn test_first_error_is_kept() {
    let ctx = run("div $0 0\ndance");
    assert_eq!(ctx.error(), Some(&LangError::DivisionByZero));
}

#[test]
fn test_missing_robot() {
    let mut world = crate::world::World::new(3, 3);
    let (ctx, _) = super::run_in(&mut world, "forward");
    assert_eq!(ctx.error(), Some(&LangError::NoSuchRobot(0)));
    assert_eq!(LangError::NoSuchRobot(0).kind(), ErrorKind::Internal);
}

#[test]
fn test_turn_message() {
    assert_eq!(
        LangError::InvalidTurn(3).to_string(),
        "turn expects argument to be either `cw` or `ccw`, got 3"
    );
}
