use super::run;
use crate::error::LangError;

#[test]
fn test_set_and_add() {
    let ctx = run("set $0 5\nadd $0 3");
    assert_eq!(ctx.registers()[0], 8);
    assert!(!ctx.is_errored());
}

#[test]
fn test_all_operators() {
    let ctx = run(
        "set $1 20\nsub $1 6\n\
         set $2 7\nmul $2 -3\n\
         set $3 17\ndiv $3 5\n\
         set $4 17\nmod $4 5",
    );
    assert_eq!(&ctx.registers()[1..5], &[14, -21, 3, 2]);
}

#[test]
fn test_register_operands() {
    let ctx = run("set $0 6\nset $1 $0\nmul $1 $0");
    assert_eq!(ctx.registers()[1], 36);
}

#[test]
fn test_constants_as_values() {
    let ctx = run("set $0 fuel\nadd $0 robot");
    assert_eq!(ctx.registers()[0], 5);
}

#[test]
fn test_division_truncates_toward_zero() {
    let ctx = run("set $0 -7\ndiv $0 2\nset $1 -7\nmod $1 2");
    assert_eq!(ctx.registers()[0], -3);
    assert_eq!(ctx.registers()[1], -1);
}

#[test]
fn test_overflow_wraps() {
    let ctx = run("set $0 2147483647\nadd $0 1");
    assert_eq!(ctx.registers()[0], i32::MIN);
}

#[test]
fn test_division_by_zero() {
    let ctx = run("set $0 4\ndiv $0 0\nset $1 9");
    assert_eq!(ctx.error(), Some(&LangError::DivisionByZero));
    assert_eq!(ctx.registers()[0], 4);
    assert_eq!(ctx.registers()[1], 0);

    let ctx = run("mod $0 $1");
    assert_eq!(ctx.error(), Some(&LangError::DivisionByZero));
}

#[test]
fn test_target_must_be_register() {
    let ctx = run("add 3 4");
    assert_eq!(
        ctx.error(),
        Some(&LangError::MissingRegisterPrefix("3".to_string()))
    );
}
