use super::{arena, run, run_in};
use crate::error::LangError;

#[test]
fn test_if_taken() {
    let ctx = run("set $0 3\nif $0 == 3 then set $1 1");
    assert_eq!(ctx.registers()[1], 1);
}

#[test]
fn test_if_not_taken() {
    let ctx = run("if 1 > 2 then set $1 1\nset $2 2");
    assert_eq!(ctx.registers()[1], 0);
    assert_eq!(ctx.registers()[2], 2);
}

#[test]
fn test_every_comparison() {
    let ctx = run(
        "if 1 == 1 then add $0 1\n\
         if 1 != 2 then add $0 1\n\
         if 3 > 2 then add $0 1\n\
         if 2 < 3 then add $0 1\n\
         if 3 >= 3 then add $0 1\n\
         if 3 <= 3 then add $0 1\n\
         if 3 < 3 then add $0 100",
    );
    assert_eq!(ctx.registers()[0], 6);
}

#[test]
fn test_nested_if() {
    let ctx = run("if 1 == 1 then if 2 == 2 then set $0 7");
    assert_eq!(ctx.registers()[0], 7);
}

#[test]
fn test_if_body_shares_registers() {
    let ctx = run("set $0 1\nif $0 == 1 then add $0 1\nif $0 == 2 then add $0 10");
    assert_eq!(ctx.registers()[0], 12);
}

#[test]
fn test_if_body_moves_robot() {
    let mut world = arena();
    let (ctx, _) = run_in(&mut world, "scan $0\nif $0 == none then forward");
    assert!(!ctx.is_errored());
    assert_eq!((world.robots[0].x, world.robots[0].y), (3, 2));
}

#[test]
fn test_invalid_comparison() {
    let ctx = run("if 1 = 1 then forward");
    assert_eq!(
        ctx.error(),
        Some(&LangError::InvalidComparison("=".to_string()))
    );
}

#[test]
fn test_error_inside_body_stops_program() {
    let ctx = run("if 1 == 1 then div $0 0\nset $1 1");
    assert_eq!(ctx.error(), Some(&LangError::DivisionByZero));
    assert_eq!(ctx.registers()[1], 0);
    assert_eq!(ctx.depth(), 0);
}
