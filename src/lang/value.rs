use crate::error::LangError;
use crate::lang::{Constant, LangContext, REGISTER_COUNT};

/// Parses a `$N` register reference into its index.
pub fn register_index(token: &str) -> Result<usize, LangError> {
    let Some(digits) = token.strip_prefix('$') else {
        return Err(LangError::MissingRegisterPrefix(token.to_string()));
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LangError::InvalidRegister(token.to_string()));
    }
    match digits.parse::<usize>() {
        Ok(index) if index < REGISTER_COUNT => Ok(index),
        _ => Err(LangError::RegisterOutOfBounds(
            token.to_string(),
            REGISTER_COUNT,
        )),
    }
}

/// Resolves a value token: `$N` reads a register, a word names a constant,
/// anything else must be a decimal integer.
pub fn evaluate(ctx: &LangContext, token: &str) -> Result<i32, LangError> {
    let Some(first) = token.chars().next() else {
        return Err(LangError::InvalidValue(token.to_string()));
    };
    if first == '$' {
        let index = register_index(token)?;
        return ctx.register(index);
    }
    if first.is_ascii_alphabetic() {
        return Constant::from_name(token)
            .map(Constant::value)
            .ok_or_else(|| LangError::UnknownConstant(token.to_string()));
    }
    if first.is_ascii_digit() || first == '-' {
        return token
            .parse::<i32>()
            .map_err(|_| LangError::InvalidValue(token.to_string()));
    }
    Err(LangError::InvalidValue(token.to_string()))
}

/// Like [`evaluate`], falling back to `default` when the argument is absent.
pub fn evaluate_or(ctx: &LangContext, token: Option<&str>, default: i32) -> Result<i32, LangError> {
    match token {
        Some(token) => evaluate(ctx, token),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_index() {
        assert_eq!(register_index("$0"), Ok(0));
        assert_eq!(register_index("$15"), Ok(15));
        assert_eq!(
            register_index("$16"),
            Err(LangError::RegisterOutOfBounds("$16".to_string(), 16))
        );
        assert_eq!(
            register_index("0"),
            Err(LangError::MissingRegisterPrefix("0".to_string()))
        );
        assert_eq!(register_index("$"), Err(LangError::InvalidRegister("$".to_string())));
        assert_eq!(register_index("$a"), Err(LangError::InvalidRegister("$a".to_string())));
        assert_eq!(register_index("$-1"), Err(LangError::InvalidRegister("$-1".to_string())));
    }

    #[test]
    fn test_literals_and_constants() {
        let ctx = LangContext::new(0);
        assert_eq!(evaluate(&ctx, "42"), Ok(42));
        assert_eq!(evaluate(&ctx, "-7"), Ok(-7));
        assert_eq!(evaluate(&ctx, "wall"), Ok(1));
        assert_eq!(evaluate(&ctx, "ccw"), Ok(9));
        assert_eq!(
            evaluate(&ctx, "WALL"),
            Err(LangError::UnknownConstant("WALL".to_string()))
        );
        assert_eq!(evaluate(&ctx, "4x"), Err(LangError::InvalidValue("4x".to_string())));
        assert_eq!(evaluate(&ctx, "+4"), Err(LangError::InvalidValue("+4".to_string())));
        assert_eq!(
            evaluate(&ctx, "99999999999"),
            Err(LangError::InvalidValue("99999999999".to_string()))
        );
    }

    #[test]
    fn test_registers() {
        let mut ctx = LangContext::new(0);
        ctx.set_register(3, 11).unwrap();
        assert_eq!(evaluate(&ctx, "$3"), Ok(11));
        assert_eq!(evaluate(&ctx, "$4"), Ok(0));
        assert_eq!(evaluate_or(&ctx, None, 1), Ok(1));
        assert_eq!(evaluate_or(&ctx, Some("$3"), 1), Ok(11));
    }
}
