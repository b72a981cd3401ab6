use super::types::{
    default_frames_per_step, default_max_call_depth, default_max_functions,
    default_program_path, default_refuel_amount, Config, GameConfig, InterpreterConfig,
};
use crate::log_warn;

pub trait Validate {
    fn validate(&mut self);
}

impl Validate for GameConfig {
    fn validate(&mut self) {
        if self.program_path.as_os_str().is_empty() {
            log_warn!("Invalid program_path: empty. Using default: program.rbt");
            self.program_path = default_program_path();
        }

        if self.frames_per_step == 0 || self.frames_per_step > 600 {
            log_warn!(
                "Invalid frames_per_step: {}. Using default: {}",
                self.frames_per_step,
                default_frames_per_step()
            );
            self.frames_per_step = default_frames_per_step();
        }
    }
}

impl Validate for InterpreterConfig {
    fn validate(&mut self) {
        if self.refuel_amount < 0 {
            log_warn!(
                "Invalid refuel_amount: {}. Using default: {}",
                self.refuel_amount,
                default_refuel_amount()
            );
            self.refuel_amount = default_refuel_amount();
        }

        if let Some(cap) = self.fuel_cap {
            if cap <= 0 {
                log_warn!("Invalid fuel_cap: {}. Refueling is left uncapped", cap);
                self.fuel_cap = None;
            }
        }

        if self.max_call_depth == 0 || self.max_call_depth > 4096 {
            log_warn!(
                "Invalid max_call_depth: {}. Using default: {}",
                self.max_call_depth,
                default_max_call_depth()
            );
            self.max_call_depth = default_max_call_depth();
        }

        if self.max_functions == 0 {
            log_warn!(
                "Invalid max_functions: 0. Using default: {}",
                default_max_functions()
            );
            self.max_functions = default_max_functions();
        }
    }
}

impl Validate for Config {
    fn validate(&mut self) {
        self.game.validate();
        self.interpreter.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let mut config = Config::default();
        config.validate();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_out_of_range_values_are_reset() {
        let mut config = Config::default();
        config.game.frames_per_step = 0;
        config.interpreter.refuel_amount = -5;
        config.interpreter.fuel_cap = Some(0);
        config.interpreter.max_call_depth = 0;
        config.validate();
        assert_eq!(config, Config::default());
    }
}
