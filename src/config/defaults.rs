use super::types::{
    default_frames_per_step, default_log_level, default_max_call_depth, default_max_functions,
    default_program_path, default_refuel_amount, GameConfig, InterpreterConfig, LogConfig,
};

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            program_path: default_program_path(),
            level_path: None,
            frames_per_step: default_frames_per_step(),
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            refuel_amount: default_refuel_amount(),
            fuel_cap: None,
            max_call_depth: default_max_call_depth(),
            max_functions: default_max_functions(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            directory: None,
        }
    }
}
