//! Per-function argument validity oracle
//!
//! Knows, for configured functions, which values each argument slot accepts.
//! Value-flow queries ask it whether a possible value would be invalid at a
//! call site. Functions without a configuration accept everything.

use std::collections::HashMap;

/// Inclusive range of valid integer argument values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRange {
    pub min: i64,
    pub max: i64,
}

impl ValidRange {
    pub fn new(min: i64, max: i64) -> Self {
        debug_assert!(min <= max, "valid range must be ordered");
        Self { min, max }
    }

    fn contains_int(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    fn contains_float(&self, value: f64) -> bool {
        value >= self.min as f64 && value <= self.max as f64
    }
}

#[derive(Debug, Clone, Default)]
struct ArgSpec {
    valid: Vec<ValidRange>,
}

#[derive(Debug, Clone, Default)]
struct FunctionSpec {
    args: HashMap<u32, ArgSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct Library {
    functions: HashMap<String, FunctionSpec>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the valid ranges for one argument slot of a function.
    /// Argument numbering is 1-based, matching call-site order.
    pub fn set_arg_valid(&mut self, function: &str, argnr: u32, ranges: &[(i64, i64)]) {
        let spec = self
            .functions
            .entry(function.to_string())
            .or_default()
            .args
            .entry(argnr)
            .or_default();
        spec.valid = ranges.iter().map(|&(lo, hi)| ValidRange::new(lo, hi)).collect();
    }

    fn arg_spec(&self, function: &str, argnr: u32) -> Option<&ArgSpec> {
        self.functions.get(function)?.args.get(&argnr)
    }

    /// An unconfigured argument accepts any value.
    pub fn is_int_arg_valid(&self, function: &str, argnr: u32, value: i64) -> bool {
        match self.arg_spec(function, argnr) {
            Some(spec) if !spec.valid.is_empty() => {
                spec.valid.iter().any(|r| r.contains_int(value))
            }
            _ => true,
        }
    }

    /// An unconfigured argument accepts any value.
    pub fn is_float_arg_valid(&self, function: &str, argnr: u32, value: f64) -> bool {
        match self.arg_spec(function, argnr) {
            Some(spec) if !spec.valid.is_empty() => {
                spec.valid.iter().any(|r| r.contains_float(value))
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_function_accepts_everything() {
        let library = Library::new();
        assert!(library.is_int_arg_valid("strcpy", 1, -5));
        assert!(library.is_float_arg_valid("atan2", 2, 1e300));
    }

    #[test]
    fn test_int_ranges() {
        let mut library = Library::new();
        library.set_arg_valid("memset", 3, &[(0, 1024)]);

        assert!(library.is_int_arg_valid("memset", 3, 0));
        assert!(library.is_int_arg_valid("memset", 3, 1024));
        assert!(!library.is_int_arg_valid("memset", 3, -1));
        assert!(!library.is_int_arg_valid("memset", 3, 4096));
        // other slots of the same function stay unconstrained
        assert!(library.is_int_arg_valid("memset", 1, -1));
    }

    #[test]
    fn test_disjoint_ranges() {
        let mut library = Library::new();
        library.set_arg_valid("f", 1, &[(1, 5), (8, 8)]);

        assert!(library.is_int_arg_valid("f", 1, 3));
        assert!(library.is_int_arg_valid("f", 1, 8));
        assert!(!library.is_int_arg_valid("f", 1, 6));
    }

    #[test]
    fn test_float_ranges() {
        let mut library = Library::new();
        library.set_arg_valid("sqrtcheck", 1, &[(0, 100)]);

        assert!(library.is_float_arg_valid("sqrtcheck", 1, 0.5));
        assert!(!library.is_float_arg_valid("sqrtcheck", 1, -0.5));
    }
}
