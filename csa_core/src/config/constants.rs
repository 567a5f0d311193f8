pub mod compile_time {
    pub mod values {
        /// Maximum number of value-flow values one token may carry.
        /// Additions past the cap are refused, not silently evicted.
        pub const MAX_VALUES_PER_TOKEN: usize = 10;
    }

    pub mod pattern {
        /// Tokens scanned between checks of the global terminate flag
        /// inside `find_match`/`find_simple_match` loops
        pub const TERMINATE_POLL_INTERVAL: usize = 1024;
    }

    pub mod ast {
        /// Tokens examined on each side when deciding whether `++`/`--`
        /// is a prefix or postfix operator
        pub const MAX_UNARY_SCAN_DISTANCE: usize = 10;
    }

    pub mod tokens {
        /// Progress values distributed over a stream run 0..=PROGRESS_MAX
        pub const PROGRESS_MAX: usize = 100;
    }

    pub mod logging {
        /// In-memory log buffer size before the oldest events are dropped
        pub const LOG_BUFFER_SIZE: usize = 10_000;
    }
}
