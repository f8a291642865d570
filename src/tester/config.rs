pub mod grade {
    use std::time::Duration;
    pub const INTERPRETED_TIMEOUT: Duration = Duration::from_secs(3);
    pub const COMPILED_TIMEOUT: Duration = Duration::from_secs(2);
    pub const TIMEOUT_EXIT_CODE: i32 = 124;
    pub const PYTHON: &str = "python3";
    pub const C_COMPILER: &str = "gcc";
    pub const CPP_COMPILER: &str = "g++";
    pub const RUST_COMPILER: &str = "rustc -O";
    pub const SCRATCH_PREFIX: &str = "cp-tester-";
}
pub mod fetch {
    pub const CONCURRENCY: usize = 4;
}
pub mod cache {
    pub const DIR_NAME: &str = "cp-tester";
    pub const INPUT_PREFIX: &str = "Input";
    pub const OUTPUT_PREFIX: &str = "Output";
    pub const SETTINGS_FILE: &str = "settings.yaml";
}
pub mod session {
    pub const VERBOSE: bool = false;
    pub const FIREFOX_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:78.0) Gecko/20100101 Firefox/78.0";
}
