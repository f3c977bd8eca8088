// src/config/consts.rs

// Net config
pub const SOURCE_URL: &str = "http://www.obelisk.me.uk/6502/reference.html";
pub const USER_AGENT: &str = "opcode_populate/0.1";
pub const REQUEST_TIMEOUT_SECS: u64 = 15;
pub const MAX_REDIRECTS: usize = 5;

// Catalog
pub const CATALOG_FILE: &str = "./ops_codes.json";
pub const TMP_SUFFIX: &str = ".tmp";

// Record fields written by the merge
pub const FIELD_OPCODE: &str = "opcode";
pub const FIELD_CYCLES: &str = "cycles";
pub const FIELD_PAGE_PENALTY: &str = "+1";

// Scrape
pub const REFERENCE_COLUMNS: usize = 4;
pub const OPCODE_COLUMN: usize = 1;
pub const SKIP_MARKERS: [&str; 2] = ["Home", "Cycles"];

// Local log
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
