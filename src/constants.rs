pub const TICK_RATE_MS: u64 = 100; // 10 Hz refresh
pub const DEFAULT_WINDOW_SIZE: usize = 100;
pub const DATA_ENDPOINT: &str = "http://localhost:8080/get_data_from_B";
