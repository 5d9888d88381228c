/// Default values for configuration fields

pub fn tcp_nodelay() -> bool {
    true
}

pub fn timeout_secs() -> u64 {
    60
}

pub fn max_body_size() -> usize {
    10
}

pub fn max_concurrent_requests() -> usize {
    1000
}

pub fn allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

pub fn streaming_threshold_mb() -> u64 {
    100  // Files >100MB streamed instead of loaded into memory
}

pub fn enable_compression() -> bool {
    true
}

pub fn cookie_name() -> Option<String> {
    Some("locale".to_string())
}

pub fn user_agent() -> bool {
    false
}

pub fn watch() -> bool {
    true
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# Varia Configuration
# ===============================================================================

[server]
# Network
host = "0.0.0.0"                     # Server bind address (0.0.0.0 = all interfaces)
port = 8080                          # Server port

# Performance
tcp_nodelay = true                   # Disable Nagle's algorithm (lower latency)
timeout_secs = 60                    # Request timeout in seconds
max_concurrent_requests = 1000       # Max simultaneous connections
max_body_size_mb = 10                # Max request body size in MB
streaming_threshold_mb = 100         # Files >100MB streamed, <100MB loaded into RAM
enable_compression = true            # HTTP compression (gzip/brotli/deflate)

# CORS
allowed_origins = ["*"]              # "*" = all origins | ["https://example.com"] for production

[negotiation]
# Document roots, probed in order
roots = ["public"]

# Cookie consulted for the visitor's locale override
cookie_name = "locale"

# Match variants against User-Agent derived device/browser tags
user_agent = false

# Watch served directories and refresh catalogs on change
watch = true
"#;
