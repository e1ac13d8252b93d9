// src/constants.rs
//
// Application-wide constants.

/// Directory under the platform config dir holding config, token and local blobs
pub const CONFIG_DIR_NAME: &str = "notekeeper";

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding `[api] api_key`
pub const API_KEY_ENV: &str = "NOTEKEEPER_API_KEY";

/// Environment variable overriding `[api] endpoint`
pub const ENDPOINT_ENV: &str = "NOTEKEEPER_ENDPOINT";

/// Header carrying the API key, as the managed GraphQL service expects it
pub const API_KEY_HEADER: &str = "x-api-key";

/// Delay in milliseconds after writing the HTML file before returning.
///
/// The browser needs a brief moment to pick the file up before the temporary
/// directory can go away.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;
