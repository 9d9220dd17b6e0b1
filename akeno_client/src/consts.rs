use std::time::Duration;

pub const REST_API: &str = "https://api.twitter.com/2";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36";

/// Response header reporting calls left in the current window.
pub const RATE_LIMIT_HEADER: &str = "x-rate-limit-remaining";

/// Wait applied when the window is exhausted, matching the 15-minute
/// reset interval of the API.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(900);

pub const TWEET_FIELDS: &str = "created_at,author_id,public_metrics,entities,source,lang";
pub const USER_FIELDS: &str =
    "created_at,description,location,profile_image_url,public_metrics,protected,url,verified";

/// When set, every response body is written to this directory.
pub const LOG_DIR_ENV: &str = "AKENO_LOG_DIR";
