pub const MIB: u64 = 1024 * 1024;

/// Multipart field that carries the uploaded video.
pub const VIDEO_FIELD: &str = "video";

/// Extensions accepted by `POST /upload`.
pub const UPLOAD_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];

/// Extensions reported by `GET /videos`.
pub const LISTED_EXTENSIONS: [&str; 2] = [".webm", ".mp4"];

pub const SIDECAR_SUFFIX: &str = "-analysis.json";

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

pub struct Env {
    pub ip: String,
    pub port: u16,
    pub workers: usize,
    pub frontend_url: String,
    pub upload_dir: String,
    pub max_upload_bytes: u64,
    pub upload_concurrency: usize,
    pub max_analysis_bytes: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub chat_api_key: Option<String>,
    pub chat_api_url: String,
    pub chat_model: String,
    pub ai_request_timeout_secs: u64,
    pub analysis_concurrency: usize,
    pub analysis_queue_capacity: usize,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: &str) -> T {
    var_or(name, default)
        .parse::<T>()
        .unwrap_or_else(|_| panic!("{name} must be a valid number"))
}

/// Reads an API key, treating empty values and the sample placeholder as unset.
pub fn api_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY)
}

impl Env {
    fn new() -> Self {
        let ip = var_or("IP", "0.0.0.0");
        let port = parse_var::<u16>("PORT", "3000");
        let workers = parse_var::<usize>("WORKERS", "2");
        let frontend_url = var_or("FRONTEND_URL", "*");

        let upload_dir = var_or("UPLOAD_DIR", "./uploads");
        let max_upload_bytes = parse_var::<u64>("MAX_UPLOAD_MB", "500") * MIB;
        let upload_concurrency = parse_var::<usize>("UPLOAD_CONCURRENCY", "4");
        let max_analysis_bytes = parse_var::<u64>("MAX_ANALYSIS_MB", "100") * MIB;

        let gemini_api_key = api_key("GEMINI_API_KEY");
        let gemini_api_url =
            var_or("GEMINI_API_URL", "https://generativelanguage.googleapis.com/v1beta");
        let gemini_model = var_or("GEMINI_MODEL", "gemini-2.5-flash");

        let chat_api_key = api_key("CHAT_API_KEY").or_else(|| api_key("LOVABLE_API_KEY"));
        let chat_api_url =
            var_or("CHAT_API_URL", "https://ai.gateway.lovable.dev/v1/chat/completions");
        let chat_model = var_or("CHAT_MODEL", "google/gemini-2.5-flash");

        let ai_request_timeout_secs = parse_var::<u64>("AI_REQUEST_TIMEOUT_SECS", "300");
        let analysis_concurrency = parse_var::<usize>("ANALYSIS_CONCURRENCY", "2");
        let analysis_queue_capacity = parse_var::<usize>("ANALYSIS_QUEUE_CAPACITY", "64");

        Env {
            ip,
            port,
            workers,
            frontend_url,
            upload_dir,
            max_upload_bytes,
            upload_concurrency,
            max_analysis_bytes,
            gemini_api_key,
            gemini_api_url,
            gemini_model,
            chat_api_key,
            chat_api_url,
            chat_model,
            ai_request_timeout_secs,
            analysis_concurrency,
            analysis_queue_capacity,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
