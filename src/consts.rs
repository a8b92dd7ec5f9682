pub const HEADER_MEDIA_URL_KEY: &str = "header_media_url";
pub const AUTH_TEMPLATE_DEFAULT_PARAM: &str = "1234";
pub const BUTTON_PARAM_FALLBACK: &str = "123456";
pub const FLOW_TOKEN_DEFAULT: &str = "unused";

/// Sender used in generated payloads while no account is selected
pub const FALLBACK_SENDER_PHONE: &str = "919099913506";

pub const SAMPLE_TEMPLATE_NAME: &str = "sample_template";
pub const SAMPLE_TEMPLATE_LANG: &str = "en_US";

pub const MAX_SESSION_MESSAGE_CHARS: usize = 4096;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];
pub const ALLOWED_VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "3gp"];
pub const ALLOWED_DOCUMENT_EXTENSIONS: [&str; 8] =
    ["pdf", "doc", "docx", "txt", "xls", "xlsx", "ppt", "pptx"];
