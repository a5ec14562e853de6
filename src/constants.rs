// Conversation
pub const GREETING: &str =
    "Hello! I'm SmartOhm customer support assistant. How can I help you with your queries?";
pub const FALLBACK_ANSWER: &str = "I'm sorry, I'm having trouble connecting to my brain right now. Please make sure the backend server is running.";

// API Constants
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const ASK_PATH: &str = "ask";
pub const HEALTH_PATH: &str = "health";

// Environment overrides
pub const ENV_API_URL: &str = "SMARTOHM_API_URL";
pub const ENV_LOG_LEVEL: &str = "SMARTOHM_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SMARTOHM_LOG_DIR";

pub const APP_NAME: &str = "smartohm-chat";

// UI Constants
pub const TITLE: &str = "SMARTOHM ASSISTANT";
pub const INPUT_PLACEHOLDER: &str = "Ask about returns, shipping, or styles...";
pub const THINKING_TEXT: &str = "Assistant is thinking...";
pub const SEND_LABEL: &str = "[ Send ]";
pub const SENDING_LABEL: &str = "[ ... ]";
pub const TICK_RATE_MS: u64 = 50;
