// DOM wiring and interaction tuning for the web front end.

// Element ids in index.html
pub const CANVAS_ID: &str = "app-canvas";
pub const LOADER_ID: &str = "loader";
pub const TITLE_ID: &str = "scene-title";
pub const CARD_ID_PREFIX: &str = "panel-"; // followed by the panel key
pub const GUESTBOOK_LIST_ID: &str = "guestbook-list";
pub const GUESTBOOK_FORM_ID: &str = "guestbook-form";
pub const GUESTBOOK_INPUT_ID: &str = "guestbook-input";
pub const GUESTBOOK_USER_ID: &str = "guestbook-user";
pub const GUESTBOOK_STATUS_ID: &str = "guestbook-status";

// Card geometry in CSS pixels before scaling
pub const CARD_WIDTH_PX: f32 = 450.0;
pub const CARD_IDLE_OPACITY: f32 = 0.8;

// Title sizing: CSS font-size at the home distance
pub const TITLE_FONT_PX_AT_HOME: f32 = 48.0;

// Pointer
pub const CLICK_SLOP_PX: f32 = 5.0; // drags shorter than this count as clicks

// Firestore polling
pub const POLL_INTERVAL_MS: i32 = 4000;

pub const UNAVAILABLE_LABEL: &str = "Guestbook unavailable.";
