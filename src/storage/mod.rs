//! Session-scoped storage.
//!
//! Voice navigation only needs the persisted enabled flag (see `util::settings`);
//! everything here is forgotten when the app exits.

mod session;

pub use session::{
    SessionStore, SharedSession, LEARNER_PROFILE_KEY, LESSON_CONTENT_KEY,
    STARTUP_VOICE_PLAYED_KEY, TRANSFORM_CACHE_PREFIX,
};
