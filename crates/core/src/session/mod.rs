//! Session invalidation after logout.
//!
//! - [`storage`] - `FlagStorage` persistence boundary and in-memory storage
//! - [`flags`] - `LogoutFlagStore`, writing the cookie and client flag together
//! - [`guard`] - navigation, visibility and mount-time guards

pub mod flags;
pub mod guard;
pub mod storage;

pub use flags::{
    FlagError, LOGOUT_COOKIE_NAME, LOGOUT_COOKIE_VALUE, LogoutFlag, LogoutFlagStore,
    SESSION_EXPIRED_REASON, keys,
};
pub use guard::{
    CheckOutcome, GuardKind, GuardState, MountGuard, MountOutcome, NavigationWatcher, Navigator,
    RecordingNavigator, Visibility, VisibilityWatcher, check_route,
};
pub use storage::{FlagStorage, MemoryStorage, StorageError};
