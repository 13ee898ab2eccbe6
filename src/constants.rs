pub mod keys {

    pub const USERS: &str = "portal_users";

    pub const ANNOUNCEMENTS: &str = "portal_announcements";

    pub const ACTIVITY: &str = "portal_activity";

    pub const SESSION: &str = "portal_session";
}

pub mod bootstrap {

    pub const ADMIN_EMAIL: &str = "admin@portal";

    /// Well-known default, not a secret. Deployments must override it.
    pub const ADMIN_PASSWORD: &str = "admin123";

    pub const ADMIN_NAME: &str = "Administrator";
}

pub mod limits {

    pub const ACTIVITY_LOG_CAP: usize = 200;

    pub const SALT_BYTES: usize = 16;

    pub const MIN_SALT_BYTES: usize = 8;

    pub const MIN_PASSWORD_LENGTH: usize = 8;

    pub const DEFAULT_ACTIVITY_LIMIT: usize = 20;
}

pub mod actions {

    pub const REGISTERED: &str = "Registered";

    pub const LOGGED_IN: &str = "Logged in";

    pub const LOGGED_OUT: &str = "Logged out";

    pub const CREDENTIAL_MIGRATED: &str = "Credential migrated";

    pub const ADMIN_BOOTSTRAPPED: &str = "Admin account bootstrapped";
}
