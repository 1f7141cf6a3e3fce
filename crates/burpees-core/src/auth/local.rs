use super::{AuthListener, AuthProvider, AuthState};
use crate::error::AuthError;
use crate::storage::Database;

const PROFILE_KEY: &str = "auth.display_name";
const MAX_NAME_LEN: usize = 64;

/// Profile-based sign-in persisted in the database kv table.
///
/// Starts in [`AuthState::Checking`]; call [`LocalAuth::refresh`] to
/// resolve the stored profile.
pub struct LocalAuth<'a> {
    db: &'a Database,
    state: AuthState,
    display_name: Option<String>,
    listeners: Vec<AuthListener>,
}

impl<'a> LocalAuth<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            state: AuthState::Checking,
            display_name: None,
            listeners: Vec::new(),
        }
    }

    /// Read the stored profile and settle into signed in or out.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be read.
    pub fn refresh(&mut self) -> Result<AuthState, AuthError> {
        match self.db.kv_get(PROFILE_KEY)? {
            Some(name) => self.transition(AuthState::LoggedIn, Some(name)),
            None => self.transition(AuthState::LoggedOut, None),
        }
        Ok(self.state)
    }

    fn transition(&mut self, state: AuthState, display_name: Option<String>) {
        self.state = state;
        self.display_name = display_name;
        tracing::info!(state = %state, user = ?self.display_name, "auth state changed");
        let name = self.display_name.as_deref();
        for listener in &mut self.listeners {
            listener(state, name);
        }
    }
}

impl AuthProvider for LocalAuth<'_> {
    fn state(&self) -> AuthState {
        self.state
    }

    fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    fn subscribe(&mut self, listener: AuthListener) {
        self.listeners.push(listener);
    }

    fn login(&mut self, display_name: &str) -> Result<(), AuthError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidName("display name is empty".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AuthError::InvalidName(format!(
                "display name longer than {MAX_NAME_LEN} characters"
            )));
        }
        self.db.kv_set(PROFILE_KEY, name)?;
        self.transition(AuthState::LoggedIn, Some(name.to_string()));
        Ok(())
    }

    fn logout(&mut self) -> Result<(), AuthError> {
        self.db.kv_delete(PROFILE_KEY)?;
        self.transition(AuthState::LoggedOut, None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn starts_checking_then_resolves_logged_out() {
        let db = Database::open_memory().unwrap();
        let mut auth = LocalAuth::new(&db);
        assert_eq!(auth.state(), AuthState::Checking);
        assert_eq!(auth.refresh().unwrap(), AuthState::LoggedOut);
        assert!(matches!(auth.require_user(), Err(AuthError::NotSignedIn)));
    }

    #[test]
    fn login_persists_across_providers() {
        let db = Database::open_memory().unwrap();
        LocalAuth::new(&db).login("  Sam ").unwrap();

        let mut auth = LocalAuth::new(&db);
        auth.refresh().unwrap();
        assert_eq!(auth.state(), AuthState::LoggedIn);
        assert_eq!(auth.require_user().unwrap(), "Sam");

        auth.logout().unwrap();
        assert_eq!(auth.state(), AuthState::LoggedOut);
        assert!(auth.display_name().is_none());
        assert!(db.kv_get(PROFILE_KEY).unwrap().is_none());
    }

    #[test]
    fn listeners_see_every_transition() {
        let db = Database::open_memory().unwrap();
        let seen: Rc<RefCell<Vec<(AuthState, Option<String>)>>> = Rc::default();
        let mut auth = LocalAuth::new(&db);
        let sink = Rc::clone(&seen);
        auth.subscribe(Box::new(move |state: AuthState, name: Option<&str>| {
            sink.borrow_mut().push((state, name.map(str::to_string)));
        }));

        auth.refresh().unwrap();
        auth.login("Robin").unwrap();
        auth.logout().unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (AuthState::LoggedOut, None),
                (AuthState::LoggedIn, Some("Robin".to_string())),
                (AuthState::LoggedOut, None),
            ]
        );
    }

    #[test]
    fn login_rejects_blank_and_long_names() {
        let db = Database::open_memory().unwrap();
        let mut auth = LocalAuth::new(&db);
        assert!(matches!(auth.login("   "), Err(AuthError::InvalidName(_))));
        assert!(matches!(
            auth.login(&"x".repeat(65)),
            Err(AuthError::InvalidName(_))
        ));
        assert_eq!(auth.state(), AuthState::Checking);
    }
}
