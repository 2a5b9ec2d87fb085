//! Identity gate in front of every data view.

use tracing::info;

/// Login capability supplied by the host. The dashboard only asks whether a
/// viewer is signed in and who they are.
pub trait IdentityProvider: Send {
    fn is_logged_in(&self) -> bool;
    fn current_user_display_name(&self) -> Option<String>;
    fn login(&mut self);
    fn logout(&mut self);
}

/// What the dashboard may render for the current viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Restricted,
    Granted { display_name: String },
}

impl Access {
    pub fn of(identity: &dyn IdentityProvider) -> Self {
        if identity.is_logged_in() {
            Access::Granted {
                display_name: identity.current_user_display_name().unwrap_or_default(),
            }
        } else {
            Access::Restricted
        }
    }
}

/// Session-local identity for a single configured viewer.
#[derive(Debug, Clone)]
pub struct LocalIdentity {
    display_name: String,
    logged_in: bool,
}

impl LocalIdentity {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            logged_in: false,
        }
    }
}

impl IdentityProvider for LocalIdentity {
    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn current_user_display_name(&self) -> Option<String> {
        self.logged_in.then(|| self.display_name.clone())
    }

    fn login(&mut self) {
        info!(user = %self.display_name, "viewer logged in");
        self.logged_in = true;
    }

    fn logout(&mut self) {
        if self.logged_in {
            info!(user = %self.display_name, "viewer logged out");
        }
        self.logged_in = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_is_restricted_by_default() {
        let identity = LocalIdentity::new("Dana Ortiz");
        assert!(!identity.is_logged_in());
        assert_eq!(identity.current_user_display_name(), None);
        assert_eq!(Access::of(&identity), Access::Restricted);
    }

    #[test]
    fn test_login_grants_access_with_display_name() {
        let mut identity = LocalIdentity::new("Dana Ortiz");
        identity.login();
        assert_eq!(
            Access::of(&identity),
            Access::Granted {
                display_name: "Dana Ortiz".to_string()
            }
        );
    }

    #[test]
    fn test_logout_restricts_again() {
        let mut identity = LocalIdentity::new("Dana Ortiz");
        identity.login();
        identity.logout();
        assert_eq!(Access::of(&identity), Access::Restricted);

        // Logging out twice is harmless
        identity.logout();
        assert!(!identity.is_logged_in());
    }
}
