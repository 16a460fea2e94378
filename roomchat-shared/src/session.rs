//! # Session Gate
//!
//! Decides whether the viewer may see the conversation. The gate holds the
//! current identity explicitly; views read it from the gate instead of from
//! any ambient global.

use futures_util::StreamExt;
use tracing::{debug, error, info};

use crate::collab::{AuthProvider, AuthResult, Navigator};
use crate::models::Identity;

/// Route of the sign-in screen.
pub const SIGN_IN_ROUTE: &str = "/";

/// Route of the conversation view.
pub const CHAT_ROUTE: &str = "/chat";

/// What the gate currently knows about the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No auth-state notification has arrived yet. Nothing protected renders.
    #[default]
    Pending,
    SignedOut,
    SignedIn(Identity),
}

impl SessionState {
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Outcome of one auth-state notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No identity: send the viewer to sign in and render nothing protected.
    RedirectToSignIn,
    /// The viewer may enter the conversation as this identity.
    Enter(Identity),
}

#[derive(Debug, Default)]
pub struct SessionGate {
    state: SessionState,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.state.identity()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.state, SessionState::Pending)
    }

    /// Handle one auth-state notification.
    pub fn apply(&mut self, identity: Option<Identity>) -> GateDecision {
        match identity {
            Some(identity) => {
                debug!(uid = %identity.uid, "session active");
                self.state = SessionState::SignedIn(identity.clone());
                GateDecision::Enter(identity)
            }
            None => {
                debug!("no active session");
                self.state = SessionState::SignedOut;
                GateDecision::RedirectToSignIn
            }
        }
    }

    /// Where a viewer currently on `current` must be sent, if anywhere.
    ///
    /// Signed-out viewers always end up on the sign-in route; signed-in
    /// viewers are moved from the sign-in route into the conversation. Nothing
    /// moves while the first notification is pending.
    #[must_use]
    pub fn route_for(&self, current: &str) -> Option<&'static str> {
        match &self.state {
            SessionState::Pending => None,
            SessionState::SignedOut if current != SIGN_IN_ROUTE => Some(SIGN_IN_ROUTE),
            SessionState::SignedIn(_) if current == SIGN_IN_ROUTE => Some(CHAT_ROUTE),
            _ => None,
        }
    }

    /// Follow the provider's session notifications until the stream ends,
    /// redirecting through `navigator` as the state changes.
    ///
    /// Holds exactly one subscription; dropping the returned future releases it.
    pub async fn follow<A, N, R, F>(
        &mut self,
        auth: &A,
        navigator: &N,
        current_route: R,
        mut on_change: F,
    ) where
        A: AuthProvider + ?Sized,
        N: Navigator + ?Sized,
        R: Fn() -> String,
        F: FnMut(&SessionState),
    {
        let mut changes = auth.session_changes();
        while let Some(identity) = changes.next().await {
            self.apply(identity);
            on_change(&self.state);
            let current = current_route();
            if let Some(target) = self.route_for(&current) {
                debug!(from = %current, to = target, "redirecting");
                navigator.redirect(target);
            }
        }
    }
}

/// Run the provider sign-in. Failures are logged and leave the session as is.
///
/// # Errors
/// Returns the provider error after logging it, for callers that surface it
/// in their own log sink.
pub async fn sign_in<A: AuthProvider + ?Sized>(auth: &A) -> AuthResult<Identity> {
    match auth.sign_in_with_provider().await {
        Ok(identity) => {
            info!(uid = %identity.uid, "signed in");
            Ok(identity)
        }
        Err(err) => {
            error!(error = %err, "sign-in failed");
            Err(err)
        }
    }
}

/// End the session. The following session notification drives the redirect.
///
/// # Errors
/// Returns an error if the auth service cannot be reached.
pub async fn sign_out<A: AuthProvider + ?Sized>(auth: &A) -> AuthResult<()> {
    auth.sign_out().await.inspect_err(|err| {
        error!(error = %err, "sign-out failed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::AuthError;
    use crate::testing::{MemoryAuth, RecordingNavigator, identity};

    #[test]
    fn test_pending_never_redirects() {
        let gate = SessionGate::new();

        assert!(gate.is_pending());
        assert_eq!(gate.route_for(CHAT_ROUTE), None);
        assert_eq!(gate.route_for(SIGN_IN_ROUTE), None);
    }

    #[test]
    fn test_signed_out_goes_to_sign_in() {
        let mut gate = SessionGate::new();

        assert_eq!(gate.apply(None), GateDecision::RedirectToSignIn);
        assert_eq!(gate.state(), &SessionState::SignedOut);
        assert!(gate.identity().is_none());
        assert_eq!(gate.route_for(CHAT_ROUTE), Some(SIGN_IN_ROUTE));
        assert_eq!(gate.route_for(SIGN_IN_ROUTE), None);
    }

    #[test]
    fn test_signed_in_enters_chat() {
        let mut gate = SessionGate::new();
        let ada = identity("u1", Some("Ada"));

        assert_eq!(gate.apply(Some(ada.clone())), GateDecision::Enter(ada.clone()));
        assert_eq!(gate.identity(), Some(&ada));
        assert_eq!(gate.route_for(SIGN_IN_ROUTE), Some(CHAT_ROUTE));
        assert_eq!(gate.route_for(CHAT_ROUTE), None);
    }

    #[tokio::test]
    async fn test_follow_redirects_on_each_change() {
        let auth = MemoryAuth::pending();
        let navigator = RecordingNavigator::at(CHAT_ROUTE);
        let mut gate = SessionGate::new();
        let mut seen = Vec::new();

        let driver = async {
            auth.publish(None);
            auth.publish(Some(identity("u1", Some("Ada"))));
            auth.close();
        };
        let follower = gate.follow(&auth, &navigator, || navigator.location(), |state| {
            seen.push(state.clone());
        });
        futures::join!(follower, driver);

        assert_eq!(navigator.redirects(), vec![SIGN_IN_ROUTE, CHAT_ROUTE]);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], SessionState::SignedOut);
        assert!(matches!(seen[1], SessionState::SignedIn(_)));
        assert_eq!(auth.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_follow_keeps_signed_in_viewer_in_place() {
        let auth = MemoryAuth::signed_in(identity("u1", None));
        let navigator = RecordingNavigator::at(CHAT_ROUTE);
        let mut gate = SessionGate::new();

        let driver = async { auth.close() };
        futures::join!(
            gate.follow(&auth, &navigator, || navigator.location(), |_| {}),
            driver
        );

        assert!(navigator.redirects().is_empty());
        assert_eq!(gate.identity().map(|id| id.uid.as_str()), Some("u1"));
    }

    #[tokio::test]
    async fn test_sign_in_failure_leaves_state() {
        let auth = MemoryAuth::signed_out();
        auth.queue_sign_in(Err(AuthError::Cancelled));

        let result = sign_in(&auth).await;

        assert_eq!(result, Err(AuthError::Cancelled));
        assert!(auth.current_user().is_none());
        assert_eq!(auth.sign_in_calls(), 1);
    }

    #[tokio::test]
    async fn test_sign_in_then_sign_out_notifies() {
        let auth = MemoryAuth::signed_out();
        let ada = identity("u1", Some("Ada"));
        auth.queue_sign_in(Ok(ada.clone()));
        let mut changes = auth.session_changes();

        assert_eq!(sign_in(&auth).await, Ok(ada.clone()));
        assert_eq!(sign_out(&auth).await, Ok(()));

        assert_eq!(changes.next().await, Some(None));
        assert_eq!(changes.next().await, Some(Some(ada)));
        assert_eq!(changes.next().await, Some(None));
    }
}
