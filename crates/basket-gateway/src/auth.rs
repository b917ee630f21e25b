//! Bearer-token session persisted in the durable store.

use basket_storage::{keys, StoreHandle};

/// Auth state for the current browser session. Tokens are issued elsewhere
/// (login flow, out of scope); this only holds, persists, and clears them.
pub struct AuthSession {
    store: StoreHandle,
    access_token: Option<String>,
    refresh_token: Option<String>,
    forced_logout: bool,
}

impl AuthSession {
    /// Rehydrate tokens from storage.
    pub fn new(store: StoreHandle) -> Self {
        let access_token = store.get_raw(keys::AUTH_TOKEN);
        let refresh_token = store.get_raw(keys::REFRESH_TOKEN);
        Self {
            store,
            access_token,
            refresh_token,
            forced_logout: false,
        }
    }

    /// Store freshly issued tokens, in memory and durably.
    pub fn store_tokens(&mut self, access_token: &str, refresh_token: Option<&str>) {
        if let Err(e) = self.store.set_raw(keys::AUTH_TOKEN, access_token) {
            tracing::warn!("auth: failed to persist token: {e}");
        }
        self.access_token = Some(access_token.to_string());
        if let Some(refresh) = refresh_token {
            if let Err(e) = self.store.set_raw(keys::REFRESH_TOKEN, refresh) {
                tracing::warn!("auth: failed to persist refresh token: {e}");
            }
            self.refresh_token = Some(refresh.to_string());
        }
        self.forced_logout = false;
    }

    /// Current bearer token for outbound requests.
    pub fn bearer_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Voluntary logout: clear memory and storage.
    pub fn logout(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.store.remove(keys::AUTH_TOKEN);
        self.store.remove(keys::REFRESH_TOKEN);
        tracing::info!("auth: logged out");
    }

    /// Session termination forced by a 401. Clears everything and raises the
    /// flag the host maps to a login redirect.
    pub fn force_logout(&mut self) {
        self.logout();
        self.forced_logout = true;
        tracing::warn!("auth: session terminated by server (401)");
    }

    /// Whether a forced logout is pending. Reading resets the flag.
    pub fn take_forced_logout(&mut self) -> bool {
        std::mem::take(&mut self.forced_logout)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .field("forced_logout", &self.forced_logout)
            .finish()
    }
}
