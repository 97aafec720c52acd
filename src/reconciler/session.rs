use log::info;

use super::Reconciler;
use crate::{
    api::Backend,
    model::{SignUp, User},
    notice::{LOGIN_FAILED, SIGNUP_FAILED},
};

impl<B: Backend> Reconciler<B> {
    pub async fn login(&self, username: &str, password: &str) -> Option<User> {
        let result = self.backend.login(username.trim(), password).await;
        let user = self.report(result, LOGIN_FAILED)?;
        info!("Logged in as {}", user.username);
        self.store.update(|state| state.viewer = Some(user.clone()));
        Some(user)
    }

    pub async fn signup(&self, details: &SignUp) -> Option<User> {
        let result = self.backend.signup(details).await;
        let user = self.report(result, SIGNUP_FAILED)?;
        info!("Signed up as {}", user.username);
        self.store.update(|state| state.viewer = Some(user.clone()));
        Some(user)
    }

    pub fn logout(&self) {
        self.store.update(|state| state.viewer = None);
    }

    pub fn viewer(&self) -> Option<User> {
        self.store.read(|state| state.viewer.clone())
    }
}
