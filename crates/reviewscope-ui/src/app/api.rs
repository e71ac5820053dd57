//! API client context for sharing a singleton client instance.
//!
//! # Design
//! - Create exactly one API client per app boot.
//! - Views borrow it through a Yew context.

use crate::core::logic::api_base_url;
use crate::services::api::ApiClient;
use gloo::utils::window;
use std::rc::Rc;

/// Shared API client context for UI services.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// Singleton API client instance.
    pub client: Rc<ApiClient>,
}

impl ApiCtx {
    /// Client for the build-time `REVIEWSCOPE_API_URL`, else `<origin>/api`.
    pub(crate) fn from_env() -> Self {
        let origin = window()
            .location()
            .origin()
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let base_url = api_base_url(option_env!("REVIEWSCOPE_API_URL"), &origin);
        let token = option_env!("REVIEWSCOPE_API_TOKEN").map(ToString::to_string);
        Self {
            client: Rc::new(ApiClient::new(base_url, token)),
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}
