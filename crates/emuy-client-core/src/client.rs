use anyhow::Context as _;
use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use emuy_shared::{
    const_config::path::{PathSpec, Service, PATH_AUTH_LOGIN, PATH_AUTH_LOGOUT, PATH_AUTH_ME},
    errors::RequestError,
    log_err_as_warn,
    req_args::NoArgs,
    uac::{MeResponse, Session},
};
use futures::channel::oneshot;
use reqwest::{header, Method, Url};
use secrecy::{ExposeSecret as _, SecretString};
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::configuration::ClientConfiguration;

pub mod api;
pub mod health;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// What every request returns to the UI
pub type ResponseReceiver<T> = oneshot::Receiver<Result<T, RequestError>>;

#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    inner: Arc<Mutex<ClientInner>>,
}

#[derive(Debug)]
struct ClientInner {
    config: Arc<ClientConfiguration>,
    session: Arc<Session>,
    /// Bumped by each session load. Only the load holding the latest value may
    /// store its result.
    session_generation: u64,
    github_token: Option<SecretString>,
}

impl ClientInner {
    fn new(config: ClientConfiguration) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(Session::loading()),
            session_generation: 0,
            github_token: None,
        }
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(config))]
    pub fn new(config: ClientConfiguration) -> anyhow::Result<Self> {
        let builder = reqwest::Client::builder();

        // The browser manages cookies itself, see `fetch_credentials_include`
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .cookie_store(true)
            .user_agent(concat!("emuy-tools/", env!("CARGO_PKG_VERSION")));

        let api_client = builder
            .build()
            .context("unable to create reqwest client")?;
        Ok(Self {
            api_client,
            inner: Arc::new(Mutex::new(ClientInner::new(config))),
        })
    }

    pub fn config(&self) -> Arc<ClientConfiguration> {
        Arc::clone(&self.lock_inner().config)
    }

    /// Snapshot of the current session. It is replaced wholesale so the
    /// snapshot is always internally consistent.
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.lock_inner().session)
    }

    /// Loads the session from the auth service with a single request. Any
    /// failure results in a logged out session, nothing is returned as an
    /// error. The receiver gets whatever session is current once the
    /// response has been handled.
    #[tracing::instrument(skip(ui_notify))]
    pub fn initialize<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<Arc<Session>> {
        let generation = {
            let mut inner = self.lock_inner();
            inner.session_generation += 1;
            inner.session_generation
        };
        let (tx, rx) = oneshot::channel();
        let client = self.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let session = log_err_as_warn!(
                process_json_body::<MeResponse>(resp).await,
                "failed to load session, continuing as logged out"
            )
            .map_or_else(Session::logged_out, Session::from_me_response);
            let current = client.store_session(generation, session);
            deliver(tx, current);
            ui_notify();
        };
        self.initiate_request(PATH_AUTH_ME, &NoArgs {}, on_done);
        rx
    }

    /// Same as [`Self::initialize`]. The current session stays visible (not
    /// loading) until the new one arrives.
    #[tracing::instrument(skip(ui_notify))]
    pub fn refresh<F: UiCallBack>(&self, ui_notify: F) -> oneshot::Receiver<Arc<Session>> {
        self.initialize(ui_notify)
    }

    /// Url to navigate to in order to log in. Local state is left untouched,
    /// the session is loaded again once the auth service sends the user back.
    #[tracing::instrument(err(Debug))]
    pub fn login_url(&self, return_to: &str) -> anyhow::Result<Url> {
        let base = self.url_for(&PATH_AUTH_LOGIN);
        Url::parse_with_params(&base, &[("redirect", return_to)])
            .with_context(|| format!("failed to build login url from {base:?}"))
    }

    #[tracing::instrument(err(Debug))]
    pub fn logout_url(&self) -> anyhow::Result<Url> {
        let base = self.url_for(&PATH_AUTH_LOGOUT);
        let origin = self.config().services.app_origin.clone();
        Url::parse_with_params(&base, &[("redirect", origin.as_str())])
            .with_context(|| format!("failed to build logout url from {base:?}"))
    }

    /// For when the app keeps running after the logout redirect was handed to
    /// a browser. Also invalidates any session load still in flight.
    #[tracing::instrument]
    pub fn clear_session(&self) {
        let mut inner = self.lock_inner();
        inner.session_generation += 1;
        inner.session = Arc::new(Session::logged_out());
    }

    fn store_session(&self, generation: u64, session: Session) -> Arc<Session> {
        let mut inner = self.lock_inner();
        if generation == inner.session_generation {
            info!(logged_in = session.is_logged_in(), "session updated");
            inner.session = Arc::new(session);
        } else {
            debug!(
                generation,
                latest = inner.session_generation,
                "discarding stale session response"
            );
        }
        Arc::clone(&inner.session)
    }

    fn lock_inner(&self) -> MutexGuard<'_, ClientInner> {
        // Nothing holding the lock can leave the data half written
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[tracing::instrument(skip(args, on_done))]
    // WARNING: Must skip args as it my contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(&self, path_spec: PathSpec, args: &T, on_done: F)
    where
        T: serde::Serialize + Debug,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let request = self.build_request(path_spec, args);
        reqwest_cross::fetch(request, on_done)
    }

    fn build_request<T>(&self, path_spec: PathSpec, args: &T) -> reqwest::RequestBuilder
    where
        T: serde::Serialize + Debug,
    {
        let url = self.url_for(&path_spec);
        let mut request = self.api_client.request(path_spec.method.clone(), url);
        request = if path_spec.method == Method::GET {
            request.query(args)
        } else {
            request.json(args)
        };

        match path_spec.service {
            Service::GitHub | Service::ProjectBoard => {
                request = request
                    .header(header::ACCEPT, GITHUB_ACCEPT)
                    .header(GITHUB_API_VERSION_HEADER, GITHUB_API_VERSION);
                if let Some(token) = &self.lock_inner().github_token {
                    request = request.bearer_auth(token.expose_secret());
                }
            }
            Service::Auth | Service::Attendance | Service::CalendarSync => {
                #[cfg(target_arch = "wasm32")]
                {
                    request = request.fetch_credentials_include();
                }
            }
        }
        request
    }

    fn send_request_expect_json<F, T, U>(
        &self,
        path_spec: PathSpec,
        args: &T,
        ui_notify: F,
    ) -> ResponseReceiver<U>
    where
        T: serde::Serialize + Debug,
        F: UiCallBack,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
    {
        self.send_request_map_json(path_spec, args, std::convert::identity, ui_notify)
    }

    /// Like [`Self::send_request_expect_json`] but post processes the body
    /// before handing it to the UI
    fn send_request_map_json<F, T, U, V, M>(
        &self,
        path_spec: PathSpec,
        args: &T,
        map: M,
        ui_notify: F,
    ) -> ResponseReceiver<V>
    where
        T: serde::Serialize + Debug,
        F: UiCallBack,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
        V: Send + Debug + 'static,
        M: 'static + Send + FnOnce(U) -> V,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_json_body::<U>(resp).await.map(map);
            deliver(tx, msg);
            ui_notify();
        };
        self.initiate_request(path_spec, args, on_done);
        rx
    }

    fn send_request_expect_empty<F, T>(
        &self,
        path_spec: PathSpec,
        args: &T,
        ui_notify: F,
    ) -> ResponseReceiver<()>
    where
        T: serde::Serialize + Debug,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_empty(resp).await;
            deliver(tx, msg);
            ui_notify();
        };
        self.initiate_request(path_spec, args, on_done);
        rx
    }

    #[tracing::instrument(ret)]
    fn url_for(&self, path_spec: &PathSpec) -> String {
        format!(
            "{}{}",
            self.lock_inner().config.services.base_url(path_spec.service),
            path_spec.path()
        )
    }
}

/// Hands a result to the UI. The receiver is gone if the page that asked for
/// it was closed in the meantime, the result is dropped in that case.
fn deliver<T: Debug>(tx: oneshot::Sender<T>, msg: T) {
    if let Err(msg) = tx.send(msg) {
        debug!(?msg, "receiver dropped before the response arrived, discarding");
    }
}

/// For requests that can be answered without going to the network
fn respond_now<T: Debug, F: UiCallBack>(msg: T, ui_notify: F) -> oneshot::Receiver<T> {
    let (tx, rx) = oneshot::channel();
    deliver(tx, msg);
    ui_notify();
    rx
}

#[tracing::instrument(ret, err(Debug))]
async fn process_empty(
    response: reqwest::Result<reqwest::Response>,
) -> Result<(), RequestError> {
    let response = extract_response(response)?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(handle_error(response).await)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_json_body<T>(
    response: reqwest::Result<reqwest::Response>,
) -> Result<T, RequestError>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let response = extract_response(response)?;
    if response.status().is_success() {
        response
            .json()
            .await
            .map_err(|e| RequestError::Malformed(format!("failed to parse result as json: {e}")))
    } else {
        Err(handle_error(response).await)
    }
}

#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response) -> RequestError {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let body = log_err_as_warn!(response.text().await, "failed to get response body")
        .unwrap_or_default();
    RequestError::Status {
        status: status.as_u16(),
        body,
    }
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> Result<reqwest::Response, RequestError> {
    response.map_err(|err| {
        info!("Response is err: {err:#?}");
        map_reqwest_error(err)
    })
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::Timeout
    } else {
        RequestError::Transport(err.to_string())
    }
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{get_configuration, ServiceUrls};

    fn client_at(address: &str) -> Client {
        let mut config = get_configuration().unwrap();
        config.services = ServiceUrls::all_at(address);
        Client::new(config).unwrap()
    }

    #[test]
    fn starts_loading() {
        let client = client_at("http://localhost:1");
        assert!(client.session().loading);
    }

    #[test]
    fn login_url_encodes_return_path() {
        let client = client_at("http://localhost:1");
        let actual = client.login_url("http://localhost:8080/#/admin").unwrap();
        assert_eq!(
            actual.as_str(),
            "http://localhost:1/auth/login?redirect=http%3A%2F%2Flocalhost%3A8080%2F%23%2Fadmin"
        );
    }

    #[test]
    fn logout_url_returns_to_app_origin() {
        let client = client_at("http://localhost:1");
        let actual = client.logout_url().unwrap();
        assert_eq!(actual.path(), "/auth/logout");
        let pairs: Vec<(String, String)> = actual.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [("redirect".to_string(), "http://localhost:1".to_string())]
        );
    }

    #[test]
    fn stale_session_is_not_stored() {
        // Arrange
        let client = client_at("http://localhost:1");
        let stale_generation = {
            let mut inner = client.lock_inner();
            inner.session_generation += 2;
            inner.session_generation - 1
        };

        // Act
        let actual = client.store_session(stale_generation, Session::logged_out());

        // Assert
        assert!(actual.loading);
        assert!(client.session().loading);
    }

    #[test]
    fn clear_session_logs_out() {
        let client = client_at("http://localhost:1");
        client.clear_session();
        let actual = client.session();
        assert!(!actual.loading);
        assert!(!actual.is_logged_in());
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (tx, rx) = oneshot::channel::<u8>();
        drop(rx);
        deliver(tx, 1);
    }
}
