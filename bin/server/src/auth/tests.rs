//! End-to-end tests of the gateway middleware against a fake identity provider.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use login_gate_access::{
    AccessPolicy, EmailAllowlist, PolicyConfig, Provider, ProviderConfig, Session, TokenResponse,
    UserInfo, encode_session,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use super::cookies::{NONCE_COOKIE, ORIGIN_COOKIE, SESSION_COOKIE, STATE_COOKIE, VERIFIER_COOKIE};
use super::{GatewayState, IdentityProvider, IdpError};
use crate::config::SessionConfig;

const AUTH_CODE: &str = "auth-code-1";
const ACCESS_TOKEN: &str = "access-123";
const CALLBACK_PATH: &str = "/auth/callback";
const AUTHORIZE_URL: &str = "https://idp.example.com/authorize";

/// What the fake provider saw in the authorization request.
#[derive(Debug, Clone)]
struct AuthorizationRequest {
    code_challenge: String,
    nonce: String,
}

/// Identity provider that checks PKCE the way a real one does.
struct FakeIdp {
    email: String,
    nonce_override: Option<String>,
    fail_user_info: bool,
    authorized: Mutex<Option<AuthorizationRequest>>,
    exchanges: AtomicUsize,
}

impl FakeIdp {
    fn for_email(email: &str) -> Self {
        Self {
            email: email.to_string(),
            nonce_override: None,
            fail_user_info: false,
            authorized: Mutex::new(None),
            exchanges: AtomicUsize::new(0),
        }
    }

    /// Records the authorization request and returns its `state`.
    fn authorize(&self, authorization_url: &str) -> String {
        let url = url::Url::parse(authorization_url).expect("authorization url");
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        *self.authorized.lock().unwrap() = Some(AuthorizationRequest {
            code_challenge: query["code_challenge"].clone(),
            nonce: query["nonce"].clone(),
        });
        query["state"].clone()
    }

    fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

fn identity_token(nonce: &str) -> String {
    let claims = serde_json::json!({
        "iss": "https://idp.example.com",
        "sub": "user-1",
        "nonce": nonce,
    });
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

#[async_trait]
impl IdentityProvider for FakeIdp {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> login_gate_core::Result<TokenResponse, IdpError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        let invalid_grant = || -> login_gate_core::Result<TokenResponse, IdpError> {
            Err(IdpError::TokenExchangeFailed {
                details: "invalid_grant".to_string(),
            }
            .into())
        };

        let Some(request) = self.authorized.lock().unwrap().clone() else {
            return invalid_grant();
        };
        if code != AUTH_CODE
            || login_gate_core::pkce_challenge(code_verifier) != request.code_challenge
        {
            return invalid_grant();
        }

        let nonce = self.nonce_override.clone().unwrap_or(request.nonce);
        Ok(TokenResponse {
            access_token: ACCESS_TOKEN.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 900,
            id_token: identity_token(&nonce),
        })
    }

    async fn fetch_user_info(
        &self,
        access_token: &str,
        token_type: &str,
    ) -> login_gate_core::Result<UserInfo, IdpError> {
        if self.fail_user_info || access_token != ACCESS_TOKEN || token_type != "Bearer" {
            return Err(IdpError::UserInfoFetchFailed {
                details: "401 Unauthorized".to_string(),
            }
            .into());
        }
        Ok(UserInfo {
            sub: "user-1".to_string(),
            iss: "https://idp.example.com".to_string(),
            email: self.email.clone(),
            email_verified: true,
        })
    }
}

/// Cookie store that behaves like a browser for a single origin.
#[derive(Debug, Default)]
struct Browser {
    cookies: HashMap<String, String>,
}

impl Browser {
    fn absorb(&mut self, response: &Response) {
        for raw in response.headers().get_all(header::SET_COOKIE) {
            let raw = raw.to_str().expect("ascii set-cookie");
            let cookie = Cookie::parse_encoded(raw.to_owned()).expect("set-cookie");
            if cookie.max_age() == Some(time::Duration::ZERO) {
                self.cookies.remove(cookie.name());
            } else {
                let pair = raw.split(';').next().unwrap_or_default().to_string();
                self.cookies.insert(cookie.name().to_string(), pair);
            }
        }
    }

    fn insert(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), format!("{name}={value}"));
    }

    fn has(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    fn header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(self.cookies.values().cloned().collect::<Vec<_>>().join("; "))
    }
}

fn set_cookies(response: &Response) -> HashMap<String, Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| Cookie::parse_encoded(v.to_owned()).ok())
        .map(|c| (c.name().to_string(), c))
        .collect()
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
        .to_string()
}

fn is_expired(cookies: &HashMap<String, Cookie<'static>>, name: &str) -> bool {
    cookies
        .get(name)
        .is_some_and(|c| c.max_age() == Some(time::Duration::ZERO))
}

fn sets_session(cookies: &HashMap<String, Cookie<'static>>) -> bool {
    cookies
        .get(SESSION_COOKIE)
        .is_some_and(|c| !c.value().is_empty() && c.max_age() != Some(time::Duration::ZERO))
}

struct Gateway {
    app: Router,
    key: Key,
    idp: Arc<FakeIdp>,
    upstream_hits: Arc<AtomicUsize>,
}

impl Gateway {
    fn new(idp: FakeIdp) -> Self {
        let idp = Arc::new(idp);
        let provider = Provider::new(ProviderConfig {
            auth_url: AUTHORIZE_URL.to_string(),
            token_url: "https://idp.example.com/token".to_string(),
            userinfo_url: "https://idp.example.com/userinfo".to_string(),
            ..ProviderConfig::new(
                "client-1".to_string(),
                format!("https://app.example.com{CALLBACK_PATH}"),
                "http://idmanagement.gov/ns/assurance/loa/1".to_string(),
            )
        })
        .expect("valid provider");
        let policy = AccessPolicy::from_config(
            &PolicyConfig {
                auth_required: "/protected".to_string(),
                whitelist: "/protected/public/*".to_string(),
            },
            EmailAllowlist::new(["a@example.com"]),
        );
        let session_config = SessionConfig {
            secure_cookies: false,
            ..SessionConfig::default()
        };
        let key = Key::generate();
        let state = Arc::new(GatewayState::new(
            provider,
            policy,
            idp.clone(),
            key.clone(),
            &session_config,
        ));

        let upstream_hits = Arc::new(AtomicUsize::new(0));
        let counter = upstream_hits.clone();
        let upstream = Router::new().fallback(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                "upstream"
            }
        });

        Self {
            app: crate::protect(upstream, state),
            key,
            idp,
            upstream_hits,
        }
    }

    async fn get(&self, uri: &str, browser: &Browser) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookies) = browser.header() {
            request = request.header(header::COOKIE, cookies);
        }
        self.app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Runs login and the provider round trip, returning the callback response.
    async fn sign_in(&self, browser: &mut Browser) -> Response {
        let login = self.get("/login", browser).await;
        assert_eq!(login.status(), StatusCode::SEE_OTHER);
        browser.absorb(&login);

        let state = self.idp.authorize(&location(&login));
        let callback = self
            .get(
                &format!("{CALLBACK_PATH}?code={AUTH_CODE}&state={state}"),
                browser,
            )
            .await;
        browser.absorb(&callback);
        callback
    }

    /// Returns the verified value of a cookie set by `response`.
    fn signed_value(&self, response: &Response, name: &str) -> Option<String> {
        let mut browser = Browser::default();
        browser.absorb(response);
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, browser.header()?.parse().unwrap());
        SignedCookieJar::from_headers(&headers, self.key.clone())
            .get(name)
            .map(|cookie| cookie.value().to_string())
    }

    /// Stores a cookie signed with the gateway's own key.
    fn plant_signed(&self, browser: &mut Browser, name: &'static str, value: &str) {
        let jar = SignedCookieJar::new(self.key.clone()).add(Cookie::new(name, value.to_string()));
        browser.absorb(&jar.into_response());
    }

    fn upstream_hits(&self) -> usize {
        self.upstream_hits.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn unprotected_paths_pass_through() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));

    let response = gateway.get("/", &Browser::default()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(gateway.upstream_hits(), 1);
}

#[tokio::test]
async fn anonymous_request_to_protected_path_redirects_to_login() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));

    let response = gateway.get("/protected", &Browser::default()).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login");
    assert_eq!(
        gateway.signed_value(&response, ORIGIN_COOKIE),
        Some("/protected".to_string())
    );
    assert_eq!(gateway.upstream_hits(), 0);
}

#[tokio::test]
async fn login_redirects_to_provider_with_fresh_parameters() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let browser = Browser::default();

    let first = gateway.get("/login", &browser).await;
    let second = gateway.get("/login", &browser).await;

    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    let first_url = url::Url::parse(&location(&first)).expect("url");
    let second_url = url::Url::parse(&location(&second)).expect("url");
    assert!(first_url.as_str().starts_with(AUTHORIZE_URL));

    let first_query: HashMap<String, String> = first_url.query_pairs().into_owned().collect();
    let second_query: HashMap<String, String> = second_url.query_pairs().into_owned().collect();
    assert_eq!(first_query["response_type"], "code");
    assert_eq!(first_query["client_id"], "client-1");
    assert_eq!(first_query["scope"], "openid email");
    assert_eq!(
        first_query["redirect_uri"],
        format!("https://app.example.com{CALLBACK_PATH}")
    );
    assert_eq!(first_query["code_challenge_method"], "S256");
    assert_ne!(first_query["state"], second_query["state"]);
    assert_ne!(first_query["code_challenge"], second_query["code_challenge"]);
    assert_ne!(first_query["nonce"], second_query["nonce"]);

    let cookies = set_cookies(&first);
    for name in [STATE_COOKIE, VERIFIER_COOKIE, NONCE_COOKIE] {
        let cookie = &cookies[name];
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
        assert_ne!(cookie.http_only(), Some(true));
        assert!(!cookie.value().contains(&first_query["state"]));
    }
    assert_eq!(gateway.upstream_hits(), 0);
}

#[tokio::test]
async fn successful_callback_sets_session_and_redirects_home() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();

    let callback = gateway.sign_in(&mut browser).await;

    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "/");
    let cookies = set_cookies(&callback);
    assert!(sets_session(&cookies));
    assert!(is_expired(&cookies, STATE_COOKIE));
    assert!(is_expired(&cookies, VERIFIER_COOKIE));
    assert!(is_expired(&cookies, NONCE_COOKIE));
    assert_eq!(gateway.upstream_hits(), 0);

    let protected = gateway.get("/protected/report", &browser).await;
    assert_eq!(protected.status(), StatusCode::OK);
    assert_eq!(gateway.upstream_hits(), 1);
}

#[tokio::test]
async fn callback_returns_to_recorded_origin() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();

    let gated = gateway.get("/protected/report?tab=2", &browser).await;
    browser.absorb(&gated);
    let callback = gateway.sign_in(&mut browser).await;

    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "/protected/report?tab=2");
    assert!(is_expired(&set_cookies(&callback), ORIGIN_COOKIE));
    assert!(!browser.has(ORIGIN_COOKIE));
}

#[tokio::test]
async fn remote_origin_is_ignored_after_callback() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();
    browser.insert(ORIGIN_COOKIE, "//evil.example.com/phish");

    let callback = gateway.sign_in(&mut browser).await;

    assert_eq!(location(&callback), "/");
}

#[tokio::test]
async fn unsigned_origin_is_ignored_after_callback() {
    for forged in ["/%09/evil.example.com/phish", "/%0Aevil", "/reports"] {
        let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
        let mut browser = Browser::default();
        browser.insert(ORIGIN_COOKIE, forged);

        let callback = gateway.sign_in(&mut browser).await;

        assert_eq!(callback.status(), StatusCode::SEE_OTHER, "origin {forged}");
        assert_eq!(location(&callback), "/", "origin {forged}");
        assert!(sets_session(&set_cookies(&callback)));
    }
}

#[tokio::test]
async fn signed_origin_with_control_characters_is_ignored() {
    for target in ["/\t/evil.example.com/phish", "/\nevil", "/\\evil.example.com"] {
        let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
        let mut browser = Browser::default();
        gateway.plant_signed(&mut browser, ORIGIN_COOKIE, target);

        let callback = gateway.sign_in(&mut browser).await;

        assert_eq!(callback.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&callback), "/");
        assert!(sets_session(&set_cookies(&callback)));
    }
}

#[tokio::test]
async fn session_without_allowlisted_email_is_forbidden() {
    let gateway = Gateway::new(FakeIdp::for_email("x@evil.com"));
    let mut browser = Browser::default();

    let callback = gateway.sign_in(&mut browser).await;
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert!(browser.has(SESSION_COOKIE));

    let response = gateway.get("/protected", &browser).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(gateway.upstream_hits(), 0);
}

#[tokio::test]
async fn whitelisted_paths_pass_regardless_of_session() {
    let gateway = Gateway::new(FakeIdp::for_email("x@evil.com"));
    let mut browser = Browser::default();

    let anonymous = gateway.get("/protected/public/logo.png", &browser).await;
    assert_eq!(anonymous.status(), StatusCode::OK);

    gateway.sign_in(&mut browser).await;
    let outsider = gateway.get("/protected/public/logo.png", &browser).await;
    assert_eq!(outsider.status(), StatusCode::OK);
    assert_eq!(gateway.upstream_hits(), 2);
}

#[tokio::test]
async fn logout_clears_core_cookies_and_forwards() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();
    gateway.sign_in(&mut browser).await;

    let logout = gateway.get("/logout", &browser).await;

    assert_eq!(logout.status(), StatusCode::OK);
    assert_eq!(gateway.upstream_hits(), 1);
    let cookies = set_cookies(&logout);
    for name in [SESSION_COOKIE, STATE_COOKIE, VERIFIER_COOKIE, NONCE_COOKIE] {
        assert!(is_expired(&cookies, name), "{name} not cleared");
    }

    browser.absorb(&logout);
    let protected = gateway.get("/protected", &browser).await;
    assert_eq!(protected.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn logout_without_session_is_harmless() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();

    let logout = gateway.get("/logout", &browser).await;
    browser.absorb(&logout);

    assert_eq!(logout.status(), StatusCode::OK);
    assert!(is_expired(&set_cookies(&logout), SESSION_COOKIE));
    assert!(!browser.has(SESSION_COOKIE));
    assert_eq!(gateway.upstream_hits(), 1);
}

#[tokio::test]
async fn state_mismatch_never_creates_session() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();
    let login = gateway.get("/login", &browser).await;
    browser.absorb(&login);
    let state = gateway.idp.authorize(&location(&login));

    let forged = gateway
        .get(
            &format!("{CALLBACK_PATH}?code={AUTH_CODE}&state=forged"),
            &browser,
        )
        .await;

    assert_eq!(forged.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let cookies = set_cookies(&forged);
    assert!(!sets_session(&cookies));
    assert!(is_expired(&cookies, STATE_COOKIE));
    assert!(is_expired(&cookies, VERIFIER_COOKIE));
    assert_eq!(gateway.idp.exchanges(), 0);

    // The pending login is spent; the genuine state no longer works.
    browser.absorb(&forged);
    let replay = gateway
        .get(
            &format!("{CALLBACK_PATH}?code={AUTH_CODE}&state={state}"),
            &browser,
        )
        .await;
    assert_eq!(replay.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!sets_session(&set_cookies(&replay)));
    assert_eq!(gateway.idp.exchanges(), 0);
}

#[tokio::test]
async fn verifier_from_another_login_fails_pkce() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();

    // The provider sees the first login; the browser keeps the second.
    let first = gateway.get("/login", &browser).await;
    gateway.idp.authorize(&location(&first));
    let second = gateway.get("/login", &browser).await;
    browser.absorb(&second);
    let second_state = url::Url::parse(&location(&second))
        .expect("url")
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .expect("state");

    let callback = gateway
        .get(
            &format!("{CALLBACK_PATH}?code={AUTH_CODE}&state={second_state}"),
            &browser,
        )
        .await;

    assert_eq!(callback.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!sets_session(&set_cookies(&callback)));
    assert_eq!(gateway.idp.exchanges(), 1);
}

#[tokio::test]
async fn provider_denial_is_reported_without_exchange() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();
    let login = gateway.get("/login", &browser).await;
    browser.absorb(&login);
    let state = gateway.idp.authorize(&location(&login));

    let callback = gateway
        .get(
            &format!("{CALLBACK_PATH}?error=access_denied&state={state}"),
            &browser,
        )
        .await;

    assert_eq!(callback.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(gateway.idp.exchanges(), 0);
}

#[tokio::test]
async fn callback_without_pending_cookies_fails() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));

    let callback = gateway
        .get(
            &format!("{CALLBACK_PATH}?code={AUTH_CODE}&state=abc"),
            &Browser::default(),
        )
        .await;

    assert_eq!(callback.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(gateway.idp.exchanges(), 0);
}

#[tokio::test]
async fn callback_without_state_fails() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();
    let login = gateway.get("/login", &browser).await;
    browser.absorb(&login);

    let callback = gateway
        .get(&format!("{CALLBACK_PATH}?code={AUTH_CODE}"), &browser)
        .await;

    assert_eq!(callback.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(gateway.idp.exchanges(), 0);
}

#[tokio::test]
async fn nonce_mismatch_rejects_callback() {
    let gateway = Gateway::new(FakeIdp {
        nonce_override: Some("replayed-nonce".to_string()),
        ..FakeIdp::for_email("a@example.com")
    });
    let mut browser = Browser::default();

    let callback = gateway.sign_in(&mut browser).await;

    assert_eq!(callback.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!browser.has(SESSION_COOKIE));
    assert_eq!(gateway.idp.exchanges(), 1);
}

#[tokio::test]
async fn user_info_failure_rejects_callback() {
    let gateway = Gateway::new(FakeIdp {
        fail_user_info: true,
        ..FakeIdp::for_email("a@example.com")
    });
    let mut browser = Browser::default();

    let callback = gateway.sign_in(&mut browser).await;

    assert_eq!(callback.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!browser.has(SESSION_COOKIE));
}

#[tokio::test]
async fn corrupted_session_cookie_is_treated_as_anonymous() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();
    browser.insert(SESSION_COOKIE, "%%%not-a-session");

    let response = gateway.get("/protected", &browser).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(gateway.upstream_hits(), 0);
}

#[tokio::test]
async fn forged_unsigned_session_is_treated_as_anonymous() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let forged = encode_session(&Session::new(
        "user-1".to_string(),
        "https://idp.example.com".to_string(),
        "a@example.com".to_string(),
        "h.p.s".to_string(),
        900,
    ));
    let mut browser = Browser::default();
    browser.insert(SESSION_COOKIE, &forged.replace('=', "%3D"));

    let response = gateway.get("/protected", &browser).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(gateway.upstream_hits(), 0);
}

#[tokio::test]
async fn truncated_signed_session_is_treated_as_anonymous() {
    let gateway = Gateway::new(FakeIdp::for_email("a@example.com"));
    let mut browser = Browser::default();
    gateway.sign_in(&mut browser).await;

    let pair = browser.cookies[SESSION_COOKIE].clone();
    let truncated = &pair[..pair.len() - 8];
    browser
        .cookies
        .insert(SESSION_COOKIE.to_string(), truncated.to_string());

    let response = gateway.get("/protected", &browser).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(gateway.upstream_hits(), 0);
}

#[test]
fn identity_token_fixture_carries_nonce() {
    let token = identity_token("n-1");
    assert_eq!(
        login_gate_access::identity_token_nonce(&token),
        Some("n-1".to_string())
    );
}
