//! Method dispatch for the Codeforces API.
//!
//! # Design
//! `CodeforcesClient` holds a `ClientConfig` and a `Transport` and keeps no
//! other state between calls. A call is split the same way every time:
//! `build_request` validates and (if required) signs the arguments,
//! the transport performs exactly one GET, and `parse_response` classifies the
//! status and decodes the envelope. `call` composes the three; the typed
//! methods below are thin wrappers over `call` with one per registry entry.

use crate::auth;
use crate::config::ClientConfig;
use crate::decode::decode_envelope;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::params::{build_params, Args};
use crate::registry::{self, Descriptor};
use crate::types::{
    ApiResult, BlogEntry, Comment, Contest, ContestStandings, Hack, ProblemsetProblems,
    RatingChange, RecentAction, Submission, User,
};

/// Blocking client for the Codeforces API.
#[derive(Debug, Clone)]
pub struct CodeforcesClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl CodeforcesClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport)
    }
}

impl Default for CodeforcesClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> CodeforcesClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validate `args` for method `id` and produce the request to send.
    ///
    /// Signed endpoints get fresh `apiKey`, `time` and `apiSig` parameters.
    pub fn build_request(&self, id: &str, args: &Args) -> Result<HttpRequest, ApiError> {
        self.build_for(registry::lookup(id)?, args)
    }

    /// Classify `response` and decode its envelope into `R`.
    pub fn parse_response<R: ApiResult>(
        &self,
        id: &str,
        response: HttpResponse,
    ) -> Result<R, ApiError> {
        let descriptor = registry::lookup(id)?;
        check_shape::<R>(descriptor)?;
        check_status(descriptor, &response)?;
        decode_envelope(&response.body)
    }

    /// Build, send and decode one call to method `id`.
    pub fn call<R: ApiResult>(&self, id: &str, args: &Args) -> Result<R, ApiError> {
        let result = registry::lookup(id).and_then(|descriptor| self.dispatch(descriptor, args));
        if let Err(err) = &result {
            tracing::warn!(method = id, error = %err, "api call failed");
        }
        result
    }

    fn dispatch<R: ApiResult>(&self, descriptor: &Descriptor, args: &Args) -> Result<R, ApiError> {
        check_shape::<R>(descriptor)?;
        let request = self.build_for(descriptor, args)?;
        let response = self.transport.execute(&request)?;
        check_status(descriptor, &response)?;
        decode_envelope(&response.body)
    }

    fn build_for(&self, descriptor: &Descriptor, args: &Args) -> Result<HttpRequest, ApiError> {
        let mut query = build_params(descriptor, args)?;
        if descriptor.requires_auth {
            let credentials = self
                .config
                .credentials
                .as_ref()
                .ok_or(ApiError::MissingCredentials {
                    method: descriptor.name,
                })?;
            auth::sign(descriptor.name, &mut query, credentials);
        }

        let request = HttpRequest {
            endpoint: descriptor.name.to_string(),
            url: descriptor.url(self.config.base_url.as_deref()),
            query,
            timeout: self.config.timeout.unwrap_or(descriptor.timeout),
        };
        tracing::debug!(
            method = descriptor.name,
            url = %request.url,
            params = request.query.len(),
            signed = descriptor.requires_auth,
            "dispatching api request"
        );
        Ok(request)
    }

    // -----------------------------------------------------------------------
    // Typed operations
    // -----------------------------------------------------------------------

    pub fn get_blog_entry_comments(&self, blog_entry_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.call(
            "getBlogEntryComments",
            &Args::new().set("blogEntryId", blog_entry_id),
        )
    }

    pub fn get_blog_entry_view(&self, blog_entry_id: i64) -> Result<BlogEntry, ApiError> {
        self.call("getBlogEntryView", &Args::new().set("blogEntryId", blog_entry_id))
    }

    pub fn get_contest_hacks(
        &self,
        contest_id: i64,
        as_manager: Option<bool>,
    ) -> Result<Vec<Hack>, ApiError> {
        self.call(
            "getContestHacks",
            &Args::new()
                .set("contestId", contest_id)
                .set_opt("asManager", as_manager),
        )
    }

    pub fn get_contest_list(&self, gym: Option<bool>) -> Result<Vec<Contest>, ApiError> {
        self.call("getContestList", &Args::new().set_opt("gym", gym))
    }

    pub fn get_contest_rating_changes(
        &self,
        contest_id: i64,
    ) -> Result<Vec<RatingChange>, ApiError> {
        self.call(
            "getContestRatingChanges",
            &Args::new().set("contestId", contest_id),
        )
    }

    pub fn get_contest_standings(
        &self,
        query: &StandingsQuery,
    ) -> Result<ContestStandings, ApiError> {
        self.call("getContestStandings", &query.to_args())
    }

    pub fn get_contest_status(
        &self,
        contest_id: i64,
        handle: Option<&str>,
        from: Option<i64>,
        count: Option<i64>,
        as_manager: Option<bool>,
    ) -> Result<Vec<Submission>, ApiError> {
        self.call(
            "getContestStatus",
            &Args::new()
                .set("contestId", contest_id)
                .set_opt("asManager", as_manager)
                .set_opt("handle", handle)
                .set_opt("from", from)
                .set_opt("count", count),
        )
    }

    pub fn get_problemset_problems<S: AsRef<str>>(
        &self,
        tags: &[S],
        problemset_name: Option<&str>,
    ) -> Result<ProblemsetProblems, ApiError> {
        self.call(
            "getProblemsetProblems",
            &Args::new()
                .set("tags", tags)
                .set_opt("problemsetName", problemset_name),
        )
    }

    pub fn get_problemset_recent_status(
        &self,
        count: i64,
        problemset_name: Option<&str>,
    ) -> Result<Vec<Submission>, ApiError> {
        self.call(
            "getProblemsetRecentStatus",
            &Args::new()
                .set("count", count)
                .set_opt("problemsetName", problemset_name),
        )
    }

    pub fn get_recent_actions(&self, max_count: i64) -> Result<Vec<RecentAction>, ApiError> {
        self.call("getRecentActions", &Args::new().set("maxCount", max_count))
    }

    pub fn get_user_blog_entries(&self, handle: &str) -> Result<Vec<BlogEntry>, ApiError> {
        self.call("getUserBlogEntries", &Args::new().set("handle", handle))
    }

    /// Handles of the authenticated user's friends. Requires credentials.
    pub fn get_user_friends(&self, only_online: Option<bool>) -> Result<Vec<String>, ApiError> {
        self.call(
            "getUserFriends",
            &Args::new().set_opt("onlyOnline", only_online),
        )
    }

    pub fn get_user_info<S: AsRef<str>>(&self, handles: &[S]) -> Result<Vec<User>, ApiError> {
        self.call("getUserInfo", &Args::new().set("handles", handles))
    }

    pub fn get_user_rated_list(
        &self,
        active_only: Option<bool>,
        include_retired: Option<bool>,
        contest_id: Option<i64>,
    ) -> Result<Vec<User>, ApiError> {
        self.call(
            "getUserRatedList",
            &Args::new()
                .set_opt("activeOnly", active_only)
                .set_opt("includeRetired", include_retired)
                .set_opt("contestId", contest_id),
        )
    }

    pub fn get_user_rating(&self, handle: &str) -> Result<Vec<RatingChange>, ApiError> {
        self.call("getUserRating", &Args::new().set("handle", handle))
    }

    pub fn get_user_status(
        &self,
        handle: &str,
        from: Option<i64>,
        count: Option<i64>,
    ) -> Result<Vec<Submission>, ApiError> {
        self.call(
            "getUserStatus",
            &Args::new()
                .set("handle", handle)
                .set_opt("from", from)
                .set_opt("count", count),
        )
    }
}

/// Arguments of `contest.standings`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingsQuery {
    pub contest_id: i64,
    pub as_manager: Option<bool>,
    pub from: Option<i64>,
    pub count: Option<i64>,
    pub handles: Vec<String>,
    pub room: Option<i64>,
    pub show_unofficial: Option<bool>,
}

impl StandingsQuery {
    pub fn new(contest_id: i64) -> Self {
        Self {
            contest_id,
            ..Self::default()
        }
    }

    /// Rows `from..from + count`, 1-based.
    pub fn page(mut self, from: i64, count: i64) -> Self {
        self.from = Some(from);
        self.count = Some(count);
        self
    }

    pub fn handles<S: AsRef<str>>(mut self, handles: &[S]) -> Self {
        self.handles = handles.iter().map(|h| h.as_ref().to_string()).collect();
        self
    }

    pub fn room(mut self, room: i64) -> Self {
        self.room = Some(room);
        self
    }

    pub fn show_unofficial(mut self, show: bool) -> Self {
        self.show_unofficial = Some(show);
        self
    }

    fn to_args(&self) -> Args {
        Args::new()
            .set("contestId", self.contest_id)
            .set_opt("asManager", self.as_manager)
            .set_opt("from", self.from)
            .set_opt("count", self.count)
            .set("handles", self.handles.clone())
            .set_opt("room", self.room)
            .set_opt("showUnofficial", self.show_unofficial)
    }
}

fn check_shape<R: ApiResult>(descriptor: &Descriptor) -> Result<(), ApiError> {
    if descriptor.result != R::SHAPE {
        return Err(ApiError::ResultShapeMismatch {
            method: descriptor.name,
            declared: descriptor.result,
            requested: R::SHAPE,
        });
    }
    Ok(())
}

/// Anything but 200 is an `Http` failure, FAILED envelope or not.
fn check_status(descriptor: &Descriptor, response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::Http {
        method: descriptor.name.to_string(),
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    use super::*;
    use crate::auth::{Credentials, NONCE_LEN};
    use crate::registry::{ResultShape, DEFAULT_TIMEOUT};

    const BASE_URL: &str = "http://localhost:3000/api";

    fn config() -> ClientConfig {
        ClientConfig::default().with_base_url(BASE_URL)
    }

    fn ok(body: &str) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    #[test]
    fn build_user_info_request() {
        let client = CodeforcesClient::new(config());
        let req = client
            .build_request("getUserInfo", &Args::new().set("handles", &["tourist", "Petr"][..]))
            .unwrap();
        assert_eq!(req.endpoint, "user.info");
        assert_eq!(req.url, "http://localhost:3000/api/user.info");
        assert_eq!(req.query, vec![("handles".to_string(), "tourist;Petr".to_string())]);
        assert_eq!(req.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn default_config_targets_public_api() {
        let client = CodeforcesClient::default();
        let req = client.build_request("getContestList", &Args::new()).unwrap();
        assert_eq!(req.url, "https://codeforces.com/api/contest.list");
        assert!(req.query.is_empty());
    }

    #[test]
    fn timeout_override_applies() {
        let client = CodeforcesClient::new(config().with_timeout(Duration::from_millis(250)));
        let req = client.build_request("getContestList", &Args::new()).unwrap();
        assert_eq!(req.timeout, Duration::from_millis(250));
    }

    #[test]
    fn signed_request_carries_valid_signature() {
        let client = CodeforcesClient::new(config().with_credentials(Credentials::new("K", "S")));
        let req = client
            .build_request("getUserFriends", &Args::new().set("onlyOnline", true))
            .unwrap();
        let names: Vec<_> = req.query.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["onlyOnline", "apiKey", "time", "apiSig"]);

        let sig = req.query_value("apiSig").unwrap();
        let (nonce, _) = sig.split_at(NONCE_LEN);
        let unsigned = &req.query[..req.query.len() - 1];
        assert_eq!(auth::signature("user.friends", unsigned, "S", nonce), sig);
    }

    #[test]
    fn signatures_differ_between_calls() {
        let client = CodeforcesClient::new(config().with_credentials(Credentials::new("K", "S")));
        let a = client.build_request("getUserFriends", &Args::new()).unwrap();
        let b = client.build_request("getUserFriends", &Args::new()).unwrap();
        assert_ne!(a.query_value("apiSig"), b.query_value("apiSig"));
    }

    #[test]
    fn missing_credentials_never_reach_transport() {
        let sent = Cell::new(false);
        let client = CodeforcesClient::with_transport(config(), |_: &HttpRequest| {
            sent.set(true);
            ok(r#"{"status":"OK","result":[]}"#)
        });
        let err = client.get_user_friends(None).unwrap_err();
        assert!(matches!(err, ApiError::MissingCredentials { method: "user.friends" }));
        assert!(!sent.get());
    }

    #[test]
    fn invalid_parameters_never_reach_transport() {
        let sent = Cell::new(false);
        let client = CodeforcesClient::with_transport(config(), |_: &HttpRequest| {
            sent.set(true);
            ok(r#"{"status":"OK","result":[]}"#)
        });
        let err = client
            .call::<Vec<Contest>>("getContestList", &Args::new().set("gym", 1))
            .unwrap_err();
        assert!(matches!(err, ApiError::ParameterValidation { .. }));
        assert!(err.is_pre_network());
        assert!(!sent.get());
    }

    #[test]
    fn unknown_method_is_reported() {
        let client = CodeforcesClient::new(config());
        let err = client.call::<Vec<User>>("getUserSecrets", &Args::new()).unwrap_err();
        assert!(matches!(err, ApiError::UnknownMethod { .. }));
    }

    #[test]
    fn result_shape_mismatch_is_reported() {
        let client = CodeforcesClient::new(config());
        let err = client
            .call::<Vec<Contest>>("getUserInfo", &Args::new().set("handles", &["x"][..]))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::ResultShapeMismatch {
                declared: ResultShape::Users,
                requested: ResultShape::Contests,
                ..
            }
        ));
    }

    #[test]
    fn call_sends_one_request_and_decodes() {
        let seen = RefCell::new(Vec::new());
        let client = CodeforcesClient::with_transport(
            config().with_credentials(Credentials::new("K", "S")),
            |req: &HttpRequest| {
                seen.borrow_mut().push(req.clone());
                ok(r#"{"status":"OK","result":["Petr","tourist"]}"#)
            },
        );
        let friends = client.get_user_friends(Some(false)).unwrap();
        assert_eq!(friends, vec!["Petr", "tourist"]);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].query_value("onlyOnline"), Some("False"));
    }

    #[test]
    fn failed_envelope_becomes_api_failure() {
        let client = CodeforcesClient::with_transport(config(), |_: &HttpRequest| {
            ok(r#"{"status":"FAILED","comment":"handle: User with handle nobody not found"}"#)
        });
        let err = client.get_user_rating("nobody").unwrap_err();
        assert_eq!(
            err.comment().as_deref(),
            Some("handle: User with handle nobody not found")
        );
        assert!(matches!(err, ApiError::Api { .. }));
    }

    #[test]
    fn non_200_becomes_http_failure() {
        let client = CodeforcesClient::with_transport(config(), |_: &HttpRequest| {
            Ok::<_, ApiError>(HttpResponse {
                status: 503,
                body: "maintenance".to_string(),
            })
        });
        let err = client.get_contest_list(None).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 503, ref body, .. } if body == "maintenance"));
    }

    #[test]
    fn transport_failure_propagates() {
        let client = CodeforcesClient::with_transport(config(), |req: &HttpRequest| {
            Err::<HttpResponse, _>(ApiError::Timeout {
                method: req.endpoint.clone(),
                timeout: req.timeout,
            })
        });
        let err = client.get_recent_actions(10).unwrap_err();
        assert!(matches!(err, ApiError::Timeout { ref method, .. } if method == "recentActions"));
    }

    #[test]
    fn parse_response_checks_status_then_envelope() {
        let client = CodeforcesClient::new(config());
        let handles: Vec<String> = client
            .parse_response(
                "getUserFriends",
                HttpResponse {
                    status: 200,
                    body: r#"{"status":"OK","result":[]}"#.to_string(),
                },
            )
            .unwrap();
        assert!(handles.is_empty());

        let err = client
            .parse_response::<Vec<String>>(
                "getUserFriends",
                HttpResponse {
                    status: 400,
                    body: r#"{"status":"FAILED","comment":"apiKey: Incorrect API key"}"#
                        .to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 400, .. }));
        assert_eq!(err.comment().as_deref(), Some("apiKey: Incorrect API key"));
    }

    #[test]
    fn standings_query_renders_in_schema_order() {
        let client = CodeforcesClient::new(config());
        let query = StandingsQuery::new(566)
            .page(1, 5)
            .handles(&["tourist", "Petr"])
            .show_unofficial(true);
        let req = client
            .build_request("getContestStandings", &query.to_args())
            .unwrap();
        let rendered: Vec<_> = req
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "contestId=566",
                "from=1",
                "count=5",
                "handles=tourist;Petr",
                "showUnofficial=True",
            ]
        );
    }
}
