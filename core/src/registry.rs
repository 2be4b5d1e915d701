//! Static endpoint descriptors.
//!
//! # Design
//! Every supported endpoint is declared once in `REGISTRY`: its wire name,
//! parameter schema, result shape and transport settings. The table is a
//! `static` slice, so it is built at compile time, never mutated and safe to
//! read from any number of threads.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://codeforces.com/api";

/// Per-call timeout used unless a descriptor or the client config overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(9010);

/// Kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Bool,
    Str,
    /// Sent as its elements joined by `;`.
    List,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Int => "an integer",
            ParamKind::Bool => "a boolean",
            ParamKind::Str => "a string",
            ParamKind::List => "a list of strings",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

const fn req(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: true,
    }
}

const fn opt(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: false,
    }
}

/// Tag naming the shape `result` must decode into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Comments,
    BlogEntry,
    BlogEntries,
    Hacks,
    Contests,
    RatingChanges,
    Standings,
    Submissions,
    ProblemsetProblems,
    RecentActions,
    Handles,
    Users,
}

/// Immutable definition of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptor {
    /// Friendly identifier used for lookup, e.g. `getUserInfo`.
    pub id: &'static str,
    /// Wire method name, e.g. `user.info`.
    pub name: &'static str,
    pub params: &'static [ParamSpec],
    pub result: ResultShape,
    pub base_url: &'static str,
    pub timeout: Duration,
    pub requires_auth: bool,
}

impl Descriptor {
    const fn public(
        id: &'static str,
        name: &'static str,
        params: &'static [ParamSpec],
        result: ResultShape,
    ) -> Self {
        Descriptor {
            id,
            name,
            params,
            result,
            base_url: DEFAULT_BASE_URL,
            timeout: DEFAULT_TIMEOUT,
            requires_auth: false,
        }
    }

    const fn authenticated(self) -> Self {
        Descriptor {
            requires_auth: true,
            ..self
        }
    }

    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    /// `{base_url}/{name}` with any trailing slash on the base removed.
    pub fn url(&self, base_url: Option<&str>) -> String {
        let base = base_url.unwrap_or(self.base_url).trim_end_matches('/');
        format!("{base}/{}", self.name)
    }
}

use ParamKind::{Bool, Int, List, Str};

pub static REGISTRY: &[Descriptor] = &[
    Descriptor::public(
        "getBlogEntryComments",
        "blogEntry.comments",
        &[req("blogEntryId", Int)],
        ResultShape::Comments,
    ),
    Descriptor::public(
        "getBlogEntryView",
        "blogEntry.view",
        &[req("blogEntryId", Int)],
        ResultShape::BlogEntry,
    ),
    Descriptor::public(
        "getContestHacks",
        "contest.hacks",
        &[req("contestId", Int), opt("asManager", Bool)],
        ResultShape::Hacks,
    ),
    Descriptor::public(
        "getContestList",
        "contest.list",
        &[opt("gym", Bool)],
        ResultShape::Contests,
    ),
    Descriptor::public(
        "getContestRatingChanges",
        "contest.ratingChanges",
        &[req("contestId", Int)],
        ResultShape::RatingChanges,
    ),
    Descriptor::public(
        "getContestStandings",
        "contest.standings",
        &[
            req("contestId", Int),
            opt("asManager", Bool),
            opt("from", Int),
            opt("count", Int),
            opt("handles", List),
            opt("room", Int),
            opt("showUnofficial", Bool),
        ],
        ResultShape::Standings,
    ),
    Descriptor::public(
        "getContestStatus",
        "contest.status",
        &[
            req("contestId", Int),
            opt("asManager", Bool),
            opt("handle", Str),
            opt("from", Int),
            opt("count", Int),
        ],
        ResultShape::Submissions,
    ),
    Descriptor::public(
        "getProblemsetProblems",
        "problemset.problems",
        &[opt("tags", List), opt("problemsetName", Str)],
        ResultShape::ProblemsetProblems,
    ),
    Descriptor::public(
        "getProblemsetRecentStatus",
        "problemset.recentStatus",
        &[req("count", Int), opt("problemsetName", Str)],
        ResultShape::Submissions,
    ),
    Descriptor::public(
        "getRecentActions",
        "recentActions",
        &[req("maxCount", Int)],
        ResultShape::RecentActions,
    ),
    Descriptor::public(
        "getUserBlogEntries",
        "user.blogEntries",
        &[req("handle", Str)],
        ResultShape::BlogEntries,
    ),
    Descriptor::public(
        "getUserFriends",
        "user.friends",
        &[opt("onlyOnline", Bool)],
        ResultShape::Handles,
    )
    .authenticated(),
    Descriptor::public(
        "getUserInfo",
        "user.info",
        &[req("handles", List)],
        ResultShape::Users,
    ),
    Descriptor::public(
        "getUserRatedList",
        "user.ratedList",
        &[
            opt("activeOnly", Bool),
            opt("includeRetired", Bool),
            opt("contestId", Int),
        ],
        ResultShape::Users,
    ),
    Descriptor::public(
        "getUserRating",
        "user.rating",
        &[req("handle", Str)],
        ResultShape::RatingChanges,
    ),
    Descriptor::public(
        "getUserStatus",
        "user.status",
        &[req("handle", Str), opt("from", Int), opt("count", Int)],
        ResultShape::Submissions,
    ),
];

/// Find the descriptor registered under `id`.
pub fn lookup(id: &str) -> Result<&'static Descriptor, ApiError> {
    REGISTRY
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| ApiError::UnknownMethod {
            name: id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn lookup_known_method() {
        let d = lookup("getUserInfo").unwrap();
        assert_eq!(d.name, "user.info");
        assert_eq!(d.result, ResultShape::Users);
        assert_eq!(d.timeout, DEFAULT_TIMEOUT);
        assert!(!d.requires_auth);
        assert_eq!(d.param("handles").map(|p| p.kind), Some(ParamKind::List));
    }

    #[test]
    fn lookup_unknown_method() {
        let err = lookup("getEverything").unwrap_err();
        assert!(matches!(err, ApiError::UnknownMethod { ref name } if name == "getEverything"));
    }

    #[test]
    fn ids_and_schemas_are_unique() {
        let ids: HashSet<_> = REGISTRY.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), REGISTRY.len());
        for d in REGISTRY {
            let names: HashSet<_> = d.params.iter().map(|p| p.name).collect();
            assert_eq!(names.len(), d.params.len(), "{}", d.id);
        }
    }

    #[test]
    fn only_friends_requires_auth() {
        let signed: Vec<_> = REGISTRY
            .iter()
            .filter(|d| d.requires_auth)
            .map(|d| d.name)
            .collect();
        assert_eq!(signed, vec!["user.friends"]);
    }

    #[test]
    fn url_respects_override() {
        let d = lookup("getContestList").unwrap();
        assert_eq!(d.url(None), "https://codeforces.com/api/contest.list");
        assert_eq!(
            d.url(Some("http://127.0.0.1:3000/api/")),
            "http://127.0.0.1:3000/api/contest.list"
        );
    }
}
