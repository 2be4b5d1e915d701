//! Typed shapes of Codeforces API results.
//!
//! # Design
//! Field names follow the API's camelCase via serde. Optional fields are
//! `Option`, enumerations are closed Rust enums (an unknown value fails the
//! decode), and numeric constraints are checked by each type's `Validate`
//! impl. `ApiResult` ties a Rust result type to the registry's `ResultShape`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::decode::{
    field, http_url, in_range, non_negative, non_negative_f64, non_negative_opt, positive,
    positive_f64, Validate,
};
use crate::error::ApiError;
use crate::registry::ResultShape;

/// A Rust type that a registry entry's `result` can decode into.
pub trait ApiResult: DeserializeOwned + Validate {
    const SHAPE: ResultShape;
}

macro_rules! api_result {
    ($($ty:ty => $shape:ident),* $(,)?) => {
        $(impl ApiResult for $ty {
            const SHAPE: ResultShape = ResultShape::$shape;
        })*
    };
}

api_result! {
    Vec<Comment> => Comments,
    BlogEntry => BlogEntry,
    Vec<BlogEntry> => BlogEntries,
    Vec<Hack> => Hacks,
    Vec<Contest> => Contests,
    Vec<RatingChange> => RatingChanges,
    ContestStandings => Standings,
    Vec<Submission> => Submissions,
    ProblemsetProblems => ProblemsetProblems,
    Vec<RecentAction> => RecentActions,
    Vec<String> => Handles,
    Vec<User> => Users,
}

// ---------------------------------------------------------------------------
// Users and blogs
// ---------------------------------------------------------------------------

/// A Codeforces user. Contact and rating fields are omitted by the API for
/// users who hide them or have never been rated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub handle: String,
    pub email: Option<String>,
    pub vk_id: Option<String>,
    pub open_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub organization: Option<String>,
    pub contribution: i64,
    pub rank: Option<String>,
    pub rating: Option<i64>,
    pub max_rank: Option<String>,
    pub max_rating: Option<i64>,
    pub last_online_time_seconds: i64,
    pub registration_time_seconds: i64,
    pub friend_of_count: i64,
    pub avatar: String,
    pub title_photo: String,
}

impl Validate for User {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative(path, "lastOnlineTimeSeconds", self.last_online_time_seconds)?;
        non_negative(path, "registrationTimeSeconds", self.registration_time_seconds)?;
        non_negative(path, "friendOfCount", self.friend_of_count)?;
        http_url(path, "avatar", &self.avatar)?;
        http_url(path, "titlePhoto", &self.title_photo)
    }
}

/// A blog entry, in short form (no `content`) or full form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogEntry {
    pub id: i64,
    pub original_locale: String,
    pub creation_time_seconds: i64,
    pub author_handle: String,
    pub title: String,
    pub content: Option<String>,
    pub locale: String,
    pub modification_time_seconds: i64,
    pub allow_view_history: bool,
    pub tags: Vec<String>,
    pub rating: i64,
}

impl Validate for BlogEntry {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative(path, "creationTimeSeconds", self.creation_time_seconds)?;
        non_negative(path, "modificationTimeSeconds", self.modification_time_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub creation_time_seconds: i64,
    pub commentator_handle: String,
    pub locale: String,
    pub text: String,
    pub parent_comment_id: Option<i64>,
    pub rating: i64,
}

impl Validate for Comment {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative(path, "creationTimeSeconds", self.creation_time_seconds)
    }
}

/// An entry of the recent actions feed: a blog post, a comment, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAction {
    pub time_seconds: i64,
    pub blog_entry: Option<BlogEntry>,
    pub comment: Option<Comment>,
}

impl Validate for RecentAction {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative(path, "timeSeconds", self.time_seconds)?;
        self.blog_entry.validate(&field(path, "blogEntry"))?;
        self.comment.validate(&field(path, "comment"))
    }
}

/// A user's participation in a rated contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    pub contest_id: i64,
    pub contest_name: String,
    pub handle: String,
    pub rank: i64,
    pub rating_update_time_seconds: i64,
    pub old_rating: i64,
    pub new_rating: i64,
}

impl Validate for RatingChange {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        positive(path, "rank", self.rank)?;
        non_negative(path, "ratingUpdateTimeSeconds", self.rating_update_time_seconds)?;
        non_negative(path, "oldRating", self.old_rating)?;
        non_negative(path, "newRating", self.new_rating)
    }
}

// ---------------------------------------------------------------------------
// Contests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestType {
    Cf,
    Ioi,
    Icpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestPhase {
    Before,
    Coding,
    PendingSystemTest,
    SystemTest,
    Finished,
}

/// Category of a gym contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestKind {
    #[serde(rename = "Official ICPC Contest")]
    OfficialIcpc,
    #[serde(rename = "Official School Contest")]
    OfficialSchool,
    #[serde(rename = "Opencup Contest")]
    Opencup,
    #[serde(rename = "School/University/City/Region Championship")]
    RegionalChampionship,
    #[serde(rename = "Training Camp Contest")]
    TrainingCamp,
    #[serde(rename = "Official International Personal Contest")]
    OfficialInternationalPersonal,
    #[serde(rename = "Training Contest")]
    Training,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub contest_type: ContestType,
    pub phase: ContestPhase,
    pub frozen: bool,
    pub duration_seconds: i64,
    pub start_time_seconds: Option<i64>,
    pub relative_time_seconds: Option<i64>,
    pub prepared_by: Option<String>,
    pub website_url: Option<String>,
    pub description: Option<String>,
    /// 1 to 5 inclusive.
    pub difficulty: Option<i64>,
    pub kind: Option<ContestKind>,
    pub icpc_region: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub season: Option<String>,
}

impl Validate for Contest {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative(path, "durationSeconds", self.duration_seconds)?;
        non_negative_opt(path, "startTimeSeconds", self.start_time_seconds)?;
        if let Some(url) = &self.website_url {
            http_url(path, "websiteUrl", url)?;
        }
        if let Some(difficulty) = self.difficulty {
            in_range(path, "difficulty", difficulty, 1, 5)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantType {
    Contestant,
    Practice,
    Virtual,
    Manager,
    OutOfCompetition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub handle: String,
    pub name: Option<String>,
}

/// The user or team a submission, hack or ranklist row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub contest_id: Option<i64>,
    pub members: Vec<Member>,
    pub participant_type: ParticipantType,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub ghost: bool,
    pub room: Option<i64>,
    pub start_time_seconds: Option<i64>,
}

impl Validate for Party {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative_opt(path, "startTimeSeconds", self.start_time_seconds)
    }
}

// ---------------------------------------------------------------------------
// Problems and submissions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemType {
    Programming,
    Question,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub contest_id: Option<i64>,
    pub problemset_name: Option<String>,
    pub index: String,
    pub name: String,
    #[serde(rename = "type")]
    pub problem_type: ProblemType,
    pub points: Option<f64>,
    pub rating: Option<i64>,
    pub tags: Vec<String>,
}

impl Validate for Problem {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        if let Some(points) = self.points {
            positive_f64(path, "points", points)?;
        }
        non_negative_opt(path, "rating", self.rating)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatistics {
    pub contest_id: Option<i64>,
    pub index: String,
    pub solved_count: i64,
}

impl Validate for ProblemStatistics {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative(path, "solvedCount", self.solved_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Failed,
    Ok,
    Partial,
    CompilationError,
    RuntimeError,
    WrongAnswer,
    PresentationError,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    IdlenessLimitExceeded,
    SecurityViolated,
    Crashed,
    InputPreparationCrashed,
    Challenged,
    Skipped,
    Testing,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Testset {
    Samples,
    Pretests,
    Tests,
    Tests1,
    Tests2,
    Tests3,
    Tests4,
    Tests5,
    Tests6,
    Tests7,
    Tests8,
    Tests9,
    Tests10,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub contest_id: Option<i64>,
    pub creation_time_seconds: Option<i64>,
    pub relative_time_seconds: i64,
    pub problem: Problem,
    pub author: Party,
    pub programming_language: String,
    /// Absent while the submission is still queued.
    pub verdict: Option<Verdict>,
    pub testset: Testset,
    pub passed_test_count: i64,
    pub time_consumed_millis: i64,
    pub memory_consumed_bytes: i64,
    pub points: Option<f64>,
}

impl Validate for Submission {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative_opt(path, "creationTimeSeconds", self.creation_time_seconds)?;
        self.problem.validate(&field(path, "problem"))?;
        self.author.validate(&field(path, "author"))?;
        non_negative(path, "passedTestCount", self.passed_test_count)?;
        non_negative(path, "timeConsumedMillis", self.time_consumed_millis)?;
        non_negative(path, "memoryConsumedBytes", self.memory_consumed_bytes)?;
        if let Some(points) = self.points {
            non_negative_f64(path, "points", points)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Hacks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HackVerdict {
    HackSuccessful,
    HackUnsuccessful,
    InvalidInput,
    GeneratorIncompilable,
    GeneratorCrashed,
    Ignored,
    Testing,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeProtocol {
    pub manual: bool,
    pub protocol: String,
    pub verdict: HackVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hack {
    pub id: i64,
    pub creation_time_seconds: i64,
    pub hacker: Party,
    pub defender: Party,
    pub verdict: Option<HackVerdict>,
    pub problem: Problem,
    pub test: Option<String>,
    pub judge_protocol: Option<JudgeProtocol>,
}

impl Validate for Hack {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative(path, "creationTimeSeconds", self.creation_time_seconds)?;
        self.hacker.validate(&field(path, "hacker"))?;
        self.defender.validate(&field(path, "defender"))?;
        self.problem.validate(&field(path, "problem"))
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemResultType {
    Preliminary,
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemResult {
    pub points: f64,
    pub penalty: Option<i64>,
    pub rejected_attempt_count: i64,
    #[serde(rename = "type")]
    pub result_type: ProblemResultType,
    pub best_submission_time_seconds: Option<i64>,
}

impl Validate for ProblemResult {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        non_negative_f64(path, "points", self.points)?;
        non_negative(path, "rejectedAttemptCount", self.rejected_attempt_count)?;
        non_negative_opt(path, "bestSubmissionTimeSeconds", self.best_submission_time_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RanklistRow {
    pub party: Party,
    pub rank: i64,
    pub points: f64,
    pub penalty: i64,
    pub successful_hack_count: i64,
    pub unsuccessful_hack_count: i64,
    pub problem_results: Vec<ProblemResult>,
    pub last_submission_time_seconds: Option<i64>,
}

impl Validate for RanklistRow {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        self.party.validate(&field(path, "party"))?;
        positive(path, "rank", self.rank)?;
        non_negative_f64(path, "points", self.points)?;
        non_negative(path, "successfulHackCount", self.successful_hack_count)?;
        non_negative(path, "unsuccessfulHackCount", self.unsuccessful_hack_count)?;
        self.problem_results.validate(&field(path, "problemResults"))?;
        non_negative_opt(path, "lastSubmissionTimeSeconds", self.last_submission_time_seconds)
    }
}

/// Result of `contest.standings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestStandings {
    pub contest: Contest,
    pub problems: Vec<Problem>,
    pub rows: Vec<RanklistRow>,
}

impl Validate for ContestStandings {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        self.contest.validate(&field(path, "contest"))?;
        self.problems.validate(&field(path, "problems"))?;
        self.rows.validate(&field(path, "rows"))
    }
}

/// Result of `problemset.problems`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemsetProblems {
    pub problems: Vec<Problem>,
    pub problem_statistics: Vec<ProblemStatistics>,
}

impl Validate for ProblemsetProblems {
    fn validate(&self, path: &str) -> Result<(), ApiError> {
        self.problems.validate(&field(path, "problems"))?;
        self.problem_statistics
            .validate(&field(path, "problemStatistics"))
    }
}
