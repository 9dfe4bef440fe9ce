use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use lingo_core::model::{Level, SectionId};

use crate::error::ReportError;
use crate::question_bank::SectionMeta;
use crate::scoring::{self, LevelTransition, PlacementSubmission, ScoreResult};
use crate::session_context::SessionContext;

//
// ─── REPORT TYPES ─────────────────────────────────────────────────────────────
//

/// What the backend needs to mark a section complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub section_id: SectionId,
    pub name: String,
    pub description: String,
    pub level: Level,
}

impl SectionReport {
    #[must_use]
    pub fn new(meta: &SectionMeta, level: Level) -> Self {
        Self {
            section_id: meta.id,
            name: meta.name.clone(),
            description: meta.description.clone(),
            level,
        }
    }
}

/// Write-side boundary to the backend: final results go out, the
/// authoritative verdict comes back.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Submit placement answers; the backend derives the level.
    async fn submit_placement(
        &self,
        session: &SessionContext,
        submission: &PlacementSubmission,
    ) -> Result<ScoreResult, ReportError>;

    /// Mark a section complete, then ask whether the level advanced.
    async fn complete_section(
        &self,
        session: &SessionContext,
        report: &SectionReport,
    ) -> Result<LevelTransition, ReportError>;
}

//
// ─── WIRE SHAPES ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct PlacementResultDto {
    #[serde(default)]
    score: Option<u32>,
    #[serde(default)]
    level: Option<Level>,
    #[serde(default, alias = "maxScore")]
    max_score: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProgressDto {
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    old_level: Option<Level>,
    #[serde(default)]
    new_level: Option<Level>,
}

#[derive(Debug, Serialize)]
struct SectionCompletionBody<'a> {
    name: &'a str,
    description: &'a str,
    level: Level,
}

fn check_status(status: StatusCode) -> Result<(), ReportError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ReportError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ReportError::Rejected(status));
    }
    Ok(())
}

//
// ─── SERVICE ──────────────────────────────────────────────────────────────────
//

/// Reqwest-backed completion reporter.
#[derive(Clone, Default)]
pub struct CompletionService {
    client: Client,
}

impl CompletionService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    fn token<'a>(session: &'a SessionContext) -> Result<&'a str, ReportError> {
        session.token().ok_or(ReportError::Unauthorized)
    }
}

#[async_trait]
impl CompletionApi for CompletionService {
    async fn submit_placement(
        &self,
        session: &SessionContext,
        submission: &PlacementSubmission,
    ) -> Result<ScoreResult, ReportError> {
        let token = Self::token(session)?;
        log::debug!("submitting {} placement answers", submission.answers.len());

        let response = self
            .client
            .post(session.url("/api/placement-test"))
            .bearer_auth(token)
            .json(submission)
            .send()
            .await?;
        check_status(response.status())?;

        let body = response.text().await?;
        let dto: PlacementResultDto =
            serde_json::from_str(&body).map_err(|_| ReportError::Incomplete)?;
        scoring::resolve_placement(dto.score, dto.level, dto.max_score)
    }

    async fn complete_section(
        &self,
        session: &SessionContext,
        report: &SectionReport,
    ) -> Result<LevelTransition, ReportError> {
        let token = Self::token(session)?;
        log::debug!("marking section {} complete", report.section_id);

        let body = SectionCompletionBody {
            name: &report.name,
            description: &report.description,
            level: report.level,
        };
        let response = self
            .client
            .post(session.url(&format!("/api/sections/{}/complete", report.section_id)))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_status(response.status())?;

        // The completion itself is acknowledged; the level verdict comes
        // from a separate progress check.
        let response = self
            .client
            .get(session.url("/api/user/check-progress"))
            .bearer_auth(token)
            .send()
            .await?;
        check_status(response.status())?;

        let body = response.text().await?;
        let dto: ProgressDto = serde_json::from_str(&body).map_err(|_| ReportError::Incomplete)?;
        Ok(LevelTransition {
            completed: dto.completed,
            old_level: dto.old_level,
            new_level: dto.new_level,
        })
    }
}
