use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use lingo_core::model::{Level, Question, QuestionId, SectionId};

use crate::error::BankError;
use crate::session_context::SessionContext;

//
// ─── BANK TYPES ───────────────────────────────────────────────────────────────
//

/// Metadata of the content section a bank was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMeta {
    pub id: SectionId,
    pub name: String,
    pub description: String,
}

/// A section's normalized question list plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBank {
    pub meta: SectionMeta,
    pub questions: Vec<Question>,
}

/// Read-side boundary to the content/assessment service.
///
/// Implementations fetch and normalize; retry policy belongs to the
/// caller.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the placement assessment bank.
    async fn placement_bank(&self, session: &SessionContext) -> Result<Vec<Question>, BankError>;

    /// Fetch one section of the given level's content.
    async fn section_bank(
        &self,
        session: &SessionContext,
        level: Level,
        section_id: SectionId,
    ) -> Result<SectionBank, BankError>;
}

//
// ─── WIRE SHAPES ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct QuestionDto {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    level: Option<Level>,
    #[serde(default)]
    points: Option<u32>,
}

impl QuestionDto {
    /// Normalize into the domain question; ids default to the 1-based
    /// bank position, as the content files do.
    fn into_question(self, fallback_id: u64) -> Result<Question, BankError> {
        let id = QuestionId::new(self.id.unwrap_or(fallback_id));
        let mut question = Question::new(id, self.text, self.options, self.correct_answer)
            .map_err(|err| BankError::Malformed(err.to_string()))?;
        if let Some(explanation) = self.explanation.filter(|text| !text.is_empty()) {
            question = question.with_explanation(explanation);
        }
        if let Some(level) = self.level {
            question = question.with_level(level);
        }
        if let Some(points) = self.points {
            question = question.with_points(points);
        }
        Ok(question)
    }
}

/// The two accepted placement response envelopes: a bare question array
/// or an object wrapping one under `questions`. Anything else is
/// malformed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BankEnvelope {
    Bare(Vec<QuestionDto>),
    Wrapped { questions: Vec<QuestionDto> },
}

impl BankEnvelope {
    fn into_dtos(self) -> Vec<QuestionDto> {
        match self {
            BankEnvelope::Bare(questions) | BankEnvelope::Wrapped { questions } => questions,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentDocument {
    sections: Vec<SectionDto>,
}

#[derive(Debug, Deserialize)]
struct SectionDto {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

fn normalize(dtos: Vec<QuestionDto>) -> Result<Vec<Question>, BankError> {
    if dtos.is_empty() {
        return Err(BankError::Empty);
    }
    dtos.into_iter()
        .enumerate()
        .map(|(index, dto)| dto.into_question(index as u64 + 1))
        .collect()
}

fn decode_placement(body: &str) -> Result<Vec<Question>, BankError> {
    let envelope: BankEnvelope =
        serde_json::from_str(body).map_err(|err| BankError::Malformed(err.to_string()))?;
    normalize(envelope.into_dtos())
}

fn decode_section(body: &str, section_id: SectionId) -> Result<SectionBank, BankError> {
    let document: ContentDocument =
        serde_json::from_str(body).map_err(|err| BankError::Malformed(err.to_string()))?;

    // Sections are identified positionally: id = index + 1.
    let position = usize::try_from(section_id.value())
        .ok()
        .and_then(|id| id.checked_sub(1))
        .ok_or(BankError::SectionNotFound(section_id))?;
    let section = document
        .sections
        .into_iter()
        .nth(position)
        .ok_or(BankError::SectionNotFound(section_id))?;

    let meta = SectionMeta {
        id: section_id,
        name: section.title.unwrap_or_else(|| "Unnamed Section".to_owned()),
        description: section.description.unwrap_or_default(),
    };
    let questions = normalize(section.questions)?;
    Ok(SectionBank { meta, questions })
}

fn check_status(status: StatusCode) -> Result<(), BankError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BankError::Unauthorized);
    }
    if !status.is_success() {
        return Err(BankError::Status(status));
    }
    Ok(())
}

//
// ─── SERVICE ──────────────────────────────────────────────────────────────────
//

/// Reqwest-backed question source.
#[derive(Clone, Default)]
pub struct QuestionBankService {
    client: Client,
}

impl QuestionBankService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn fetch(&self, session: &SessionContext, path: &str) -> Result<String, BankError> {
        let token = session.token().ok_or(BankError::Unauthorized)?;
        let response = self
            .client
            .get(session.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        check_status(response.status())?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl QuestionSource for QuestionBankService {
    async fn placement_bank(&self, session: &SessionContext) -> Result<Vec<Question>, BankError> {
        log::debug!("fetching placement bank");
        let body = self.fetch(session, "/api/placement-test").await?;
        decode_placement(&body)
    }

    async fn section_bank(
        &self,
        session: &SessionContext,
        level: Level,
        section_id: SectionId,
    ) -> Result<SectionBank, BankError> {
        let folder = level.content_folder();
        log::debug!("fetching section {section_id} from {folder}.json");
        let body = self
            .fetch(session, &format!("/api/content/{folder}.json"))
            .await?;
        decode_section(&body, section_id)
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
