use actix_identity::Identity;
use actix_web::{
    web::{block, Data, Json, Path, Query},
    HttpResponse, Result,
};
use chrono::{DateTime, Utc};
use diesel::Connection;
use serde::{Deserialize, Serialize};
use validator::Validate;

use auth::get_claim_from_identity;
use db::{
    get_conn,
    models::{Choice, Question, QuestionChanges, QuestionFilter},
    PgPool,
};
use errors::Error;

use crate::validate::{inline_choice_texts, validate};

#[derive(Debug, Deserialize, Serialize)]
pub struct QuestionListEntry {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub was_published_recently: bool,
}

impl QuestionListEntry {
    fn new(question: Question, now: DateTime<Utc>) -> Self {
        QuestionListEntry {
            was_published_recently: question.was_published_recently_at(now),
            id: question.id,
            question_text: question.question_text,
            pub_date: question.pub_date,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuestionWithChoices {
    pub question: Question,
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Serialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(
        min = "1",
        max = "200",
        message = "question_text must be between 1 and 200 characters"
    ))]
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Deserialize, Serialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(
        min = "1",
        max = "200",
        message = "question_text must be between 1 and 200 characters"
    ))]
    pub question_text: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
}

pub async fn list_questions(
    pool: Data<PgPool>,
    filter: Query<QuestionFilter>,
) -> Result<Json<Vec<QuestionListEntry>>, Error> {
    let filter = filter.into_inner();

    let entries = block(move || -> Result<Vec<QuestionListEntry>, Error> {
        let conn = get_conn(&pool)?;
        let now = Utc::now();
        let questions = Question::search(&conn, &filter, now)?;
        Ok(questions
            .into_iter()
            .map(|question| QuestionListEntry::new(question, now))
            .collect())
    })
    .await??;

    Ok(Json(entries))
}

pub async fn create_question(
    id: Identity,
    pool: Data<PgPool>,
    params: Json<CreateQuestionRequest>,
) -> Result<Json<QuestionWithChoices>, Error> {
    validate(&params)?;
    let choice_texts = inline_choice_texts(&params.choices)?;
    let (claim, _) = get_claim_from_identity(id)?;
    let params = params.into_inner();

    let created = block(move || {
        let conn = get_conn(&pool)?;
        conn.transaction::<_, Error, _>(|| {
            let question = Question::create(&conn, params.question_text, params.pub_date)?;
            let choices = Choice::create_many(&conn, question.id, choice_texts)?;
            Ok(QuestionWithChoices { question, choices })
        })
    })
    .await??;

    info!(
        "{} created question {} with {} choices",
        claim.user_name,
        created.question.id,
        created.choices.len()
    );

    Ok(Json(created))
}

pub async fn get_question(
    pool: Data<PgPool>,
    question_id: Path<i32>,
) -> Result<Json<QuestionWithChoices>, Error> {
    let question_id = question_id.into_inner();

    let found = block(move || -> Result<QuestionWithChoices, Error> {
        let conn = get_conn(&pool)?;
        let question = Question::find_by_id(&conn, question_id)?;
        let choices = Choice::for_question(&conn, &question)?;
        Ok(QuestionWithChoices { question, choices })
    })
    .await??;

    Ok(Json(found))
}

pub async fn update_question(
    id: Identity,
    pool: Data<PgPool>,
    question_id: Path<i32>,
    params: Json<UpdateQuestionRequest>,
) -> Result<Json<Question>, Error> {
    validate(&params)?;
    let (claim, _) = get_claim_from_identity(id)?;
    let question_id = question_id.into_inner();
    let params = params.into_inner();

    let question = block(move || {
        let conn = get_conn(&pool)?;
        Question::update(
            &conn,
            question_id,
            &QuestionChanges {
                question_text: params.question_text,
                pub_date: params.pub_date,
            },
        )
    })
    .await??;

    info!("{} updated question {}", claim.user_name, question.id);

    Ok(Json(question))
}

pub async fn delete_question(
    id: Identity,
    pool: Data<PgPool>,
    question_id: Path<i32>,
) -> Result<HttpResponse, Error> {
    let (claim, _) = get_claim_from_identity(id)?;
    let question_id = question_id.into_inner();

    block(move || {
        let conn = get_conn(&pool)?;
        Question::delete(&conn, question_id)
    })
    .await??;

    info!("{} deleted question {}", claim.user_name, question_id);

    Ok(HttpResponse::Ok().json(()))
}
