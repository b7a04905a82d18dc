use actix_web::{
    http::header,
    web::{block, Data, Form, Path},
    HttpResponse, Result,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use db::{get_conn, PgPool};
use errors::Error;

use crate::handlers::{cast_vote, VoteOutcome};

#[derive(Deserialize, Serialize)]
pub struct VoteParams {
    pub choice: Option<String>,
}

impl VoteParams {
    fn selected_choice(&self) -> Option<i32> {
        self.choice
            .as_ref()
            .and_then(|choice| choice.trim().parse::<i32>().ok())
    }
}

pub async fn vote(
    pool: Data<PgPool>,
    question_id: Path<i32>,
    params: Option<Form<VoteParams>>,
) -> Result<HttpResponse, Error> {
    let question_id = question_id.into_inner();
    let selection = params.and_then(|params| params.selected_choice());

    let outcome = block(move || {
        let conn = get_conn(&pool)?;
        cast_vote(&conn, question_id, selection, Utc::now())
    })
    .await??;

    match outcome {
        VoteOutcome::Recorded(_) => Ok(HttpResponse::SeeOther()
            .insert_header((
                header::LOCATION,
                format!("/api/polls/{}/results", question_id),
            ))
            .finish()),
        VoteOutcome::InvalidSelection(detail) => Ok(HttpResponse::Ok().json(detail)),
    }
}
