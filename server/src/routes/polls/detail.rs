use actix_web::{
    web::{block, Data, Json, Path},
    Result,
};
use chrono::Utc;

use db::{get_conn, models::Question, PgPool};
use errors::Error;

use crate::handlers::{get_question_detail, DetailResponse};

pub async fn detail(
    pool: Data<PgPool>,
    question_id: Path<i32>,
) -> Result<Json<DetailResponse>, Error> {
    let question_id = question_id.into_inner();

    let response = block(move || {
        let conn = get_conn(&pool)?;
        let question = Question::find_published(&conn, question_id, Utc::now())?;
        get_question_detail(&conn, question, None)
    })
    .await??;

    Ok(Json(response))
}
