use actix_web::{
    web::{block, Data, Json},
    Result,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use db::{get_conn, models::Question, PgPool};
use errors::Error;

pub const LATEST_QUESTION_LIMIT: i64 = 5;
pub const NO_POLLS_MESSAGE: &str = "No polls are available.";

#[derive(Deserialize, Serialize)]
pub struct IndexResponse {
    pub latest_question_list: Vec<Question>,
    pub message: Option<String>,
}

pub async fn index(pool: Data<PgPool>) -> Result<Json<IndexResponse>, Error> {
    let latest_question_list = block(move || {
        let conn = get_conn(&pool)?;
        Question::latest_published(&conn, Utc::now(), LATEST_QUESTION_LIMIT)
    })
    .await??;

    let message = if latest_question_list.is_empty() {
        Some(NO_POLLS_MESSAGE.to_string())
    } else {
        None
    };

    Ok(Json(IndexResponse {
        latest_question_list,
        message,
    }))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serial_test::serial;

    use db::{get_conn, models::Question, new_pool};

    use super::{IndexResponse, NO_POLLS_MESSAGE};
    use crate::tests::helpers::tests::{clear_polls, create_question, test_get};

    #[actix_rt::test]
    #[serial]
    async fn test_no_questions() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        let res: (u16, IndexResponse) = test_get("/api/polls", None).await;
        assert_eq!(res.0, 200);
        assert_eq!(res.1.latest_question_list.len(), 0);
        assert_eq!(res.1.message.unwrap(), NO_POLLS_MESSAGE);
    }

    #[actix_rt::test]
    #[serial]
    async fn test_past_question() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        create_question(&conn, "Past question.", -30);

        let res: (u16, IndexResponse) = test_get("/api/polls", None).await;
        assert_eq!(res.0, 200);
        assert_eq!(res.1.latest_question_list.len(), 1);
        assert_eq!(res.1.latest_question_list[0].question_text, "Past question.");
        assert_eq!(res.1.message, None);

        clear_polls(&conn);
    }

    #[actix_rt::test]
    #[serial]
    async fn test_future_question() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        create_question(&conn, "Future question.", 30);

        let res: (u16, IndexResponse) = test_get("/api/polls", None).await;
        assert_eq!(res.0, 200);
        assert_eq!(res.1.latest_question_list.len(), 0);
        assert_eq!(res.1.message.unwrap(), NO_POLLS_MESSAGE);

        clear_polls(&conn);
    }

    #[actix_rt::test]
    #[serial]
    async fn test_future_question_and_past_question() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        create_question(&conn, "Past question.", -30);
        create_question(&conn, "Future question.", 30);

        let res: (u16, IndexResponse) = test_get("/api/polls", None).await;
        let texts: Vec<String> = res
            .1
            .latest_question_list
            .into_iter()
            .map(|q| q.question_text)
            .collect();
        assert_eq!(texts, vec!["Past question.".to_string()]);

        clear_polls(&conn);
    }

    #[actix_rt::test]
    #[serial]
    async fn test_two_past_questions() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        create_question(&conn, "Past question 1.", -30);
        create_question(&conn, "Past question 2.", -5);

        let res: (u16, IndexResponse) = test_get("/api/polls", None).await;
        let texts: Vec<String> = res
            .1
            .latest_question_list
            .into_iter()
            .map(|q| q.question_text)
            .collect();
        assert_eq!(
            texts,
            vec!["Past question 2.".to_string(), "Past question 1.".to_string()]
        );

        clear_polls(&conn);
    }

    #[actix_rt::test]
    #[serial]
    async fn test_lists_at_most_five() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        let published = Utc::now() - Duration::days(1);
        let mut created = Vec::new();
        for n in 0..7 {
            created.push(Question::create(&conn, format!("Question {}", n), published).unwrap());
        }

        let res: (u16, IndexResponse) = test_get("/api/polls", None).await;
        assert_eq!(res.1.latest_question_list.len(), 5);
        // same publication date, so newest rows come first
        assert_eq!(res.1.latest_question_list[0].id, created[6].id);
        assert_eq!(res.1.latest_question_list[4].id, created[2].id);

        clear_polls(&conn);
    }
}
