use actix_identity::Identity;
use actix_web::{
    web::{block, Data, Json, Path},
    HttpResponse, Result,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use auth::get_claim_from_identity;
use db::{
    get_conn,
    models::{Choice, ChoiceChanges, Question},
    PgPool,
};
use errors::Error;

use crate::validate::validate;

#[derive(Deserialize, Serialize, Validate)]
pub struct CreateChoiceRequest {
    #[validate(length(
        min = "1",
        max = "200",
        message = "choice_text must be between 1 and 200 characters"
    ))]
    pub choice_text: String,
}

#[derive(Deserialize, Serialize, Validate)]
pub struct UpdateChoiceRequest {
    #[validate(length(
        min = "1",
        max = "200",
        message = "choice_text must be between 1 and 200 characters"
    ))]
    pub choice_text: Option<String>,
    pub votes: Option<i32>,
}

pub async fn create_choice(
    id: Identity,
    pool: Data<PgPool>,
    question_id: Path<i32>,
    params: Json<CreateChoiceRequest>,
) -> Result<Json<Choice>, Error> {
    validate(&params)?;
    let (claim, _) = get_claim_from_identity(id)?;
    let question_id = question_id.into_inner();
    let choice_text = params.into_inner().choice_text;

    let choice = block(move || {
        let conn = get_conn(&pool)?;
        let question = Question::find_by_id(&conn, question_id)?;
        Choice::create(&conn, question.id, choice_text)
    })
    .await??;

    info!(
        "{} added choice {} to question {}",
        claim.user_name, choice.id, question_id
    );

    Ok(Json(choice))
}

pub async fn update_choice(
    id: Identity,
    pool: Data<PgPool>,
    choice_id: Path<i32>,
    params: Json<UpdateChoiceRequest>,
) -> Result<Json<Choice>, Error> {
    validate(&params)?;
    let (claim, _) = get_claim_from_identity(id)?;
    let choice_id = choice_id.into_inner();
    let params = params.into_inner();

    let choice = block(move || {
        let conn = get_conn(&pool)?;
        Choice::update(
            &conn,
            choice_id,
            &ChoiceChanges {
                choice_text: params.choice_text,
                votes: params.votes,
            },
        )
    })
    .await??;

    info!("{} updated choice {}", claim.user_name, choice.id);

    Ok(Json(choice))
}

pub async fn delete_choice(
    id: Identity,
    pool: Data<PgPool>,
    choice_id: Path<i32>,
) -> Result<HttpResponse, Error> {
    let (claim, _) = get_claim_from_identity(id)?;
    let choice_id = choice_id.into_inner();

    block(move || {
        let conn = get_conn(&pool)?;
        Choice::delete(&conn, choice_id)
    })
    .await??;

    info!("{} deleted choice {}", claim.user_name, choice_id);

    Ok(HttpResponse::Ok().json(()))
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use db::{get_conn, models::Choice, new_pool};
    use errors::ErrorResponse;

    use super::{CreateChoiceRequest, UpdateChoiceRequest};
    use crate::tests::helpers::tests::{
        clear_polls, create_question, get_auth_token, test_delete, test_post, test_put,
    };

    #[actix_rt::test]
    #[serial]
    async fn test_add_choice() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        let question = create_question(&conn, "Needs options", -1);

        let res: (u16, Choice) = test_post(
            &format!("/api/admin/questions/{}/choices", question.id),
            CreateChoiceRequest {
                choice_text: "Option A".to_string(),
            },
            Some(get_auth_token()),
        )
        .await;

        assert_eq!(res.0, 200);
        assert_eq!(res.1.question_id, question.id);
        assert_eq!(res.1.votes, 0);

        clear_polls(&conn);
    }

    #[actix_rt::test]
    #[serial]
    async fn test_add_choice_to_missing_question() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        let res: (u16, ErrorResponse) = test_post(
            "/api/admin/questions/1/choices",
            CreateChoiceRequest {
                choice_text: "Option A".to_string(),
            },
            Some(get_auth_token()),
        )
        .await;

        assert_eq!(res.0, 404);
    }

    #[actix_rt::test]
    #[serial]
    async fn test_edit_choice() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        let question = create_question(&conn, "Needs options", -1);
        let choice = Choice::create(&conn, question.id, "Typo".to_string()).unwrap();

        let res: (u16, Choice) = test_put(
            &format!("/api/admin/choices/{}", choice.id),
            UpdateChoiceRequest {
                choice_text: Some("Fixed".to_string()),
                votes: Some(4),
            },
            Some(get_auth_token()),
        )
        .await;
        assert_eq!(res.0, 200);
        assert_eq!(res.1.choice_text, "Fixed");
        assert_eq!(res.1.votes, 4);

        let rejected: (u16, ErrorResponse) = test_put(
            &format!("/api/admin/choices/{}", choice.id),
            UpdateChoiceRequest {
                choice_text: None,
                votes: Some(-3),
            },
            Some(get_auth_token()),
        )
        .await;
        assert_eq!(rejected.0, 422);
        assert_eq!(rejected.1.errors[0], "votes cannot be negative");

        clear_polls(&conn);
    }

    #[actix_rt::test]
    #[serial]
    async fn test_remove_choice() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clear_polls(&conn);

        let question = create_question(&conn, "Needs options", -1);
        let choice = Choice::create(&conn, question.id, "Extra".to_string()).unwrap();

        let res: (u16, ()) = test_delete(
            &format!("/api/admin/choices/{}", choice.id),
            Some(get_auth_token()),
        )
        .await;
        assert_eq!(res.0, 200);
        assert_eq!(Choice::for_question(&conn, &question).unwrap().len(), 0);

        clear_polls(&conn);
    }
}
