use diesel::PgConnection;
use serde::{Deserialize, Serialize};

use db::models::{Choice, Question};
use errors::Error;

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ChoiceDetails {
    pub id: i32,
    pub choice_text: String,
}

impl From<Choice> for ChoiceDetails {
    fn from(choice: Choice) -> Self {
        ChoiceDetails {
            id: choice.id,
            choice_text: choice.choice_text,
        }
    }
}

/// Body of the voting form, also returned when a vote is rejected.
#[derive(Debug, Deserialize, Serialize)]
pub struct DetailResponse {
    pub question: Question,
    pub choices: Vec<ChoiceDetails>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ResultsResponse {
    pub question: Question,
    pub choices: Vec<Choice>,
}

pub fn get_question_detail(
    conn: &PgConnection,
    question: Question,
    error_message: Option<String>,
) -> Result<DetailResponse, Error> {
    let choices = Choice::for_question(conn, &question)?;

    Ok(DetailResponse {
        question,
        choices: choices.into_iter().map(ChoiceDetails::from).collect(),
        error_message,
    })
}

pub fn get_question_results(
    conn: &PgConnection,
    question: Question,
) -> Result<ResultsResponse, Error> {
    let choices = Choice::for_question(conn, &question)?;

    Ok(ResultsResponse { question, choices })
}
