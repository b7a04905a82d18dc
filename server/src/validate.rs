use actix_web::web::Json;
use validator::{Validate, ValidationErrors};

use errors::Error;

/// Longest text the question and choice columns accept.
pub const MAX_TEXT_LENGTH: usize = 200;

fn collect_errors(errors: ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|err| {
            let default_error = format!("{} is required", err.0);
            err.1[0]
                .message
                .as_ref()
                .unwrap_or(&std::borrow::Cow::Owned(default_error))
                .to_string()
        })
        .collect();
    messages.sort();
    messages
}

pub fn validate<T>(params: &Json<T>) -> Result<(), Error>
where
    T: Validate,
{
    match params.validate() {
        Ok(_) => Ok(()),
        Err(err) => Err(Error::ValidationError(collect_errors(err))),
    }
}

/// Inline choice rows left blank are ignored, the rest must fit the column.
pub fn inline_choice_texts(choices: &[String]) -> Result<Vec<String>, Error> {
    let mut texts = Vec::new();
    let mut errors = Vec::new();

    for choice in choices {
        let text = choice.trim();
        if text.is_empty() {
            continue;
        }
        if text.chars().count() > MAX_TEXT_LENGTH {
            errors.push(format!(
                "choice_text must be at most {} characters",
                MAX_TEXT_LENGTH
            ));
            continue;
        }
        texts.push(text.to_string());
    }

    if !errors.is_empty() {
        return Err(Error::ValidationError(errors));
    }

    Ok(texts)
}
