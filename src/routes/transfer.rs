//! Deck export downloads and import uploads.
use std::sync::Arc;

use askama::Template;
use axum::{
    Extension,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::{
    auth::AuthUser,
    errors::ApiError,
    router::AppState,
    routes::{check_user_id, deck::fetch_owned_deck, handle_render},
    templates,
    transfer::{
        CardExport, DeckExport, TransferError, import_deck, parse_csv_cards, parse_json_deck,
        render_csv, render_json,
    },
};

fn attachment_response(
    title: &str,
    ext: &str,
    content_type: &str,
    body: String,
) -> Result<Response, ApiError> {
    let filename = format!("{}.{ext}", title.replace(['"', '\\', '/'], "_"));
    let response = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        )
        .body(body)?;
    Ok(response.into_response())
}

async fn fetch_export(
    state: &AppState,
    deck_id: i32,
    user_id: i32,
) -> Result<DeckExport, ApiError> {
    let deck = fetch_owned_deck(state, deck_id, user_id).await?;
    let flashcards = sqlx::query_as::<_, CardExport>(
        "SELECT question, answer FROM flashcard WHERE deck_id = $1 ORDER BY id",
    )
    .bind(deck_id)
    .fetch_all(&*state.db)
    .await?;

    Ok(DeckExport {
        title: deck.title,
        description: deck.description,
        flashcards,
    })
}

pub async fn export_deck_json(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let user_id = check_user_id(user_id)?;
    let export = fetch_export(&state, id, user_id).await?;
    let body = render_json(&export)?;
    attachment_response(&export.title, "json", "application/json", body)
}

pub async fn export_deck_csv(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let user_id = check_user_id(user_id)?;
    let export = fetch_export(&state, id, user_id).await?;
    let body = render_csv(&export.flashcards)?;
    attachment_response(&export.title, "csv", "text/csv", body)
}

pub async fn show_import_form(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    check_user_id(user_id)?;
    handle_render(templates::ImportTemplate { error: None }.render())
}

struct Upload {
    file_name: String,
    contents: String,
    title: Option<String>,
    description: Option<String>,
}

fn upload_error(e: MultipartError) -> ApiError {
    ApiError::MalformedImport(TransferError::Upload(e.to_string()))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    let mut file = None;
    let mut title = None;
    let mut description = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let contents = field.text().await.map_err(upload_error)?;
                file = Some((file_name, contents));
            }
            "title" => title = Some(field.text().await.map_err(upload_error)?),
            "description" => description = Some(field.text().await.map_err(upload_error)?),
            _ => {}
        }
    }
    let (file_name, contents) =
        file.ok_or(ApiError::MalformedImport(TransferError::MissingFile))?;
    Ok(Upload {
        file_name,
        contents,
        title,
        description,
    })
}

fn render_import_error(e: TransferError) -> Result<Response, ApiError> {
    let template = templates::ImportTemplate {
        error: Some(e.to_string()),
    };
    let html = handle_render(template.render())?;
    Ok((StatusCode::BAD_REQUEST, html).into_response())
}

pub async fn import_deck_json(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let user_id = check_user_id(user_id)?;
    let upload = read_upload(&mut multipart).await?;

    let parsed = if upload.file_name.to_ascii_lowercase().ends_with(".json") {
        parse_json_deck(&upload.contents)
    } else {
        Err(TransferError::WrongExtension("json"))
    };

    match parsed {
        Ok(deck) => {
            let deck_id = import_deck(&state.db, user_id, &deck).await?;
            info!(
                "Imported JSON deck {} ({} cards) for user {}",
                deck_id,
                deck.flashcards.len(),
                user_id
            );
            Ok(Redirect::to(&format!("/decks/{deck_id}")).into_response())
        }
        Err(e) => render_import_error(e),
    }
}

pub async fn import_deck_csv(
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let user_id = check_user_id(user_id)?;
    let upload = read_upload(&mut multipart).await?;

    let parsed = if upload.file_name.to_ascii_lowercase().ends_with(".csv") {
        parse_csv_cards(&upload.contents).map(|flashcards| DeckExport {
            title: upload
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Imported Deck".to_string()),
            description: upload.description.unwrap_or_default(),
            flashcards,
        })
    } else {
        Err(TransferError::WrongExtension("csv"))
    };

    match parsed {
        Ok(deck) => {
            let deck_id = import_deck(&state.db, user_id, &deck).await?;
            info!(
                "Imported CSV deck {} ({} cards) for user {}",
                deck_id,
                deck.flashcards.len(),
                user_id
            );
            Ok(Redirect::to(&format!("/decks/{deck_id}")).into_response())
        }
        Err(e) => render_import_error(e),
    }
}
