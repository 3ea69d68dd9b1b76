//! Registration form and submission
//!
//! POST order: photo presence check → photo written to the upload
//! directory → record appended to the store → redirect to the search page.
//! A rejected submission touches neither the store nor the upload directory.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use mpr_common::models::SEX_NOT_INFORMED;
use mpr_common::{DisappearanceLocation, Error, MissingPersonRecord, RecordStatus, StoredUpload};
use tracing::{debug, error, info};

use crate::api::ui::render;
use crate::error::{ApiError, ApiResult};
use crate::pages::Page;
use crate::AppState;

/// Where a successful submission redirects
const AFTER_SUBMIT: &str = "/busca";

/// Multipart part carrying the photo
const PHOTO_FIELD: &str = "foto";

/// Uploaded photo part
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Registration payload
///
/// Every text field is optional and accepted as sent (an empty input stays
/// `Some("")`). The photo is the only required part.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// `nome`
    pub full_name: Option<String>,
    /// `data_nascimento`
    pub birth_date: Option<String>,
    /// `telefone_contato`
    pub contact_phone: Option<String>,
    /// `data_desaparecimento`
    pub disappearance_date: Option<String>,
    /// `cidade`
    pub city: Option<String>,
    /// `estado`
    pub state: Option<String>,
    /// `local_desaparecimento`
    pub reference_point: Option<String>,
    /// `caracteristicas`
    pub characteristics: Option<String>,
    /// `foto` (required)
    pub photo: Option<PhotoUpload>,
}

impl RegistrationForm {
    /// Read all parts of a `multipart/form-data` body
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == PHOTO_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(malformed)?;
                form.photo = Some(PhotoUpload { file_name, bytes });
                continue;
            }

            let value = field.text().await.map_err(malformed)?;
            let slot = match name.as_str() {
                "nome" => &mut form.full_name,
                "data_nascimento" => &mut form.birth_date,
                "telefone_contato" => &mut form.contact_phone,
                "data_desaparecimento" => &mut form.disappearance_date,
                "cidade" => &mut form.city,
                "estado" => &mut form.state,
                "local_desaparecimento" => &mut form.reference_point,
                "caracteristicas" => &mut form.characteristics,
                _ => {
                    debug!("Ignoring form field {}", name);
                    continue;
                }
            };
            *slot = Some(value);
        }

        Ok(form)
    }

    /// Photo part, if present with a non-empty filename
    pub fn photo(&self) -> Option<&PhotoUpload> {
        self.photo.as_ref().filter(|photo| !photo.file_name.is_empty())
    }

    /// New Missing record pointing at the stored photo
    ///
    /// The id is left empty; the store assigns it on append.
    pub fn into_record(self, photo: &StoredUpload) -> MissingPersonRecord {
        MissingPersonRecord {
            id: String::new(),
            full_name: self.full_name,
            birth_date: self.birth_date,
            contact_phone: self.contact_phone,
            sex: Some(SEX_NOT_INFORMED.to_string()),
            disappearance_date: self.disappearance_date,
            disappearance_location: DisappearanceLocation {
                city: self.city,
                state: self.state,
                reference_point: self.reference_point,
            },
            characteristics: self.characteristics,
            photo_url: Some(photo.url.clone()),
            status: RecordStatus::Missing,
            extra: Default::default(),
        }
    }
}

fn malformed(err: MultipartError) -> ApiError {
    ApiError::BadRequest(err.body_text())
}

pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/cadastro", get(registration_form).post(submit_registration))
}

/// GET /cadastro
async fn registration_form(State(state): State<AppState>) -> ApiResult<Html<String>> {
    render(&state, Page::Register).await
}

/// POST /cadastro
pub async fn submit_registration(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = RegistrationForm::from_multipart(multipart).await?;
    let Some(photo) = form.photo().cloned() else {
        return Err(ApiError::MissingPhoto);
    };

    let stored = store_photo(&state, photo).await?;
    let record = state.store.append(form.into_record(&stored)).await.map_err(|e| {
        error!("Failed to save record for {}: {}", stored.file_name, e);
        ApiError::from(e)
    })?;

    info!("Registered record {} with photo {}", record.id, stored.url);
    Ok((StatusCode::FOUND, [(header::LOCATION, AFTER_SUBMIT)]).into_response())
}

async fn store_photo(state: &AppState, photo: PhotoUpload) -> ApiResult<StoredUpload> {
    let uploads = state.uploads.clone();
    let result = tokio::task::spawn_blocking(move || uploads.store(&photo.file_name, &photo.bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("Upload task failed: {}", e)))?;

    match result {
        Ok(stored) => Ok(stored),
        // Name reduced to nothing (e.g. "..")
        Err(Error::Validation(_)) => Err(ApiError::MissingPhoto),
        Err(Error::Storage(msg)) => Err(ApiError::PhotoSave(msg)),
        Err(e) => Err(ApiError::PhotoSave(e.to_string())),
    }
}
