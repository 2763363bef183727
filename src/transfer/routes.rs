use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use utoipa::ToSchema;

use super::assembler::TransferOrderInput;
use super::service::TransferError;
use super::Currency;
use crate::{AppState, ErrorResponse};

pub const MALFORMED_LETTERHEAD_MESSAGE: &str =
    "Le fichier papier à en-tête est peut-être corrompu ou dans un format incorrect.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Une erreur est survenue lors de la génération du PDF.";
pub const BUSY_MESSAGE: &str =
    "Un ordre de virement est déjà en cours de génération. Veuillez patienter.";

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub code: String,
    pub main_unit: String,
    pub sub_unit: String,
}

impl From<Currency> for CurrencyInfo {
    fn from(currency: Currency) -> Self {
        Self {
            code: currency.code().to_string(),
            main_unit: currency.main_unit().to_string(),
            sub_unit: currency.sub_unit().to_string(),
        }
    }
}

/// HTTP response for a failed generation.
pub fn transfer_error_response(error: &TransferError) -> HttpResponse {
    match error {
        TransferError::Validation(e) => {
            HttpResponse::BadRequest().json(ErrorResponse::new("ValidationError", &e.to_string()))
        }
        TransferError::Busy => HttpResponse::Conflict().json(ErrorResponse::conflict(BUSY_MESSAGE)),
        TransferError::Compose(e) if e.is_malformed_letterhead() => {
            HttpResponse::UnprocessableEntity().json(ErrorResponse::new(
                "MalformedLetterhead",
                MALFORMED_LETTERHEAD_MESSAGE,
            ))
        }
        TransferError::Compose(_) | TransferError::Export(_) => HttpResponse::InternalServerError()
            .json(ErrorResponse::internal_error(GENERATION_FAILED_MESSAGE)),
    }
}

#[utoipa::path(
    post,
    path = "/api/transfer-orders",
    tag = "Transfer Orders",
    request_body = TransferOrderInput,
    responses(
        (status = 200, description = "Transfer order letter", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 409, description = "A generation is already running", body = ErrorResponse),
        (status = 422, description = "Letterhead file is corrupt", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn create_transfer_order(
    state: web::Data<AppState>,
    item: web::Json<TransferOrderInput>,
) -> impl Responder {
    match state.transfers.generate(item.into_inner()).await {
        Ok(file) => file.into_response(),
        Err(e) => transfer_error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "Transfer Orders",
    responses(
        (status = 200, description = "Supported currencies", body = Vec<CurrencyInfo>)
    )
)]
pub async fn get_currencies() -> impl Responder {
    let currencies: Vec<CurrencyInfo> = Currency::ALL.into_iter().map(CurrencyInfo::from).collect();
    HttpResponse::Ok().json(currencies)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/transfer-orders").route(web::post().to(create_transfer_order)),
    )
    .service(web::resource("/currencies").route(web::get().to(get_currencies)));
}
