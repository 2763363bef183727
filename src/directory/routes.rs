use actix_web::{web, HttpResponse, Responder};

use super::model::{
    AccountSummary, Beneficiary, CreateAccountRequest, CreateSupplierRequest, SupplierQuery,
    UpdateAccountRequest, UploadLetterheadRequest,
};
use super::DirectoryError;
use crate::{AppState, ErrorResponse};

fn directory_error_response(error: &DirectoryError) -> HttpResponse {
    match error {
        DirectoryError::AccountNotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(&error.to_string()))
        }
        DirectoryError::Invalid(e) => {
            HttpResponse::BadRequest().json(ErrorResponse::new("ValidationError", &e.to_string()))
        }
        DirectoryError::LetterheadEncoding(_) | DirectoryError::LetterheadNotPdf => {
            log::warn!("Letterhead upload rejected: {}", error);
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string()))
        }
    }
}

fn account_response(result: Result<super::model::BankAccount, DirectoryError>) -> HttpResponse {
    match result {
        Ok(account) => HttpResponse::Ok().json(AccountSummary::from(&account)),
        Err(e) => directory_error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "Directory",
    responses(
        (status = 200, description = "Payer accounts, by company name", body = Vec<AccountSummary>)
    )
)]
pub async fn get_all_accounts(state: web::Data<AppState>) -> impl Responder {
    let accounts: Vec<AccountSummary> = state
        .directory
        .accounts()
        .iter()
        .map(AccountSummary::from)
        .collect();
    HttpResponse::Ok().json(accounts)
}

#[utoipa::path(
    post,
    path = "/api/accounts",
    tag = "Directory",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountSummary),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse)
    )
)]
pub async fn create_account(
    state: web::Data<AppState>,
    item: web::Json<CreateAccountRequest>,
) -> impl Responder {
    match state.directory.add_account(item.into_inner()) {
        Ok(account) => HttpResponse::Created().json(AccountSummary::from(&account)),
        Err(e) => directory_error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    tag = "Directory",
    params(
        ("id" = String, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Payer account", body = AccountSummary),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn get_account(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match state.directory.account(&id) {
        Some(account) => HttpResponse::Ok().json(AccountSummary::from(&account)),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found("Account not found")),
    }
}

#[utoipa::path(
    put,
    path = "/api/accounts/{id}",
    tag = "Directory",
    params(
        ("id" = String, Path, description = "Account ID")
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountSummary),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn update_account(
    state: web::Data<AppState>,
    path: web::Path<String>,
    item: web::Json<UpdateAccountRequest>,
) -> impl Responder {
    let id = path.into_inner();
    account_response(state.directory.update_account(&id, item.into_inner()))
}

#[utoipa::path(
    delete,
    path = "/api/accounts/{id}",
    tag = "Directory",
    params(
        ("id" = String, Path, description = "Account ID")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match state.directory.remove_account(&id) {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => directory_error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/accounts/{id}/letterhead",
    tag = "Directory",
    params(
        ("id" = String, Path, description = "Account ID")
    ),
    request_body = UploadLetterheadRequest,
    responses(
        (status = 200, description = "Letterhead attached", body = AccountSummary),
        (status = 400, description = "Not a base64 PDF", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn upload_letterhead(
    state: web::Data<AppState>,
    path: web::Path<String>,
    item: web::Json<UploadLetterheadRequest>,
) -> impl Responder {
    let id = path.into_inner();
    account_response(state.directory.set_letterhead(&id, &item.name, &item.data))
}

#[utoipa::path(
    delete,
    path = "/api/accounts/{id}/letterhead",
    tag = "Directory",
    params(
        ("id" = String, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Letterhead removed", body = AccountSummary),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
pub async fn delete_letterhead(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    account_response(state.directory.clear_letterhead(&id))
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Directory",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive name filter")
    ),
    responses(
        (status = 200, description = "Suppliers", body = Vec<Beneficiary>)
    )
)]
pub async fn get_suppliers(
    state: web::Data<AppState>,
    query: web::Query<SupplierQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(state.directory.suppliers(query.search.as_deref()))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Directory",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = Beneficiary),
        (status = 400, description = "Invalid field", body = ErrorResponse)
    )
)]
pub async fn create_supplier(
    state: web::Data<AppState>,
    item: web::Json<CreateSupplierRequest>,
) -> impl Responder {
    match state.directory.add_supplier(&item.name, &item.rib) {
        Ok(supplier) => HttpResponse::Created().json(supplier),
        Err(e) => directory_error_response(&e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/accounts")
            .route(web::get().to(get_all_accounts))
            .route(web::post().to(create_account)),
    )
    .service(
        web::resource("/accounts/{id}")
            .route(web::get().to(get_account))
            .route(web::put().to(update_account))
            .route(web::delete().to(delete_account)),
    )
    .service(
        web::resource("/accounts/{id}/letterhead")
            .route(web::put().to(upload_letterhead))
            .route(web::delete().to(delete_letterhead)),
    )
    .service(
        web::resource("/suppliers")
            .route(web::get().to(get_suppliers))
            .route(web::post().to(create_supplier)),
    );
}
