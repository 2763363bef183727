mod common;

use actix_web::{http::StatusCode, test, web, App};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ordre_virement_server::directory::model::{AccountSummary, Beneficiary};
use ordre_virement_server::{api_config, AppState, ErrorResponse};
use serde_json::json;

fn state() -> web::Data<AppState> {
    web::Data::new(AppState::with_directory(common::seeded_directory()))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(api_config)),
        )
        .await
    };
}

fn order(payer: &str) -> serde_json::Value {
    json!({
        "payerAccountId": payer,
        "beneficiaryId": "6",
        "amount": "1234.56",
        "purpose": "Facture #2024-07-A45",
        "express": false,
        "date": "2025-03-07"
    })
}

#[actix_web::test]
async fn test_list_accounts() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/accounts").to_request();
    let accounts: Vec<AccountSummary> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(accounts.len(), 6);
    assert_eq!(accounts[0].company_name, "AKOR FOODS");
    assert!(accounts.iter().all(|a| a.letterhead.is_none()));
}

#[actix_web::test]
async fn test_unknown_account_is_404() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/accounts/acc42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_and_delete_account() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/accounts")
        .set_json(json!({
            "companyName": "ATLAS TRADING",
            "rib": "011780000012345678901234",
            "bankAddress": "BMCE Bank, 140 Avenue Hassan II, Casablanca",
            "signatoryName": "M. Tazi"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: AccountSummary = test::read_body_json(resp).await;
    assert_eq!(created.company_name, "ATLAS TRADING");
    assert!(created.letterhead.is_none());

    let req = test::TestRequest::get().uri("/api/accounts").to_request();
    let accounts: Vec<AccountSummary> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(accounts.len(), 7);

    let uri = format!("/api/accounts/{}", created.id);
    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_account_with_missing_field_is_400() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/accounts")
        .set_json(json!({
            "companyName": "ATLAS TRADING",
            "rib": "011780000012345678901234",
            "bankAddress": "",
            "signatoryName": "M. Tazi"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "ValidationError");
    assert!(body.message.contains("bankAddress"));
}

#[actix_web::test]
async fn test_supplier_search_and_create() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/suppliers?search=gamma")
        .to_request();
    let found: Vec<Beneficiary> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Logistique Gamma");

    let req = test::TestRequest::post()
        .uri("/api/suppliers")
        .set_json(json!({ "name": "Transports Delta", "rib": "230787000215400030059999" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/suppliers")
        .set_json(json!({ "name": "Bad", "rib": "12AB" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "ValidationError");
}

#[actix_web::test]
async fn test_generate_template_order() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/transfer-orders")
        .set_json(order("acc1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("ordre_virement_Services_Beta_SARL.pdf"));

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));
    assert!(common::first_page_text(&body).contains("ORDRE DE VIREMENT BANCAIRE"));
}

#[actix_web::test]
async fn test_generate_on_uploaded_letterhead() {
    let state = state();
    let app = app!(state);

    let data = format!(
        "data:application/pdf;base64,{}",
        BASE64.encode(common::a4_letterhead())
    );
    let req = test::TestRequest::put()
        .uri("/api/accounts/acc2/letterhead")
        .set_json(json!({ "name": "entete mgm.pdf", "data": data }))
        .to_request();
    let summary: AccountSummary = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary.letterhead.as_deref(), Some("entete mgm.pdf"));

    let req = test::TestRequest::post()
        .uri("/api/transfer-orders")
        .set_json(order("acc2"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let text = common::first_page_text(&body);
    assert!(text.contains("ENTETE 1"));
    assert!(!text.contains("ORDRE DE VIREMENT BANCAIRE"));
}

#[actix_web::test]
async fn test_corrupt_letterhead_is_422() {
    let directory = common::seeded_directory();
    // Passes the signature check at upload, fails to parse at generation.
    directory
        .set_letterhead("acc3", "abime.pdf", &BASE64.encode(b"%PDF-1.4 not really"))
        .unwrap();
    let state = web::Data::new(AppState::with_directory(directory));
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/transfer-orders")
        .set_json(order("acc3"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.message.contains("papier à en-tête"));
}

#[actix_web::test]
async fn test_non_pdf_letterhead_upload_is_400() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::put()
        .uri("/api/accounts/acc1/letterhead")
        .set_json(json!({ "name": "photo.png", "data": BASE64.encode(b"\x89PNG....") }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_invalid_order_is_400() {
    let state = state();
    let app = app!(state);

    let mut body = order("acc1");
    body["amount"] = json!("0");
    let req = test::TestRequest::post()
        .uri("/api/transfer-orders")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/transfer-orders")
        .set_json(order("unknown"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = test::read_body_json(resp).await;
    assert!(error.message.contains("payerAccountId"));
}

#[actix_web::test]
async fn test_sub_cent_amount_prints_rounded_figures() {
    let state = state();
    let app = app!(state);

    let mut body = order("acc1");
    body["amount"] = json!("9,999");
    let req = test::TestRequest::post()
        .uri("/api/transfer-orders")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = common::first_page_text(&body);
    assert!(text.contains("10.00 MAD"));
    assert!(text.contains("Dix dirhams."));
}

#[actix_web::test]
async fn test_busy_generation_is_409() {
    let state = state();
    let app = app!(state);

    let _guard = state.transfers.try_begin().unwrap();
    let req = test::TestRequest::post()
        .uri("/api/transfer-orders")
        .set_json(order("acc1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_currencies() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/currencies").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["code"], "MAD");
    assert_eq!(body[0]["mainUnit"], "dirham");
}
