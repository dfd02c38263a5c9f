use anyhow::Result;
use httpmock::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;
use upload_assist::core::FormSubmitter;
use upload_assist::{
    fetch_csrf_token, AssistConfig, AssistError, CsrfToken, DroppedFile, HttpSubmitter,
    SubmitOutcome, UploadForm, UploadPage, View,
};

fn config_for(endpoint: String) -> AssistConfig {
    let mut config = AssistConfig::default();
    config.submit.endpoint = Some(endpoint);
    config.submit.timeout_seconds = Some(5);
    config
}

fn filled_form() -> UploadForm {
    UploadForm {
        trans_num: "10827900900900".to_string(),
        ccd_num: "1234567890".to_string(),
        port_of_entry: "440".to_string(),
        eta_date: "2023-01-31".to_string(),
        eta_time: "12:30".to_string(),
        userfile: Some(DroppedFile::from_bytes(
            "10827900900900_440.pdf",
            b"testing, testing, 1,2,3".to_vec(),
        )),
    }
}

#[tokio::test]
async fn test_successful_submit_sends_fields_file_and_csrf() -> Result<()> {
    let server = MockServer::start();
    let upload_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload/")
            .header("X-CSRFToken", "tok123")
            .header("Cookie", "csrftoken=tok123")
            .body_contains("name=\"trans_num\"")
            .body_contains("10827900900900")
            .body_contains("name=\"userfile\"; filename=\"10827900900900_440.pdf\"")
            .body_contains("testing, testing, 1,2,3");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body("Success! 10827900900900 uploaded.");
    });

    let submitter = HttpSubmitter::new(&config_for(server.url("/upload/")))?;
    let outcome = submitter
        .submit(&filled_form(), Some(&CsrfToken::new("tok123")))
        .await?;

    upload_mock.assert();
    assert_eq!(
        outcome,
        SubmitOutcome::Success("Success! 10827900900900 uploaded.".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_validation_errors_are_returned_per_field() -> Result<()> {
    let server = MockServer::start();
    let upload_mock = server.mock(|when, then| {
        when.method(POST).path("/upload/");
        then.status(200).json_body(serde_json::json!({
            "errors": {
                "trans_num": [{"message": "Transaction must be 14 digits.", "code": "min_value"}],
                "port_of_entry": [
                    {"message": "Please enter a valid port of entry.", "code": "invalid"},
                    {"message": " Check the code.", "code": "custom"}
                ]
            }
        }));
    });

    let submitter = HttpSubmitter::new(&config_for(server.url("/upload/")))?;
    let outcome = submitter.submit(&filled_form(), None).await?;
    upload_mock.assert();

    let SubmitOutcome::Rejected(errors) = outcome else {
        panic!("expected field errors, got {:?}", outcome);
    };
    let joined: Vec<(String, String)> = errors
        .concatenated()
        .map(|(field, text)| (field.to_string(), text))
        .collect();
    assert_eq!(
        joined,
        vec![
            (
                "port_of_entry".to_string(),
                "Please enter a valid port of entry. Check the code.".to_string()
            ),
            ("trans_num".to_string(), "Transaction must be 14 digits.".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_unexpected_errors_shape_never_counts_as_success() -> Result<()> {
    let server = MockServer::start();
    let upload_mock = server.mock(|when, then| {
        when.method(POST).path("/upload/");
        then.status(200).json_body(serde_json::json!({
            "errors": {"trans_num": ["Transaction must be 14 digits."]}
        }));
    });

    let submitter = HttpSubmitter::new(&config_for(server.url("/upload/")))?;
    let mut page = UploadPage::default();
    page.handle_drop(vec![DroppedFile::from_bytes(
        "12345678901234_440.pdf",
        b"%PDF".to_vec(),
    )]);
    assert_eq!(page.form().trans_num, "12345678901234");

    let result = page.submit(&submitter, None).await;
    upload_mock.assert();

    assert!(matches!(result, Err(AssistError::SerializationError(_))));
    // 表單內容必須保留
    assert_eq!(page.form().trans_num, "12345678901234");
    assert_eq!(page.form().port_of_entry, "440");
    assert_eq!(page.view(), View::Fields);
    assert_eq!(page.message(), "");
    Ok(())
}

#[tokio::test]
async fn test_server_error_without_payload_is_an_error() -> Result<()> {
    let server = MockServer::start();
    let upload_mock = server.mock(|when, then| {
        when.method(POST).path("/upload/");
        then.status(403).body("CSRF verification failed.");
    });

    let submitter = HttpSubmitter::new(&config_for(server.url("/upload/")))?;
    let result = submitter.submit(&filled_form(), None).await;
    upload_mock.assert();

    match result {
        Err(AssistError::HttpStatus { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "CSRF verification failed.");
        }
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_file_is_read_from_disk() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"on-disk contents")?;

    let server = MockServer::start();
    let upload_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload/")
            .body_contains("on-disk contents");
        then.status(200).body("OK");
    });

    let mut form = filled_form();
    form.userfile = Some(DroppedFile::from_path(file.path()));

    let submitter = HttpSubmitter::new(&config_for(server.url("/upload/")))?;
    let outcome = submitter.submit(&form, None).await?;

    upload_mock.assert();
    assert_eq!(outcome, SubmitOutcome::Success("OK".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_reported_before_sending() -> Result<()> {
    let server = MockServer::start();
    let upload_mock = server.mock(|when, then| {
        when.method(POST).path("/upload/");
        then.status(200).body("OK");
    });

    let mut form = filled_form();
    form.userfile = Some(DroppedFile::from_path("/definitely/not/here/scan.pdf"));

    let submitter = HttpSubmitter::new(&config_for(server.url("/upload/")))?;
    let result = submitter.submit(&form, None).await;

    assert!(matches!(result, Err(AssistError::MissingFile { .. })));
    upload_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_fetch_csrf_token_from_set_cookie() -> Result<()> {
    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .header("Set-Cookie", "csrftoken=AbC%2F123; Path=/; SameSite=Lax")
            .body("<form id=\"form-fields\"></form>");
    });

    let client = reqwest::Client::new();
    let token = fetch_csrf_token(&client, &server.url("/"), "csrftoken").await?;

    page_mock.assert();
    assert_eq!(token, Some(CsrfToken::new("AbC/123")));
    Ok(())
}

#[tokio::test]
async fn test_fetch_csrf_token_absent() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body("no cookies here");
    });

    let client = reqwest::Client::new();
    let token = fetch_csrf_token(&client, &server.url("/"), "csrftoken").await?;
    assert_eq!(token, None);
    Ok(())
}
