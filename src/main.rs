use clap::Parser;
use upload_assist::config::cli::resolve_config;
use upload_assist::config::SubmitArgs;
use upload_assist::utils::logger;
use upload_assist::{
    csrf_from_cookie_str, fetch_csrf_token, AssistConfig, AssistError, CliConfig, Command,
    DropOutcome, DroppedFile, FilenameFieldExtractor, HttpSubmitter, SubmitOutcome, UploadPage,
};

const EXIT_FAILURE: i32 = 1;
const EXIT_REJECTED: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(EXIT_FAILURE);
        }
    };
    let extractor = FilenameFieldExtractor::new(config.extract.token_policy);

    match &cli.command {
        Command::Extract { filenames } => {
            for filename in filenames {
                let parsed = extractor.classify(filename);
                let report = serde_json::json!({
                    "filename": filename,
                    "format": if parsed.is_strict() { "strict" } else { "fallback" },
                    "fields": parsed.fields(),
                });
                println!("{}", serde_json::to_string(&report)?);
            }
        }
        Command::Submit(args) => {
            let exit_code = match run_submit(&config, extractor, args).await {
                Ok(code) => code,
                Err(e) => {
                    tracing::error!("❌ Upload failed: {}", e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    EXIT_FAILURE
                }
            };
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run_submit(
    config: &AssistConfig,
    extractor: FilenameFieldExtractor,
    args: &SubmitArgs,
) -> Result<i32, AssistError> {
    config.require_endpoint()?;
    let submitter = HttpSubmitter::new(config)?;
    let mut page = UploadPage::new(extractor);

    let files = args.files.iter().map(DroppedFile::from_path).collect();
    if let DropOutcome::Rejected = page.handle_drop(files) {
        eprintln!("❌ {}", page.message());
        return Ok(EXIT_FAILURE);
    }
    if !page.message().is_empty() {
        println!("ℹ️  {}", page.message());
    }

    args.apply_overrides(page.form_mut())?;
    for (field, value) in page.form().text_fields() {
        println!("   {:<14} {}", field, value);
    }

    // 取得 CSRF token
    let cookie_name = &config.submit.csrf_cookie_name;
    let mut csrf = args
        .csrf_cookie
        .as_deref()
        .and_then(|cookies| csrf_from_cookie_str(cookies, cookie_name));
    if csrf.is_none() && args.fetch_csrf {
        if let Some(page_url) = config.csrf_page() {
            csrf = fetch_csrf_token(submitter.client(), page_url, cookie_name).await?;
        }
    }

    match page.submit(&submitter, csrf.as_ref()).await? {
        SubmitOutcome::Success(_) => {
            println!("✅ {}", page.message());
            Ok(0)
        }
        SubmitOutcome::Rejected(errors) => {
            for (field, _) in errors.concatenated() {
                let text = page.field_message(field).unwrap_or_default();
                eprintln!("❌ {}: {}", field, text);
            }
            Ok(EXIT_REJECTED)
        }
    }
}
