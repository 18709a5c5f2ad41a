/*!
 * Tests for application controller functionality
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use subtran::app_config::Config;
use subtran::app_controller::Controller;
use subtran::errors::{AppError, ProviderError, SubtitleError, TranslationError};
use subtran::subtitle_processor::{SubtitleBlock, SubtitleCollection};
use crate::common::{self, SAMPLE_SRT, MULTILINE_SRT};
use crate::common::mock_backends::MockBackend;

/// Test creating a controller with a specific configuration
#[test]
fn test_with_config_withValidConfig_shouldCreateController() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.config().source_language, "en");
    assert_eq!(controller.config().target_language, "fr");
    Ok(())
}

/// Test default output naming
#[test]
fn test_output_path_for_withInputFiles_shouldAppendTargetLanguage() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;

    assert_eq!(controller.output_path_for(&PathBuf::from("movie.srt")), PathBuf::from("movie.fr.srt"));
    assert_eq!(controller.output_path_for(&PathBuf::from("dir/show.en.srt")), PathBuf::from("dir/show.en.fr.srt"));
    Ok(())
}

/// Test that blocks are translated one by one, in order, with the configured languages
#[tokio::test]
async fn test_translate_collection_withMockBackend_shouldTranslateEveryBlockInOrder() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    let backend = MockBackend::new();

    let mut subtitles = SubtitleCollection {
        source_file: PathBuf::from("test.srt"),
        blocks: SubtitleCollection::parse_srt_string(MULTILINE_SRT),
    };
    controller.translate_collection(&mut subtitles, &backend).await?;

    let tracker = backend.tracker();
    let tracker = tracker.lock().unwrap();
    assert_eq!(tracker.call_count, 3);
    assert_eq!(tracker.requests, vec![
        "This is a test subtitle.",
        "It contains\nmultiple lines.",
        "For testing purposes.",
    ]);
    assert_eq!(tracker.last_languages, Some(("en".to_string(), "fr".to_string())));

    assert_eq!(subtitles.blocks[1].lines, vec!["[fr] It contains", "[fr] multiple lines."]);
    assert_eq!(subtitles.blocks[1].index, "2");
    assert_eq!(subtitles.blocks[1].timestamp, "00:00:05,000 --> 00:00:09,000");
    Ok(())
}

/// Test that blocks without caption text are not sent to the backend
#[tokio::test]
async fn test_translate_collection_withEmptyBlock_shouldSkipBackendCall() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    let backend = MockBackend::new();

    let mut subtitles = SubtitleCollection::new(PathBuf::from("test.srt"));
    subtitles.blocks.push(SubtitleBlock::new("1", "T1", Vec::new()));
    subtitles.blocks.push(SubtitleBlock::new("2", "T2", vec!["Hi".to_string()]));

    controller.translate_collection(&mut subtitles, &backend).await?;

    assert_eq!(backend.tracker().lock().unwrap().call_count, 1);
    assert!(subtitles.blocks[0].is_empty());
    assert_eq!(subtitles.blocks[1].lines, vec!["[fr] Hi"]);
    Ok(())
}

/// Test that the first backend failure stops the loop
#[tokio::test]
async fn test_translate_collection_withFailingBackend_shouldStopAtFirstError() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    let backend = MockBackend::failing_on(2);

    let mut subtitles = SubtitleCollection {
        source_file: PathBuf::from("test.srt"),
        blocks: SubtitleCollection::parse_srt_string(MULTILINE_SRT),
    };
    let error = controller.translate_collection(&mut subtitles, &backend).await.unwrap_err();

    let TranslationError::Block { index, source } = error;
    assert_eq!(index, "2");
    assert!(matches!(source, ProviderError::ApiError { status_code: 500, .. }));
    assert_eq!(backend.tracker().lock().unwrap().call_count, 2);
    Ok(())
}

/// Test a full file run with a mock backend
#[tokio::test]
async fn test_translate_file_with_backend_withMockBackend_shouldWriteTranslatedFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;
    let output = temp_dir.path().join("movie.fr.srt");

    let controller = Controller::with_config(Config::default())?;
    let written = controller
        .translate_file_with_backend(&MockBackend::new(), &input, &output, false)
        .await?;

    assert_eq!(written, Some(output.clone()));
    assert_eq!(
        fs::read_to_string(&output)?,
        "1\n00:00:01,000 --> 00:00:02,000\n[fr] Hello world\n\n2\n00:00:03,000 --> 00:00:04,000\n[fr] Goodbye\n"
    );
    Ok(())
}

/// Test that an existing output is kept unless overwriting is forced
#[tokio::test]
async fn test_translate_file_with_backend_withExistingOutput_shouldRespectForceFlag() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;
    let output = common::create_test_file(temp_dir.path(), "movie.fr.srt", "previous")?;

    let controller = Controller::with_config(Config::default())?;
    let backend = MockBackend::new();

    let skipped = controller.translate_file_with_backend(&backend, &input, &output, false).await?;
    assert_eq!(skipped, None);
    assert_eq!(fs::read_to_string(&output)?, "previous");
    assert_eq!(backend.tracker().lock().unwrap().call_count, 0);

    let written = controller.translate_file_with_backend(&backend, &input, &output, true).await?;
    assert_eq!(written, Some(output.clone()));
    assert!(fs::read_to_string(&output)?.contains("[fr] Goodbye"));
    Ok(())
}

/// Test that a backend failure leaves a previous output untouched
#[tokio::test]
async fn test_translate_file_with_backend_withBackendFailure_shouldNotTouchOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", SAMPLE_SRT)?;
    let output = common::create_test_file(temp_dir.path(), "movie.fr.srt", "previous")?;

    let controller = Controller::with_config(Config::default())?;
    let result = controller
        .translate_file_with_backend(&MockBackend::failing_on(1), &input, &output, true)
        .await;

    assert!(matches!(result, Err(AppError::Translation(TranslationError::Block { .. }))));
    assert_eq!(fs::read_to_string(&output)?, "previous");
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 2);
    Ok(())
}

/// Test that an unreadable input fails before any backend call
#[tokio::test]
async fn test_translate_file_with_backend_withMissingInput_shouldReturnDecodeError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let backend = MockBackend::new();

    let controller = Controller::with_config(Config::default())?;
    let result = controller
        .translate_file_with_backend(&backend, &temp_dir.path().join("missing.srt"), &temp_dir.path().join("out.srt"), false)
        .await;

    assert!(matches!(result, Err(AppError::Subtitle(SubtitleError::Decode { .. }))));
    assert_eq!(backend.tracker().lock().unwrap().call_count, 0);
    assert!(!temp_dir.path().join("out.srt").exists());
    Ok(())
}
