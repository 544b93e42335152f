use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::{ColorSpace, Dpi, PageImage};
use crate::image_pipeline::conversions::{FolderToTiffPipeline, PipelineStage};
use crate::image_pipeline::loader::{DpiStrategy, PageReader};
use crate::image_pipeline::tiff::{
    ConversionConfig, MultiPageWriter, TiffCompression, WriteOptions, WriteOutcome,
};

/// Reads file contents as `<dpi or '-'>`; "bad" fails to decode.
struct MockReader;

impl PageReader for MockReader {
    fn read_page(&self, path: &Path, data: &[u8], color_space: ColorSpace) -> Result<PageImage> {
        let text = String::from_utf8_lossy(data);
        if text.trim() == "bad" {
            return Err(ConversionError::DecodeError("Mock decode error".to_string()));
        }
        Ok(PageImage {
            source: path.to_path_buf(),
            width: 2,
            height: 2,
            color_space,
            data: vec![0; 4 * color_space.channels()],
            dpi: text.trim().parse().ok(),
        })
    }
}

#[derive(Default, Clone)]
struct Calls {
    pages: Arc<Mutex<Vec<Vec<String>>>>,
    options: Arc<Mutex<Vec<WriteOptions>>>,
}

struct MockWriter {
    should_fail: bool,
    calls: Calls,
}

impl MultiPageWriter for MockWriter {
    fn write_pages(&self, pages: &[PageImage], output: &mut dyn Write, options: &WriteOptions) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        let names = pages
            .iter()
            .map(|p| p.source.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        self.calls.pages.lock().unwrap().push(names);
        self.calls.options.lock().unwrap().push(*options);
        output.write_all(b"mock tiff")?;
        Ok(())
    }
}

fn folder(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn pipeline(config: ConversionConfig, should_fail: bool) -> (FolderToTiffPipeline<MockReader, MockWriter>, Calls) {
    let calls = Calls::default();
    let writer = MockWriter {
        should_fail,
        calls: calls.clone(),
    };
    (FolderToTiffPipeline::with_custom(MockReader, writer, config), calls)
}

#[test]
fn test_successful_conversion() {
    let input = folder(&[("b.png", "-"), ("a.jpg", "300"), ("c.jpeg", "bad"), ("notes.txt", "72")]);
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("out.tif");

    let (pipeline, calls) = pipeline(ConversionConfig::default(), false);
    let report = pipeline.process(input.path(), &output).unwrap();

    assert_eq!(report.stage, PipelineStage::Done);
    assert_eq!(report.pages, 2);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("c.jpeg"));
    assert_eq!(report.dpi, Dpi::new(300, 300));
    assert!(report.wrote_file());
    assert!(report.timings.get(PipelineStage::Loading).is_some());
    assert!(report.timings.get(PipelineStage::Converting).is_some());

    assert_eq!(*calls.pages.lock().unwrap(), vec![vec!["a.jpg", "b.png"]]);
    let options = calls.options.lock().unwrap()[0];
    assert_eq!(options.compression, TiffCompression::Jpeg);
    assert_eq!(options.quality, 30);
    assert_eq!(options.dpi, Dpi::new(300, 300));
    assert_eq!(std::fs::read(&output).unwrap(), b"mock tiff");
}

#[test]
fn test_writer_failure() {
    let input = folder(&[("a.png", "-")]);
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("out.tif");

    let (pipeline, _) = pipeline(ConversionConfig::default(), true);
    let result = pipeline.process(input.path(), &output);

    assert!(matches!(result, Err(ConversionError::EncodeError(_))));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_folder() {
    let out_dir = tempfile::tempdir().unwrap();
    let (pipeline, calls) = pipeline(ConversionConfig::default(), false);
    let result = pipeline.process(out_dir.path().join("nope"), out_dir.path().join("out.tif"));

    assert!(matches!(result, Err(ConversionError::InputReadError(_))));
    assert!(calls.pages.lock().unwrap().is_empty());
}

#[test]
fn test_empty_folder_is_silent_by_default() {
    let input = folder(&[("scan.bmp", "300")]);
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("out.tif");

    let (pipeline, calls) = pipeline(ConversionConfig::default(), false);
    let report = pipeline.process(input.path(), &output).unwrap();

    assert_eq!(report.outcome, WriteOutcome::EmptyBatch);
    assert_eq!(report.dpi, Dpi::DEFAULT);
    assert!(!report.wrote_file());
    assert!(!output.exists());
    assert!(calls.pages.lock().unwrap().is_empty());
}

#[test]
fn test_empty_folder_can_be_an_error() {
    let input = folder(&[]);
    let out_dir = tempfile::tempdir().unwrap();
    let config = ConversionConfig::builder().fail_on_empty(true).build();

    let (pipeline, _) = pipeline(config, false);
    let result = pipeline.process(input.path(), out_dir.path().join("out.tif"));

    assert!(matches!(result, Err(ConversionError::EmptyBatch(_))));
}

#[test]
fn test_invalid_quality_fails_before_loading() {
    let input = folder(&[("a.png", "-")]);
    let out_dir = tempfile::tempdir().unwrap();
    let config = ConversionConfig::builder().quality(0).build();

    let (pipeline, calls) = pipeline(config, false);
    let result = pipeline.process(input.path(), out_dir.path().join("out.tif"));

    assert!(matches!(result, Err(ConversionError::InvalidQuality(0))));
    assert!(calls.pages.lock().unwrap().is_empty());
    assert!(FolderToTiffPipeline::new(ConversionConfig::builder().quality(101).build()).is_err());
}

#[test]
fn test_reuse_does_not_leak_dpi() {
    let with_dpi = folder(&[("a.jpg", "300")]);
    let without_dpi = folder(&[("b.png", "-")]);
    let out_dir = tempfile::tempdir().unwrap();

    let (pipeline, calls) = pipeline(ConversionConfig::default(), false);
    pipeline.process(with_dpi.path(), out_dir.path().join("1.tif")).unwrap();
    let report = pipeline.process(without_dpi.path(), out_dir.path().join("2.tif")).unwrap();

    assert_eq!(report.dpi, Dpi::DEFAULT);
    let options = calls.options.lock().unwrap();
    assert_eq!(options[0].dpi, Dpi::new(300, 300));
    assert_eq!(options[1].dpi, Dpi::DEFAULT);
}

#[test]
fn test_set_config_updates_dpi_policy() {
    let input = folder(&[("a.jpg", "300"), ("b.jpg", "72")]);
    let out_dir = tempfile::tempdir().unwrap();

    let (mut pipeline, _) = pipeline(ConversionConfig::default(), false);
    assert_eq!(pipeline.loader().dpi_strategy(), DpiStrategy::LastFound);

    let config = ConversionConfig::builder()
        .dpi_strategy(DpiStrategy::Fixed)
        .default_dpi(Dpi::new(150, 150))
        .compression(TiffCompression::Lzw)
        .build();
    pipeline.set_config(config);

    assert_eq!(pipeline.config().compression, TiffCompression::Lzw);
    assert_eq!(pipeline.loader().default_dpi(), Dpi::new(150, 150));
    let report = pipeline.process(input.path(), out_dir.path().join("out.tif")).unwrap();
    assert_eq!(report.dpi, Dpi::new(150, 150));
}
