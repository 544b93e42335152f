use std::path::Path;

use tracing::{debug, error, info, instrument};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    conversions::report::{PipelineStage, ProcessReport, StageTimer, StageTimings},
    loader::{CodecPageReader, FolderLoader, PageReader},
    tiff::{ConversionConfig, MultiPageWriter, StandardTiffWriter, TiffConverter},
};

pub struct FolderToTiffPipeline<R: PageReader, W: MultiPageWriter> {
    loader: FolderLoader<R>,
    converter: TiffConverter<W>,
    config: ConversionConfig,
}

impl FolderToTiffPipeline<CodecPageReader, StandardTiffWriter> {
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_custom(CodecPageReader, StandardTiffWriter, config))
    }
}

impl<R: PageReader, W: MultiPageWriter> FolderToTiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            loader: FolderLoader::with_reader(reader, config.dpi_strategy, config.default_dpi),
            converter: TiffConverter::with_writer(writer),
            config,
        }
    }

    fn advance(stage: &mut PipelineStage, next: PipelineStage) {
        debug!("Pipeline stage: {} -> {}", stage, next);
        *stage = next;
    }

    /// Loads every image in `folder` and writes them to `output` as one TIFF.
    ///
    /// Nothing is carried between calls: each run resolves its own DPI and
    /// hands it to the writer with the rest of the write options.
    #[instrument(skip(self, folder, output))]
    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(&self, folder: P, output: Q) -> Result<ProcessReport> {
        let folder = folder.as_ref();
        let output = output.as_ref();

        info!(
            input = %folder.display(),
            output = %output.display(),
            compression = %self.config.compression,
            quality = self.config.quality,
            color_space = %self.config.color_space,
            "Converting folder"
        );

        let mut stage = PipelineStage::Idle;
        let mut timings = StageTimings::new();

        match self.run(folder, output, &mut stage, &mut timings) {
            Ok(report) => Ok(report),
            Err(e) => {
                let failed_in = stage;
                Self::advance(&mut stage, PipelineStage::Failed);
                error!(stage = %failed_in, "Conversion failed: {}", e);
                Err(e)
            }
        }
    }

    fn run(
        &self,
        folder: &Path,
        output: &Path,
        stage: &mut PipelineStage,
        timings: &mut StageTimings,
    ) -> Result<ProcessReport> {
        self.config.validate()?;

        Self::advance(stage, PipelineStage::Loading);
        let timer = StageTimer::start(PipelineStage::Loading);
        let batch = self.loader.load(folder, self.config.color_space)?;
        timer.stop(timings);

        if batch.is_empty() && self.config.fail_on_empty {
            return Err(ConversionError::EmptyBatch(folder.display().to_string()));
        }

        Self::advance(stage, PipelineStage::Converting);
        let options = self.config.write_options(batch.dpi);
        let timer = StageTimer::start(PipelineStage::Converting);
        let outcome = self.converter.save(&batch.pages, output, &options)?;
        timer.stop(timings);

        Self::advance(stage, PipelineStage::Done);
        info!(
            pages = batch.pages.len(),
            skipped = batch.skipped.len(),
            dpi = %batch.dpi,
            elapsed_ms = timings.total().as_secs_f64() * 1000.0,
            "Conversion complete"
        );

        Ok(ProcessReport {
            stage: *stage,
            pages: batch.pages.len(),
            skipped: batch.skipped,
            dpi: batch.dpi,
            outcome,
            timings: timings.clone(),
        })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.loader
            .set_dpi_policy(config.dpi_strategy, config.default_dpi);
        self.config = config;
    }

    pub fn loader(&self) -> &FolderLoader<R> {
        &self.loader
    }
}
