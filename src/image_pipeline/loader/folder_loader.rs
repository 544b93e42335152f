use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::types::{ColorSpace, Dpi};
use crate::image_pipeline::loader::codec_reader::CodecPageReader;
use crate::image_pipeline::loader::dpi::DpiStrategy;
use crate::image_pipeline::loader::reader::PageReader;
use crate::image_pipeline::loader::types::{LoadedBatch, SkippedFile};

/// File name suffixes picked up from the input folder, compared case-insensitively
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

pub fn is_supported_file_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

pub struct FolderLoader<R: PageReader> {
    reader: R,
    dpi_strategy: DpiStrategy,
    default_dpi: Dpi,
}

impl FolderLoader<CodecPageReader> {
    pub fn new(dpi_strategy: DpiStrategy, default_dpi: Dpi) -> Self {
        Self::with_reader(CodecPageReader, dpi_strategy, default_dpi)
    }
}

impl<R: PageReader> FolderLoader<R> {
    pub fn with_reader(reader: R, dpi_strategy: DpiStrategy, default_dpi: Dpi) -> Self {
        Self {
            reader,
            dpi_strategy,
            default_dpi,
        }
    }

    /// Lists the files a load would consider, sorted by file name.
    pub fn matching_files(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(folder).map_err(|e| {
            ConversionError::InputReadError(format!("{}: {}", folder.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", folder.display(), e))
            })?;
            let name = entry.file_name();
            if is_supported_file_name(&name.to_string_lossy()) {
                files.push(entry.path());
            } else {
                debug!("Ignoring {}", entry.path().display());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Decodes every matching file in `folder`.
    ///
    /// Files that fail to read, decode or convert are logged and skipped; only
    /// a folder that cannot be listed is an error.
    #[instrument(skip(self, folder, color_space), fields(folder = %folder.display(), color_space = %color_space))]
    pub fn load(&self, folder: &Path, color_space: ColorSpace) -> Result<LoadedBatch> {
        let files = self.matching_files(folder)?;
        info!("Found {} candidate image(s)", files.len());

        let mut pages = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();

        for path in files {
            let _span = tracing::info_span!("load_file", file = %path.display()).entered();

            let page = std::fs::read(&path)
                .map_err(|e| ConversionError::InputReadError(format!("{}: {}", path.display(), e)))
                .and_then(|data| self.reader.read_page(&path, &data, color_space));

            match page {
                Ok(page) => pages.push(page),
                Err(e) => {
                    error!("Error loading image {}: {}", path.display(), e);
                    skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let dpi = self
            .dpi_strategy
            .resolve(pages.iter().map(|p| p.dpi), self.default_dpi);

        info!(
            loaded = pages.len(),
            skipped = skipped.len(),
            dpi = %dpi,
            strategy = %self.dpi_strategy,
            "Loading complete"
        );

        Ok(LoadedBatch {
            pages,
            dpi,
            skipped,
        })
    }

    pub fn set_dpi_policy(&mut self, dpi_strategy: DpiStrategy, default_dpi: Dpi) {
        self.dpi_strategy = dpi_strategy;
        self.default_dpi = default_dpi;
    }

    pub fn dpi_strategy(&self) -> DpiStrategy {
        self.dpi_strategy
    }

    pub fn default_dpi(&self) -> Dpi {
        self.default_dpi
    }
}
