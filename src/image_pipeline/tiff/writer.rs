use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::PageImage;
use crate::image_pipeline::tiff::types::WriteOptions;

pub trait MultiPageWriter {
    fn write_pages(&self, pages: &[PageImage], output: &mut dyn Write, options: &WriteOptions) -> Result<()>;
}
