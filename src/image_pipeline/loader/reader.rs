use std::path::Path;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::types::{ColorSpace, PageImage};

pub trait PageReader {
    fn read_page(&self, path: &Path, data: &[u8], color_space: ColorSpace) -> Result<PageImage>;
}
