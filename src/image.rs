use crate::refs::{ObjectReferences, RefType};
use image::{ColorType, DynamicImage};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Chunk, Filter, Finish, Pdf, Ref};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Why an image couldn't be used. These never abort a render: the canvas logs
/// them and leaves a zero-size placeholder instead.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Svg(#[from] usvg::Error),

    #[error("could not convert svg: {0}")]
    SvgConversion(String),

    #[error("image source `{0}` could not be resolved")]
    Unresolved(String),
}

/// Where an image comes from. Byte buffers are used as-is; URLs are handed to
/// the [ImageResolver] supplied with the render options.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Url(String),
}

impl ImageSource {
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            ImageSource::Url(url) => url.clone(),
        }
    }
}

/// Turns an image URL into bytes. The layout engine performs no I/O itself;
/// callers that want remote images provide a resolver that fetches them
/// before (or while) rendering.
pub trait ImageResolver {
    fn resolve(&self, url: &str) -> Result<Vec<u8>, ImageError>;
}

/// The default resolver, which refuses every URL
#[derive(Debug, Default, Copy, Clone)]
pub struct NoFetch;

impl ImageResolver for NoFetch {
    fn resolve(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        Err(ImageError::Unresolved(url.to_string()))
    }
}

/// Resolves URLs from an in-memory table, useful when the caller has already
/// downloaded everything a document needs
impl ImageResolver for HashMap<String, Vec<u8>> {
    fn resolve(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        self.get(url)
            .cloned()
            .ok_or_else(|| ImageError::Unresolved(url.to_string()))
    }
}

pub enum RasterImageType {
    /// JPEG data that PDF viewers can decode directly
    DirectlyEmbeddableJpeg(Vec<u8>),
    Image(DynamicImage),
}

pub enum ImageType {
    Raster(RasterImageType),
    /// An SVG already converted into PDF objects, and the id of its XObject
    /// within that chunk
    SVG(Chunk, Ref),
}

/// A decoded image, ready to be embedded. `width` and `height` are the
/// intrinsic size (pixels for raster images, user units for SVG) and only
/// their ratio matters for layout.
pub struct Image {
    pub image: ImageType,
    pub width: f32,
    pub height: f32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Load an image from a source, resolving URLs through `resolver`
    pub fn load(source: &ImageSource, resolver: &dyn ImageResolver) -> Result<Image, ImageError> {
        match source {
            ImageSource::Bytes(bytes) => Self::from_bytes(bytes),
            ImageSource::Url(url) => {
                let bytes = resolver.resolve(url)?;
                Self::from_bytes(&bytes)
            }
        }
    }

    /// Decode raw bytes, sniffing whether they hold an SVG or a raster image
    pub fn from_bytes(data: &[u8]) -> Result<Image, ImageError> {
        if looks_like_svg(data) {
            Self::new_svg(data)
        } else {
            Self::new_raster(data)
        }
    }

    pub fn new_svg(data: &[u8]) -> Result<Image, ImageError> {
        let tree = usvg::Tree::from_data(data, &usvg::Options::default())?;
        let size = tree.size();
        let (chunk, id) = svg2pdf::to_chunk(&tree, svg2pdf::ConversionOptions::default())
            .map_err(|e| ImageError::SvgConversion(format!("{e:?}")))?;

        Ok(Image {
            image: ImageType::SVG(chunk, id),
            width: size.width(),
            height: size.height(),
        })
    }

    pub fn new_raster(data: &[u8]) -> Result<Image, ImageError> {
        let format = image::guess_format(data)?;
        let image = image::load_from_memory_with_format(data, format)?;
        let width = image.width() as f32;
        let height = image.height() as f32;

        let image = match (format, image.color()) {
            // we can embed it directly!
            (image::ImageFormat::Jpeg, ColorType::Rgb8) => {
                RasterImageType::DirectlyEmbeddableJpeg(data.to_vec())
            }
            _ => RasterImageType::Image(image),
        };

        Ok(Image {
            image: ImageType::Raster(image),
            width,
            height,
        })
    }

    fn encode_raster(raster: &RasterImageType) -> EncodeOutput {
        match raster {
            RasterImageType::DirectlyEmbeddableJpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            RasterImageType::Image(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        match &self.image {
            ImageType::Raster(raster) => {
                let id = refs.gen(RefType::Image(image_index));
                let encoded = Self::encode_raster(raster);

                let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
                image.filter(encoded.filter);
                image.width(self.width as i32);
                image.height(self.height as i32);
                image.color_space().device_rgb();
                image.bits_per_component(8);

                let mask_id = encoded
                    .mask
                    .as_ref()
                    .map(|_| refs.gen(RefType::ImageMask(image_index)));
                if let Some(mask_id) = mask_id {
                    image.s_mask(mask_id);
                }

                image.finish();

                // add a transparency mask if we have one
                if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
                    let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
                    s_mask.filter(Filter::FlateDecode);
                    s_mask.width(self.width as i32);
                    s_mask.height(self.height as i32);
                    s_mask.color_space().device_gray();
                    s_mask.bits_per_component(8);
                }
            }
            ImageType::SVG(chunk, svg_id) => {
                // move the chunk's objects into our numbering
                let mut mapping: HashMap<Ref, Ref> = HashMap::new();
                let renumbered = chunk.renumber(|old| *mapping.entry(old).or_insert_with(|| refs.bump()));
                let id = mapping.get(svg_id).copied().unwrap_or_else(|| refs.bump());
                refs.set(RefType::Image(image_index), id);
                writer.extend(&renumbered);
            }
        }
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}
