use crate::{
    content::render_contents,
    font::StandardFont,
    image::Image,
    info::Info,
    page::{Page, PageContents},
    refs::{ObjectReferences, RefType},
    RenderError,
};
use id_arena::{Arena, Id};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Name, Pdf, Ref};
use std::collections::BTreeSet;
use std::io::Write;

#[derive(Default)]
/// A document stores all the pages and images of the PDF, then renders them
/// out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub images: Arena<Image>,
    /// Flate-compress page content streams
    pub compress: bool,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its id
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Add an image to the document structure. Images are stored "globally"
    /// within the document, such that any page can place them by their id.
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Pages in document order
    pub fn ordered_pages(&self) -> impl Iterator<Item = &Page> {
        self.page_order.iter().filter_map(|id| self.pages.get(*id))
    }

    /// The standard fonts referenced by any page, so only those get written
    fn used_fonts(&self) -> BTreeSet<StandardFont> {
        self.ordered_pages()
            .flat_map(|page| page.contents.iter())
            .filter_map(|content| match content {
                PageContents::Text(span) => Some(span.font.standard_font()),
                _ => None,
            })
            .collect()
    }

    /// Write the entire document to the writer. The whole document is rendered
    /// in memory first.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), RenderError> {
        let fonts = self.used_fonts();
        let Document {
            info,
            pages,
            page_order,
            images,
            compress,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        // page refs are keyed by position in the document, not arena index
        let page_refs: Vec<Ref> = page_order
            .iter()
            .enumerate()
            .map(|(i, _id)| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for font in fonts.iter() {
            let id = refs.gen(RefType::Font(*font));
            writer
                .type1_font(id)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (i, image) in images.iter() {
            image.write(&mut refs, i.index(), &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages.get(*id).ok_or(RenderError::PageMissing)?;
            write_page(
                page,
                page_index,
                &fonts,
                &images,
                compress,
                &mut refs,
                &mut writer,
            )?;
        }

        writer.catalog(catalog_id).pages(page_tree_id);

        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

fn write_page(
    page: &Page,
    page_index: usize,
    fonts: &BTreeSet<StandardFont>,
    images: &Arena<Image>,
    compress: bool,
    refs: &mut ObjectReferences,
    writer: &mut Pdf,
) -> Result<(), RenderError> {
    let id = refs
        .get(RefType::Page(page_index))
        .ok_or(RenderError::PageMissing)?;
    let page_tree_id = refs.get(RefType::PageTree).ok_or(RenderError::PageMissing)?;
    let content_id = refs.gen(RefType::ContentForPage(page_index));

    let mut pdf_page = writer.page(id);
    pdf_page.media_box(pdf_writer::Rect::new(
        0.0,
        0.0,
        crate::Pt::from(page.width()).0,
        crate::Pt::from(page.height()).0,
    ));
    if let Some(border) = page.border {
        pdf_page.art_box(border.to_pdf(page.height()));
    }
    pdf_page.parent(page_tree_id);

    let mut resources = pdf_page.resources();
    let mut resource_fonts = resources.fonts();
    for font in fonts.iter() {
        if let Some(font_ref) = refs.get(RefType::Font(*font)) {
            resource_fonts.pair(Name(format!("F{}", font.index()).as_bytes()), font_ref);
        }
    }
    resource_fonts.finish();
    let mut resource_xobjects = resources.x_objects();
    for (i, _) in images.iter() {
        if let Some(image_ref) = refs.get(RefType::Image(i.index())) {
            resource_xobjects.pair(Name(format!("I{}", i.index()).as_bytes()), image_ref);
        }
    }
    resource_xobjects.finish();
    resources.finish();

    pdf_page.contents(content_id);
    pdf_page.finish();

    let rendered = render_contents(page, images);
    if compress {
        let compressed = compress_to_vec_zlib(
            &rendered,
            CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(content_id, compressed.as_slice())
            .filter(Filter::FlateDecode);
    } else {
        writer.stream(content_id, rendered.as_slice());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;
    use crate::font::FontSpec;
    use crate::page::SpanLayout;
    use crate::pagesize::A4;
    use crate::units::Mm;

    fn one_page_doc(compress: bool) -> Document {
        let mut doc = Document {
            compress,
            ..Default::default()
        };
        let mut page = Page::new(1, A4);
        page.add_span(SpanLayout {
            text: "Hello".into(),
            font: FontSpec::regular(12.0),
            colour: colours::BLACK,
            coords: (Mm(20.0), Mm(20.0)),
        });
        doc.add_page(page);
        doc
    }

    #[test]
    fn writes_a_pdf() {
        let mut out = Vec::new();
        one_page_doc(false).write(&mut out).expect("document writes");
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(!text.contains("Helvetica-Bold"));
        assert!(text.contains("(Hello) Tj"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn compression_hides_the_content_stream() {
        let mut out = Vec::new();
        one_page_doc(true).write(&mut out).expect("document writes");
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/FlateDecode"));
        assert!(!text.contains("(Hello) Tj"));
    }
}
