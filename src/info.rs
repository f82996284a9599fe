use crate::options::RenderOptions;
use crate::refs::{ObjectReferences, RefType};
use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// The document information dictionary written with every render
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Info {
    pub title: Option<String>,
    pub author: Option<String>,
    /// What kind of document this is, e.g. "Invoice"
    pub subject: Option<String>,
    /// [None] stamps the time the document is written
    pub creation_date: Option<DateTime<FixedOffset>>,
}

impl Info {
    /// The metadata a render starts from: the configured author and, if
    /// pinned, the creation date
    pub fn from_options(options: &RenderOptions<'_>) -> Info {
        Info {
            author: options.author.clone(),
            creation_date: options.creation_date,
            ..Default::default()
        }
    }

    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author<S: ToString>(&mut self, author: S) -> &mut Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        let created = self
            .creation_date
            .unwrap_or_else(|| Local::now().fixed_offset());
        info.creation_date(pdf_date(&created));
    }
}

/// A timestamp as a PDF date, keeping its UTC offset
fn pdf_date(date: &DateTime<FixedOffset>) -> PDate {
    let (hours, minutes) = utc_offset(date);
    PDate::new(date.year() as u16)
        .month(date.month() as u8)
        .day(date.day() as u8)
        .hour(date.hour() as u8)
        .minute(date.minute() as u8)
        .second(date.second() as u8)
        .utc_offset_hour(hours)
        .utc_offset_minute(minutes)
}

/// Offset from UTC as signed hours plus unsigned minutes, the way PDF dates
/// spell it (`-03'30`)
fn utc_offset(date: &DateTime<FixedOffset>) -> (i8, u8) {
    let seconds = date.offset().local_minus_utc();
    let hours = seconds / 3600;
    let minutes = ((seconds - hours * 3600) / 60).abs();
    (hours as i8, minutes as u8)
}
