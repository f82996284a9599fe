use crate::colour::{colours, Colour};
use crate::image::ImageSource;
use serde::{Deserialize, Serialize};

/// Who the documents are from. Passed to every render explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub company_name: String,
    pub address_lines: Vec<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub logo: Option<ImageSource>,
    /// Fill of table headers and colour of document titles
    pub accent: Colour,
    pub currency_symbol: String,
    pub payment_terms: Option<String>,
    /// Printed above the contact line at the foot of every document
    pub footer_note: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Branding {
            company_name: String::new(),
            address_lines: Vec::new(),
            phone: None,
            email: None,
            website: None,
            logo: None,
            accent: colours::SLATE,
            currency_symbol: "$".to_string(),
            payment_terms: None,
            footer_note: None,
        }
    }
}

impl Branding {
    pub fn new<S: ToString>(company_name: S) -> Branding {
        Branding {
            company_name: company_name.to_string(),
            ..Default::default()
        }
    }

    /// Phone, email and website, one per line
    pub fn contact_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(phone) = &self.phone {
            lines.push(format!("Tel: {phone}"));
        }
        lines.extend(self.email.iter().cloned());
        lines.extend(self.website.iter().cloned());
        lines
    }

    /// Company name and contact details on a single line
    pub fn contact_line(&self) -> String {
        std::iter::once(self.company_name.clone())
            .chain(self.phone.iter().cloned())
            .chain(self.email.iter().cloned())
            .chain(self.website.iter().cloned())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("  |  ")
    }
}
