//! File uploads to the backend's per-feature PHP scripts.

use crate::error::ApiError;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: [&str; 7] = [
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/gif",
    "image/svg+xml",
    "image/x-icon",
    "image/vnd.microsoft.icon",
];

/// Which form the file belongs to. Each maps to its own upload script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadFeature {
    Logo,
    Favicon,
    Banner,
    EmployeeImage,
    ServiceImage,
    CategoryImage,
    EventImage,
    PaymentQr,
    WebsiteContent,
}

impl UploadFeature {
    pub const ALL: [Self; 9] = [
        Self::Logo,
        Self::Favicon,
        Self::Banner,
        Self::EmployeeImage,
        Self::ServiceImage,
        Self::CategoryImage,
        Self::EventImage,
        Self::PaymentQr,
        Self::WebsiteContent,
    ];

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.slug() == slug)
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Favicon => "favicon",
            Self::Banner => "banner",
            Self::EmployeeImage => "employee-image",
            Self::ServiceImage => "service-image",
            Self::CategoryImage => "category-image",
            Self::EventImage => "event-image",
            Self::PaymentQr => "payment-qr",
            Self::WebsiteContent => "website-content",
        }
    }

    /// Script file name under the upload base URL.
    #[must_use]
    pub fn script(self) -> &'static str {
        match self {
            Self::Logo => "upload_logo.php",
            Self::Favicon => "upload_favicon.php",
            Self::Banner => "upload_banner.php",
            Self::EmployeeImage => "upload_employee_image.php",
            Self::ServiceImage => "upload_service_image.php",
            Self::CategoryImage => "upload_category_image.php",
            Self::EventImage => "upload_event_image.php",
            Self::PaymentQr => "upload_payment_qr.php",
            Self::WebsiteContent => "upload_website_image.php",
        }
    }
}

/// An in-memory file ready to be forwarded.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Guess the content type from the file extension when the browser sent
    /// none or a generic one.
    #[must_use]
    pub fn new(file_name: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let content_type = match content_type.map(str::trim) {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_ascii_lowercase(),
            _ => guess_content_type(file_name).to_owned(),
        };
        Self { file_name: sanitize_file_name(file_name), content_type, bytes }
    }

    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUpload`] for empty files, files above
    /// `max_bytes`, or non-image content types.
    pub fn validate(&self, max_bytes: usize) -> Result<(), ApiError> {
        if self.bytes.is_empty() {
            return Err(ApiError::InvalidUpload("file is empty".into()));
        }
        if self.bytes.len() > max_bytes {
            return Err(ApiError::InvalidUpload(format!(
                "file is {} KB, the limit is {} KB",
                self.bytes.len().div_ceil(1024),
                max_bytes / 1024
            )));
        }
        if !ALLOWED_CONTENT_TYPES.contains(&self.content_type.as_str()) {
            return Err(ApiError::InvalidUpload(format!("{} files are not accepted", self.content_type)));
        }
        Ok(())
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Strip any client-side directory part and characters PHP scripts choke on.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() { "upload".to_owned() } else { cleaned.to_owned() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_slugs_round_trip() {
        for feature in UploadFeature::ALL {
            assert_eq!(UploadFeature::from_slug(feature.slug()), Some(feature));
            assert!(feature.script().ends_with(".php"));
        }
        assert_eq!(UploadFeature::from_slug("avatar"), None);
    }

    #[test]
    fn content_type_guessed_from_extension() {
        let file = FileUpload::new("Logo.PNG", Some("application/octet-stream"), vec![1]);
        assert_eq!(file.content_type, "image/png");
        let file = FileUpload::new("qr.jpeg", None, vec![1]);
        assert_eq!(file.content_type, "image/jpeg");
        let file = FileUpload::new("x.png", Some("Image/WebP"), vec![1]);
        assert_eq!(file.content_type, "image/webp");
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(FileUpload::new("C:\\Users\\me\\my logo.png", None, vec![1]).file_name, "my_logo.png");
        assert_eq!(FileUpload::new("../../etc/passwd", None, vec![1]).file_name, "passwd");
        assert_eq!(FileUpload::new("...", None, vec![1]).file_name, "upload");
    }

    #[test]
    fn validation_limits() {
        let empty = FileUpload::new("a.png", None, Vec::new());
        assert!(empty.validate(1024).unwrap_err().to_string().contains("empty"));

        let big = FileUpload::new("a.png", None, vec![0; 2048]);
        assert!(big.validate(1024).unwrap_err().to_string().contains("limit is 1 KB"));

        let pdf = FileUpload::new("menu.pdf", Some("application/pdf"), vec![1]);
        assert!(pdf.validate(1024).is_err());

        let ok = FileUpload::new("a.png", None, vec![1; 10]);
        assert!(ok.validate(1024).is_ok());
    }
}
