//! Form state, enumerated address options, media attachments and the
//! validation rules that gate submission.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::api::Customer;

/// Client-side ceiling for image attachments (5 MiB).
pub const IMAGE_MAX_BYTES: u64 = 5 * 1024 * 1024;
/// Client-side ceiling for video attachments (15 MiB).
pub const VIDEO_MAX_BYTES: u64 = 15 * 1024 * 1024;

/// Form rows in focus order, top to bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    City,
    State,
    Country,
    Image,
    Video,
    Terms,
    Submit,
}

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::City,
        FormField::State,
        FormField::Country,
        FormField::Image,
        FormField::Video,
        FormField::Terms,
        FormField::Submit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
            FormField::City => "City",
            FormField::State => "State",
            FormField::Country => "Country",
            FormField::Image => "Image (max 5MB)",
            FormField::Video => "Video (max 15MB)",
            FormField::Terms => "Accept Terms and Conditions",
            FormField::Submit => "Submit",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next row down; saturates at the submit row.
    pub fn next(self) -> FormField {
        let idx = (self.position() + 1).min(Self::ALL.len() - 1);
        Self::ALL[idx]
    }

    /// Previous row up; saturates at the top.
    pub fn prev(self) -> FormField {
        Self::ALL[self.position().saturating_sub(1)]
    }

    /// Whether this row takes typed text input.
    pub fn is_text(self) -> bool {
        matches!(self, FormField::Name | FormField::Email | FormField::Phone)
    }

    /// Whether this row cycles through a fixed option set.
    pub fn is_select(self) -> bool {
        matches!(self, FormField::City | FormField::State | FormField::Country)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum City {
    #[default]
    NewYork,
    LosAngeles,
    Chicago,
}

impl City {
    pub const ALL: [City; 3] = [City::NewYork, City::LosAngeles, City::Chicago];

    pub fn as_str(self) -> &'static str {
        match self {
            City::NewYork => "New York",
            City::LosAngeles => "Los Angeles",
            City::Chicago => "Chicago",
        }
    }

    pub fn parse(s: &str) -> Option<City> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    pub fn next(self) -> City {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> City {
        cycle(&Self::ALL, self, -1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum StateCode {
    #[default]
    Ny,
    Ca,
    Il,
}

impl StateCode {
    pub const ALL: [StateCode; 3] = [StateCode::Ny, StateCode::Ca, StateCode::Il];

    pub fn as_str(self) -> &'static str {
        match self {
            StateCode::Ny => "NY",
            StateCode::Ca => "CA",
            StateCode::Il => "IL",
        }
    }

    pub fn parse(s: &str) -> Option<StateCode> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    pub fn next(self) -> StateCode {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> StateCode {
        cycle(&Self::ALL, self, -1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Country {
    #[default]
    Usa,
    Canada,
    Mexico,
}

impl Country {
    pub const ALL: [Country; 3] = [Country::Usa, Country::Canada, Country::Mexico];

    pub fn as_str(self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::Canada => "Canada",
            Country::Mexico => "Mexico",
        }
    }

    pub fn parse(s: &str) -> Option<Country> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    pub fn next(self) -> Country {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Country {
        cycle(&Self::ALL, self, -1)
    }
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, step: isize) -> T {
    let len = options.len() as isize;
    let idx = options.iter().position(|o| *o == current).unwrap_or(0) as isize;
    options[((idx + step + len) % len) as usize]
}

/// Attachment slot a media file can occupy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn max_bytes(self) -> u64 {
        match self {
            MediaKind::Image => IMAGE_MAX_BYTES,
            MediaKind::Video => VIDEO_MAX_BYTES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// A file loaded from disk, held in memory until submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub kind: MediaKind,
}

impl MediaFile {
    /// Container format detected from the leading magic bytes, if recognized.
    pub fn sniffed_format(&self) -> Option<&'static str> {
        sniff_format(&self.bytes)
    }

    /// MIME type for the multipart part, from the sniffed format.
    pub fn mime(&self) -> &'static str {
        match self.sniffed_format() {
            Some("png") => "image/png",
            Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("mp4") => "video/mp4",
            Some("webm") => "video/webm",
            Some("avi") => "video/x-msvideo",
            Some("ogg") => "video/ogg",
            _ => "application/octet-stream",
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} is {actual} bytes, over the {limit} byte limit")]
    TooLarge {
        kind: &'static str,
        actual: u64,
        limit: u64,
    },
}

/// Load an attachment from disk, enforcing the per-kind size ceiling.
///
/// The ceiling is checked against the file metadata before the contents are
/// read, so an oversized file is rejected without buffering it. Exactly at
/// the ceiling is accepted.
pub fn load_media(path: &Path, kind: MediaKind) -> Result<MediaFile, MediaError> {
    let io_err = |source| MediaError::Io {
        path: path.display().to_string(),
        source,
    };

    let meta = fs::metadata(path).map_err(io_err)?;
    if meta.len() > kind.max_bytes() {
        return Err(MediaError::TooLarge {
            kind: kind.label(),
            actual: meta.len(),
            limit: kind.max_bytes(),
        });
    }

    let bytes = fs::read(path).map_err(|source| MediaError::Io {
        path: path.display().to_string(),
        source,
    })?;
    // Metadata can be stale for files being written to; re-check what we got.
    if bytes.len() as u64 > kind.max_bytes() {
        return Err(MediaError::TooLarge {
            kind: kind.label(),
            actual: bytes.len() as u64,
            limit: kind.max_bytes(),
        });
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| kind.label().to_string());

    Ok(MediaFile {
        file_name,
        bytes,
        kind,
    })
}

fn sniff_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("gif");
    }
    if bytes.starts_with(b"BM") {
        return Some("bmp");
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" {
        if &bytes[8..12] == b"WEBP" {
            return Some("webp");
        }
        if &bytes[8..12] == b"AVI " {
            return Some("avi");
        }
    }
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        return Some("mp4");
    }
    if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("webm");
    }
    if bytes.starts_with(b"OggS") {
        return Some("ogg");
    }
    None
}

/// A field-scoped validation failure, rendered adjacent to its row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// The editable form, one record's worth of input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: City,
    pub state: StateCode,
    pub country: Country,
    pub terms_accepted: bool,
    pub image: Option<MediaFile>,
    pub video: Option<MediaFile>,
}

impl FormState {
    /// Fields pre-filled from an existing customer for editing.
    ///
    /// Terms acceptance is always reset to false and attachments start
    /// empty; address values the enumerations don't know fall back to the
    /// first option.
    pub fn prefill(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            city: City::parse(&customer.address.city).unwrap_or_default(),
            state: StateCode::parse(&customer.address.state).unwrap_or_default(),
            country: Country::parse(&customer.address.country).unwrap_or_default(),
            terms_accepted: false,
            image: None,
            video: None,
        }
    }

    /// Back to create-mode defaults, dropping any attachments and preview.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Run every rule against the form. Empty result means submission may go out.
pub fn validate(form: &FormState) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut fail = |field, message: &str| {
        errors.push(FieldError {
            field,
            message: message.to_string(),
        })
    };

    if form.name.trim().is_empty() {
        fail(FormField::Name, "Name is required");
    }
    if form.email.trim().is_empty() {
        fail(FormField::Email, "Email is required");
    } else if !is_well_formed_email(form.email.trim()) {
        fail(FormField::Email, "Invalid email");
    }
    if form.phone.trim().is_empty() {
        fail(FormField::Phone, "Phone number is required");
    }
    if !form.terms_accepted {
        fail(FormField::Terms, "Accept Terms & Conditions is required");
    }

    errors
}

fn is_well_formed_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    // Domain needs at least one interior dot with non-empty labels.
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') && !domain.contains("..")
}
