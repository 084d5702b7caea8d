//! Inputs for the build flow.

use zeroize::Zeroizing;

/// Glyph used when the caller does not name one.
pub const DEFAULT_GLYPH: &str = "NAH'NUMA'HA";

/// Caption used when the caller does not supply one.
pub const DEFAULT_PHRASE: &str = "Through the Veil, We Walk Unseen";

/// Viewer role used when the caller does not supply any.
pub const DEFAULT_ROLE: &str = "Council";

/// Everything the build flow needs except the passphrase.
///
/// The hidden image bytes are zeroized when the request is dropped.
///
/// # Examples
///
/// ```
/// use veil_core::container::PackageRequest;
///
/// let request = PackageRequest::new()
///     .base_image_with_type(vec![1, 2, 3], "image/png")
///     .hidden_image(vec![4, 5, 6])
///     .phrase("Through the Veil")
///     .roles(["Council", "Elder"]);
/// assert_eq!(request.roles_list(), ["Council", "Elder"]);
/// ```
#[derive(Clone)]
pub struct PackageRequest {
    pub(crate) base_image: Option<Vec<u8>>,
    pub(crate) base_media_type: Option<String>,
    pub(crate) hidden_image: Option<Zeroizing<Vec<u8>>>,
    pub(crate) glyph: String,
    pub(crate) phrase: String,
    pub(crate) roles: Vec<String>,
    pub(crate) salt: Option<Vec<u8>>,
}

impl Default for PackageRequest {
    fn default() -> Self {
        Self {
            base_image: None,
            base_media_type: None,
            hidden_image: None,
            glyph: DEFAULT_GLYPH.to_string(),
            phrase: DEFAULT_PHRASE.to_string(),
            roles: vec![DEFAULT_ROLE.to_string()],
            salt: None,
        }
    }
}

impl PackageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the visible base image.
    pub fn base_image(mut self, bytes: Vec<u8>) -> Self {
        self.base_image = Some(bytes);
        self
    }

    /// Set the visible base image along with its media type (e.g. `image/png`).
    pub fn base_image_with_type(mut self, bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        self.base_image = Some(bytes);
        self.base_media_type = Some(media_type.into());
        self
    }

    /// Set the image to hide.
    pub fn hidden_image(mut self, bytes: Vec<u8>) -> Self {
        self.hidden_image = Some(Zeroizing::new(bytes));
        self
    }

    pub fn glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = glyph.into();
        self
    }

    pub fn phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = phrase.into();
        self
    }

    /// Replace the role list.
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Use a caller-chosen salt instead of a freshly generated one.
    pub fn salt(mut self, salt: Vec<u8>) -> Self {
        self.salt = Some(salt);
        self
    }

    pub fn roles_list(&self) -> &[String] {
        &self.roles
    }
}

impl std::fmt::Debug for PackageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageRequest")
            .field("base_image_bytes", &self.base_image.as_ref().map(Vec::len))
            .field("base_media_type", &self.base_media_type)
            .field(
                "hidden_image_bytes",
                &self.hidden_image.as_ref().map(|bytes| bytes.len()),
            )
            .field("glyph", &self.glyph)
            .field("phrase", &self.phrase)
            .field("roles", &self.roles)
            .field("salt_supplied", &self.salt.is_some())
            .finish()
    }
}
