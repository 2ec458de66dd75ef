use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::RepositoryError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Opaque position in a listing: the primary key of the last item returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    last_key: String,
}

impl Cursor {
    /// A cursor resuming after `last_key`.
    pub fn after(last_key: impl Into<String>) -> Self {
        Self {
            last_key: last_key.into(),
        }
    }

    pub fn last_key(&self) -> &str {
        &self.last_key
    }

    /// URL-safe token handed to clients.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.last_key.as_bytes())
    }

    /// Parse a token produced by [`Cursor::encode`].
    pub fn decode(token: &str) -> Result<Self, RepositoryError> {
        let invalid = || RepositoryError::InvalidData(format!("invalid cursor: {token}"));
        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
        let last_key = String::from_utf8(bytes).map_err(|_| invalid())?;
        if last_key.is_empty() {
            return Err(invalid());
        }
        Ok(Self { last_key })
    }
}

/// A bounded listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub cursor: Option<Cursor>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            cursor: None,
        }
    }
}

impl PageRequest {
    /// First page of `limit` items, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn first(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            cursor: None,
        }
    }

    /// Continue after `cursor`.
    pub fn after(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Build from raw query parameters.
    pub fn from_query(limit: Option<u32>, cursor: Option<&str>) -> Result<Self, RepositoryError> {
        let request = Self::first(limit.unwrap_or(DEFAULT_PAGE_SIZE));
        match cursor.filter(|c| !c.is_empty()) {
            Some(token) => Ok(request.after(Cursor::decode(token)?)),
            None => Ok(request),
        }
    }

    /// Limit as a `usize`, for slicing local collections.
    pub fn limit_usize(&self) -> usize {
        self.limit as usize
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present when more items may follow.
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<Cursor>) -> Self {
        Self { items, next_cursor }
    }
}
